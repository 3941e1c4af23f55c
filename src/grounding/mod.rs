pub mod catalog;
pub mod detect_match;
pub mod http;
pub mod regression;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::Result, input::InputBackend};

pub use catalog::{BBox, CatalogEntry, ElementCatalog};
pub use detect_match::{DetectAndMatch, Detector};
pub use http::{HttpDetector, HttpPointerModel};
pub use regression::{DirectRegression, PointerModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Resolves a semantic reference ("the close icon") to on-screen pixels.
///
/// Implementations capture a fresh screenshot on every call since the screen
/// may have changed, and must return a point inside `[0, width) x [0, height)`.
#[async_trait]
pub trait Grounder: Send {
    async fn resolve(&mut self, reference: &str, screen: &mut dyn InputBackend) -> Result<Point>;
}

/// Converts a normalized `[0, 1]` coordinate to pixels, clamped to the screen.
pub fn to_pixel(nx: f64, ny: f64, (width, height): (u32, u32)) -> Point {
    Point {
        x: scale_axis(nx, width),
        y: scale_axis(ny, height),
    }
}

fn scale_axis(value: f64, extent: u32) -> i32 {
    let max = extent.saturating_sub(1) as f64;
    let value = if value.is_finite() { value } else { 0.5 };
    (value * extent as f64).floor().clamp(0.0, max) as i32
}

pub fn screen_center((width, height): (u32, u32)) -> Point {
    Point {
        x: (width / 2) as i32,
        y: (height / 2) as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_points_stay_on_screen() {
        let size = (1920, 1080);
        assert_eq!(to_pixel(0.5, 0.5, size), Point { x: 960, y: 540 });
        assert_eq!(to_pixel(1.0, 1.0, size), Point { x: 1919, y: 1079 });
        assert_eq!(to_pixel(-0.2, 1.7, size), Point { x: 0, y: 1079 });
        assert_eq!(to_pixel(f64::NAN, 0.0, size), Point { x: 960, y: 0 });
    }

    #[test]
    fn center_uses_integer_halves() {
        assert_eq!(screen_center((1365, 767)), Point { x: 682, y: 383 });
    }
}
