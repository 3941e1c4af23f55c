use async_trait::async_trait;
use tracing::info;

use crate::{
    error::{Result, agent_error::AgentError},
    grounding::{Grounder, Point, to_pixel},
    input::{InputBackend, Screenshot},
};

/// Maps (screenshot, reference) to ranked normalized points, best first.
#[async_trait]
pub trait PointerModel: Send + Sync {
    async fn locate(&self, screenshot: &Screenshot, reference: &str) -> Result<Vec<(f64, f64)>>;
}

/// Direct coordinate regression: one model call, no retry.
pub struct DirectRegression {
    model: Box<dyn PointerModel>,
}

impl DirectRegression {
    pub fn new(model: Box<dyn PointerModel>) -> Self {
        Self { model }
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[async_trait]
impl Grounder for DirectRegression {
    async fn resolve(&mut self, reference: &str, screen: &mut dyn InputBackend) -> Result<Point> {
        let size = screen.screen_size()?;
        let screenshot = screen.capture()?;
        let points = self.model.locate(&screenshot, reference).await?;
        let (nx, ny) = points.first().copied().ok_or_else(|| {
            AgentError::Grounding(format!("pointer model returned no points for {reference:?}"))
        })?;
        let point = to_pixel(round4(nx), round4(ny), size);
        info!(reference, nx, ny, x = point.x, y = point.y, "regressed pointer");
        Ok(point)
    }
}
