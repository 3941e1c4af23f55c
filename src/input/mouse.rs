use tracing::debug;

use crate::{
    error::Result,
    grounding::Point,
    input::{Desktop, MouseButton, Press, ScrollAxis, Screenshot},
};

/// Where a pointer action lands: explicit pixels or an on-screen element
/// described in words ("the Save button").
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Pixel(Point),
    Element(String),
}

impl Target {
    pub fn pixel(x: i32, y: i32) -> Self {
        Target::Pixel(Point { x, y })
    }
}

impl Desktop {
    async fn pointer_to(&mut self, target: &Target) -> Result<Point> {
        let point = self.resolve(target).await?;
        self.backend.move_pointer(point.x, point.y)?;
        Ok(point)
    }

    fn press_release(&mut self, button: MouseButton) -> Result<()> {
        self.backend.button(button, Press::Down)?;
        self.backend.button(button, Press::Up)?;
        Ok(())
    }

    pub async fn move_to(&mut self, target: &Target) -> Result<Screenshot> {
        self.pointer_to(target).await?;
        self.capture()
    }

    pub async fn click(&mut self, button: MouseButton, target: &Target) -> Result<Screenshot> {
        let point = self.pointer_to(target).await?;
        debug!(?button, x = point.x, y = point.y, "click");
        self.press_release(button)?;
        self.capture()
    }

    pub async fn double_click(
        &mut self,
        button: MouseButton,
        target: &Target,
    ) -> Result<Screenshot> {
        let point = self.pointer_to(target).await?;
        debug!(?button, x = point.x, y = point.y, "double click");
        self.press_release(button)?;
        self.press_release(button)?;
        self.capture()
    }

    /// Left-button drag from one target to another.
    pub async fn drag(&mut self, from: &Target, to: &Target) -> Result<Screenshot> {
        self.pointer_to(from).await?;
        self.backend.button(MouseButton::Left, Press::Down)?;
        self.pointer_to(to).await?;
        self.backend.button(MouseButton::Left, Press::Up)?;
        self.capture()
    }

    /// Negative vertical deltas scroll down, positive scroll up.
    pub fn scroll(&mut self, axis: ScrollAxis, delta: i32) -> Result<Screenshot> {
        self.backend.scroll(axis, delta)?;
        self.capture()
    }
}
