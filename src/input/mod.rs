pub mod backend;
pub mod keyboard;
pub mod keymap;
pub mod mouse;
pub mod native;
pub mod screen;

pub use backend::{InputBackend, KeyCode, MouseButton, Press, ScrollAxis};
pub use mouse::Target;
pub use native::NativeBackend;
pub use screen::Screenshot;

use crate::{
    error::{Result, agent_error::AgentError},
    grounding::{Grounder, Point},
};

/// The input injection layer: every primitive mutates OS input state and
/// returns the screenshot captured once the effect has been applied.
pub struct Desktop {
    backend: Box<dyn InputBackend>,
    grounder: Option<Box<dyn Grounder>>,
}

impl Desktop {
    pub fn new(backend: Box<dyn InputBackend>) -> Self {
        Self {
            backend,
            grounder: None,
        }
    }

    pub fn with_grounder(mut self, grounder: Box<dyn Grounder>) -> Self {
        self.grounder = Some(grounder);
        self
    }

    pub fn has_grounder(&self) -> bool {
        self.grounder.is_some()
    }

    pub fn screen_size(&mut self) -> Result<(u32, u32)> {
        Ok(self.backend.screen_size()?)
    }

    pub fn capture(&mut self) -> Result<Screenshot> {
        Ok(self.backend.capture()?)
    }

    /// Turns a target into pixel coordinates, grounding semantic references.
    pub async fn resolve(&mut self, target: &Target) -> Result<Point> {
        match target {
            Target::Pixel(point) => Ok(*point),
            Target::Element(reference) => {
                let grounder = self.grounder.as_mut().ok_or_else(|| {
                    AgentError::Grounding(format!(
                        "no grounding strategy configured to locate {reference:?}"
                    ))
                })?;
                grounder.resolve(reference, self.backend.as_mut()).await
            }
        }
    }
}
