use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::{
    error::Result,
    grounding::{ElementCatalog, Grounder, Point, screen_center},
    input::{InputBackend, Screenshot},
    message::Message,
    oracle::{Oracle, OutputSchema, StructuredOutput, invoke_structured},
    prompt::builder::build_element_choice_prompt,
};

pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Detection + captioning pipeline producing a numbered element catalog.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, screenshot: &Screenshot) -> Result<ElementCatalog>;
}

/// The oracle's pick from the catalog.
#[derive(Debug, Deserialize)]
pub struct ElementChoice {
    pub name: String,
}

impl StructuredOutput for ElementChoice {
    fn output_schema() -> OutputSchema {
        OutputSchema {
            name: "element_choice",
            schema: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "the label number or exact text of the chosen catalog entry",
                    }
                },
                "required": ["name"],
            }),
        }
    }
}

/// Detect-and-match grounding: catalog the screen, let the oracle pick an
/// entry, and fall back to the screen center after `max_retries` misses.
pub struct DetectAndMatch {
    detector: Box<dyn Detector>,
    oracle: Arc<dyn Oracle>,
    max_retries: usize,
    retries: usize,
}

impl DetectAndMatch {
    pub fn new(detector: Box<dyn Detector>, oracle: Arc<dyn Oracle>) -> Self {
        Self {
            detector,
            oracle,
            max_retries: DEFAULT_MAX_RETRIES,
            retries: 0,
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Misses counted so far in the current resolution; zero between calls.
    pub fn retries(&self) -> usize {
        self.retries
    }

    async fn choose(&self, reference: &str, catalog: &ElementCatalog, screenshot: Screenshot) -> Result<String> {
        let messages = [Message::user_with_image(
            build_element_choice_prompt(reference, &catalog.render()),
            screenshot,
        )];
        let choice: ElementChoice = invoke_structured(self.oracle.as_ref(), &messages).await?;
        Ok(choice.name)
    }

    /// Detect-and-match cycles until a match or the retry limit; the caller resets the counter.
    async fn attempt(&mut self, reference: &str, screen: &mut dyn InputBackend) -> Result<Point> {
        loop {
            let size = screen.screen_size()?;
            let screenshot = screen.capture()?;
            let catalog = self.detector.detect(&screenshot).await?;
            debug!(reference, elements = catalog.len(), attempt = self.retries + 1, "detected elements");

            let matched = if catalog.is_empty() {
                None
            } else {
                let choice = self.choose(reference, &catalog, screenshot).await?;
                catalog.find(&choice).map(|entry| (choice, entry.bbox))
            };

            if let Some((choice, bbox)) = matched {
                let point = bbox.center_pixel(size);
                info!(reference, %choice, x = point.x, y = point.y, "grounded element");
                return Ok(point);
            }

            if self.retries >= self.max_retries {
                let point = screen_center(size);
                warn!(
                    reference,
                    retries = self.retries,
                    x = point.x,
                    y = point.y,
                    "no catalog match, falling back to screen center"
                );
                return Ok(point);
            }
            self.retries += 1;
            debug!(reference, retries = self.retries, "no catalog match, detecting again");
        }
    }
}

#[async_trait]
impl Grounder for DetectAndMatch {
    async fn resolve(&mut self, reference: &str, screen: &mut dyn InputBackend) -> Result<Point> {
        let outcome = self.attempt(reference, screen).await;
        self.retries = 0;
        outcome
    }
}
