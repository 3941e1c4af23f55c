use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::{Result, agent_error::AgentError},
    grounding::{CatalogEntry, Detector, ElementCatalog, PointerModel},
    input::Screenshot,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct DetectRequest<'a> {
    image: String,
    mime: &'a str,
}

#[derive(Deserialize)]
struct DetectResponse {
    elements: Vec<CatalogEntry>,
}

#[derive(Serialize)]
struct LocateRequest<'a> {
    image: String,
    mime: &'a str,
    instruction: &'a str,
}

#[derive(Deserialize)]
struct LocateResponse {
    topk_points: Vec<[f64; 2]>,
}

fn grounding_error(service: &str, err: impl std::fmt::Display) -> AgentError {
    AgentError::Grounding(format!("{service}: {err}"))
}

fn client(service: &str) -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| grounding_error(service, e).into())
}

async fn post_json<B: Serialize, R: DeserializeOwned>(
    client: &Client,
    url: &str,
    service: &str,
    body: &B,
) -> Result<R> {
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| grounding_error(service, e))?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(grounding_error(service, format!("HTTP {status}: {body}")).into());
    }
    Ok(response.json().await.map_err(|e| grounding_error(service, e))?)
}

/// Detection + captioning service reached over HTTP.
///
/// Request: `{"image": <base64>, "mime": ...}`.
/// Response: `{"elements": [{"content": ..., "bbox": [x0, y0, x1, y1]}]}` in normalized coordinates.
pub struct HttpDetector {
    client: Client,
    url: String,
}

impl HttpDetector {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: client("detector")?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Detector for HttpDetector {
    async fn detect(&self, screenshot: &Screenshot) -> Result<ElementCatalog> {
        let body = DetectRequest {
            image: screenshot.to_base64(),
            mime: screenshot.mime(),
        };
        let response: DetectResponse = post_json(&self.client, &self.url, "detector", &body).await?;
        debug!(elements = response.elements.len(), "detector response");
        Ok(ElementCatalog::from_entries(response.elements))
    }
}

/// Pointer regression service reached over HTTP.
///
/// Response: `{"topk_points": [[x, y], ...]}`, best first, normalized.
pub struct HttpPointerModel {
    client: Client,
    url: String,
}

impl HttpPointerModel {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: client("pointer model")?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PointerModel for HttpPointerModel {
    async fn locate(&self, screenshot: &Screenshot, reference: &str) -> Result<Vec<(f64, f64)>> {
        let body = LocateRequest {
            image: screenshot.to_base64(),
            mime: screenshot.mime(),
            instruction: reference,
        };
        let response: LocateResponse = post_json(&self.client, &self.url, "pointer model", &body).await?;
        Ok(response.topk_points.into_iter().map(|[x, y]| (x, y)).collect())
    }
}
