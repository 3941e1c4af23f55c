use std::{fmt, path::Path, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    agent::{OrchestratorSettings, types::Granularity},
    error::Result,
};

/// 视觉定位策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundingStrategy {
    /// Pixel coordinates only.
    #[default]
    None,
    DetectAndMatch,
    Regression,
}

impl FromStr for GroundingStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "none" => Ok(GroundingStrategy::None),
            "detect_and_match" => Ok(GroundingStrategy::DetectAndMatch),
            "regression" => Ok(GroundingStrategy::Regression),
            other => Err(format!("unknown grounding strategy {other:?}")),
        }
    }
}

impl fmt::Display for GroundingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroundingStrategy::None => write!(f, "none"),
            GroundingStrategy::DetectAndMatch => write!(f, "detect_and_match"),
            GroundingStrategy::Regression => write!(f, "regression"),
        }
    }
}

/// OpenAI 兼容接口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o".to_string(),
            temperature: 0.0,
            timeout_secs: 120,
        }
    }
}

/// 全局配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub oracle: OracleConfig,
    pub granularity: Granularity,
    pub grounding: GroundingStrategy,
    pub detector_url: Option<String>,
    pub pointer_url: Option<String>,
    /// Extra detect-and-match attempts before falling back to the screen center.
    pub max_retries: usize,
    pub recursion_limit: usize,
    pub backoff_secs: u64,
    pub replan_settle_ms: u64,
    pub plan_with_screenshot: bool,
    pub show_desktop: bool,
    pub log_level: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            oracle: OracleConfig::default(),
            granularity: Granularity::default(),
            grounding: GroundingStrategy::default(),
            detector_url: None,
            pointer_url: None,
            max_retries: 3,
            recursion_limit: 100,
            backoff_secs: 20,
            replan_settle_ms: 1000,
            plan_with_screenshot: false,
            show_desktop: false,
            log_level: "info".to_string(),
        }
    }
}

impl GlobalConfig {
    /// Defaults, then the JSON file at `path`, then the environment (`.env` included).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Overlays `DESKPILOT_*` variables plus the usual `OPENAI_API_KEY` / `OPENAI_BASE_URL`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.oracle.api_key = key;
        }
        if let Some(base) = lookup("OPENAI_BASE_URL") {
            self.oracle.api_base = base;
        }
        if let Some(key) = lookup("DESKPILOT_API_KEY") {
            self.oracle.api_key = key;
        }
        if let Some(base) = lookup("DESKPILOT_API_BASE") {
            self.oracle.api_base = base;
        }
        if let Some(model) = lookup("DESKPILOT_MODEL") {
            self.oracle.model = model;
        }
        if let Some(url) = lookup("DESKPILOT_DETECTOR_URL") {
            self.detector_url = Some(url);
        }
        if let Some(url) = lookup("DESKPILOT_POINTER_URL") {
            self.pointer_url = Some(url);
        }
        if let Some(level) = lookup("DESKPILOT_LOG_LEVEL") {
            self.log_level = level;
        }
        parse_env(&lookup, "DESKPILOT_GRANULARITY", &mut self.granularity);
        parse_env(&lookup, "DESKPILOT_GROUNDING", &mut self.grounding);
        parse_env(&lookup, "DESKPILOT_MAX_RETRIES", &mut self.max_retries);
        parse_env(&lookup, "DESKPILOT_RECURSION_LIMIT", &mut self.recursion_limit);
        parse_env(&lookup, "DESKPILOT_BACKOFF_SECS", &mut self.backoff_secs);
        parse_env(&lookup, "DESKPILOT_TEMPERATURE", &mut self.oracle.temperature);
        parse_env(&lookup, "DESKPILOT_SHOW_DESKTOP", &mut self.show_desktop);
        parse_env(&lookup, "DESKPILOT_PLAN_WITH_SCREENSHOT", &mut self.plan_with_screenshot);
    }

    pub fn orchestrator_settings(&self) -> OrchestratorSettings {
        OrchestratorSettings {
            granularity: self.granularity,
            recursion_limit: self.recursion_limit,
            backoff: Duration::from_secs(self.backoff_secs),
            replan_settle: Duration::from_millis(self.replan_settle_ms),
            plan_with_screenshot: self.plan_with_screenshot,
        }
    }
}

fn parse_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T)
where
    T: FromStr,
    T::Err: fmt::Display,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *slot = value,
            Err(e) => warn!(key, value = %raw, error = %e, "ignoring invalid environment value"),
        }
    }
}
