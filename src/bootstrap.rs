use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::{
    agent::Orchestrator,
    error::{Result, agent_error::AgentError},
    grounding::{DetectAndMatch, DirectRegression, Grounder, HttpDetector, HttpPointerModel},
    input::{Desktop, NativeBackend},
    oracle::{OpenAiOracle, Oracle},
    shared::{GlobalConfig, GroundingStrategy},
};

/// Installs the fmt subscriber. `RUST_LOG` wins over `level` when set.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Wires the native desktop, the HTTP oracle and the configured grounder.
pub fn build_orchestrator(config: &GlobalConfig) -> Result<Orchestrator> {
    let oracle: Arc<dyn Oracle> = Arc::new(OpenAiOracle::new(config.oracle.clone())?);
    let mut desktop = Desktop::new(Box::new(NativeBackend::new()?));
    if let Some(grounder) = build_grounder(config, oracle.clone())? {
        desktop = desktop.with_grounder(grounder);
    }
    Ok(Orchestrator::new(oracle, desktop, config.orchestrator_settings()))
}

pub fn build_grounder(config: &GlobalConfig, oracle: Arc<dyn Oracle>) -> Result<Option<Box<dyn Grounder>>> {
    let grounder: Box<dyn Grounder> = match config.grounding {
        GroundingStrategy::None => return Ok(None),
        GroundingStrategy::DetectAndMatch => {
            let url = required_url(config.detector_url.as_deref(), "detector_url", config.grounding)?;
            Box::new(
                DetectAndMatch::new(Box::new(HttpDetector::new(url)?), oracle)
                    .with_max_retries(config.max_retries),
            )
        }
        GroundingStrategy::Regression => {
            let url = required_url(config.pointer_url.as_deref(), "pointer_url", config.grounding)?;
            Box::new(DirectRegression::new(Box::new(HttpPointerModel::new(url)?)))
        }
    };
    Ok(Some(grounder))
}

fn required_url<'a>(url: Option<&'a str>, field: &str, strategy: GroundingStrategy) -> Result<&'a str> {
    url.filter(|url| !url.trim().is_empty()).ok_or_else(|| {
        AgentError::Grounding(format!("grounding strategy `{strategy}` needs `{field}`")).into()
    })
}
