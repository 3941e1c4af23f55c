use std::{sync::Arc, time::Duration};

use tracing::info;

use crate::{
    agent::{
        planning::{Plan, ReplanDecision},
        task::Task,
    },
    error::Result,
    input::Screenshot,
    message::planner::{planner_messages, replan_messages},
    oracle::{Oracle, invoke_structured, with_backoff},
};

/// Default wait before the single retry of an overloaded oracle.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(20);

/// Structured PLANNING and REPLANNING calls against the oracle.
pub struct Planner {
    oracle: Arc<dyn Oracle>,
    backoff: Duration,
}

impl Planner {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            oracle,
            backoff: DEFAULT_BACKOFF,
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub async fn plan(&self, task: &Task, screenshot: Option<Screenshot>) -> Result<Plan> {
        let messages = planner_messages(task.as_str(), screenshot);
        let plan: Plan = with_backoff("plan", self.backoff, || {
            invoke_structured(self.oracle.as_ref(), &messages)
        })
        .await?;
        info!(steps = plan.len(), "📜 plan generated");
        Ok(plan)
    }

    pub async fn replan(
        &self,
        task: &Task,
        plan: &Plan,
        screenshot: Screenshot,
        last_message: &str,
    ) -> Result<ReplanDecision> {
        let messages = replan_messages(task.as_str(), &plan.render(), screenshot, last_message);
        let decision: ReplanDecision = with_backoff("replan", self.backoff, || {
            invoke_structured(self.oracle.as_ref(), &messages)
        })
        .await?;
        info!(?decision, "replan decision");
        Ok(decision)
    }
}
