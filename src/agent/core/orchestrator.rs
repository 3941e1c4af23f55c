use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    agent::{
        execution::{ActionLoop, StepBudget, budget::DEFAULT_RECURSION_LIMIT},
        planning::{Plan, Planner, ReplanDecision, Step, planner::DEFAULT_BACKOFF},
        task::Task,
        types::{Granularity, Phase},
    },
    error::{Result, agent_error::AgentError},
    input::Desktop,
    message::{Message, agent::agent_system_message},
    oracle::Oracle,
    prompt::builder::{build_plan_prompt, build_step_prompt},
    tools::ToolSet,
};

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub granularity: Granularity,
    pub recursion_limit: usize,
    pub backoff: Duration,
    /// Pause before the replan screenshot so the last action can settle.
    pub replan_settle: Duration,
    pub plan_with_screenshot: bool,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            granularity: Granularity::default(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            backoff: DEFAULT_BACKOFF,
            replan_settle: Duration::from_millis(1000),
            plan_with_screenshot: false,
        }
    }
}

/// Outcome of one finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub task: Task,
    pub history: Vec<Message>,
    /// Steps popped by step-wise acting rounds, in execution order.
    pub steps_completed: Vec<Step>,
    pub final_plan: Plan,
    pub planning_rounds: usize,
    pub acting_rounds: usize,
    pub replanning_rounds: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Plan–Act–Replan state machine driving one task to completion.
pub struct Orchestrator {
    oracle: Arc<dyn Oracle>,
    planner: Planner,
    desktop: Desktop,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    pub fn new(oracle: Arc<dyn Oracle>, desktop: Desktop, settings: OrchestratorSettings) -> Self {
        let planner = Planner::new(oracle.clone()).with_backoff(settings.backoff);
        Self {
            oracle,
            planner,
            desktop,
            settings,
        }
    }

    pub fn desktop_mut(&mut self) -> &mut Desktop {
        &mut self.desktop
    }

    pub async fn run(&mut self, task: Task) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, %task, granularity = ?self.settings.granularity, "🚀 starting task");

        let mut budget = StepBudget::new(self.settings.recursion_limit);
        let mut phase = Phase::Planning;
        let mut plan = Plan::default();
        let mut history: Vec<Message> = Vec::new();
        let mut steps_completed = Vec::new();
        let (mut planning_rounds, mut acting_rounds, mut replanning_rounds) = (0, 0, 0);

        loop {
            debug!(%phase, budget_used = budget.used(), "entering phase");
            phase = match phase {
                Phase::Planning => {
                    budget.charge()?;
                    planning_rounds += 1;
                    plan = self.plan(&task).await?;
                    let rendered = plan.render();
                    info!("📋 plan:\n{rendered}");
                    history.push(Message::assistant(rendered, Vec::new()));
                    Phase::Acting
                }
                Phase::Acting => {
                    budget.charge()?;
                    acting_rounds += 1;
                    let messages = self.act(&task, &plan, &mut budget).await?;
                    history.extend(messages);
                    if self.settings.granularity == Granularity::StepWise
                        && let Some(step) = plan.pop_front()
                    {
                        info!(step = %step, remaining = plan.len(), "✅ step finished");
                        steps_completed.push(step);
                    }
                    Phase::Replanning
                }
                Phase::Replanning => {
                    budget.charge()?;
                    replanning_rounds += 1;
                    tokio::time::sleep(self.settings.replan_settle).await;
                    let screenshot = self.desktop.capture()?;
                    let last_message = history.last().map(Message::text).unwrap_or_default();
                    let decision = self
                        .planner
                        .replan(&task, &plan, screenshot, last_message)
                        .await?;
                    transition(decision, &mut plan)
                }
                Phase::Done => break,
            };
        }

        info!(
            %run_id,
            planning_rounds,
            acting_rounds,
            replanning_rounds,
            "🎉 task finished"
        );
        Ok(RunReport {
            run_id,
            task,
            history,
            steps_completed,
            final_plan: plan,
            planning_rounds,
            acting_rounds,
            replanning_rounds,
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn plan(&mut self, task: &Task) -> Result<Plan> {
        let screenshot = if self.settings.plan_with_screenshot {
            Some(self.desktop.capture()?)
        } else {
            None
        };
        let plan = self.planner.plan(task, screenshot).await?;
        if plan.is_empty() {
            return Err(AgentError::EmptyPlan.into());
        }
        Ok(plan)
    }

    /// One acting round: hand the next step (or the whole plan) to a fresh action loop.
    async fn act(&mut self, task: &Task, plan: &Plan, budget: &mut StepBudget) -> Result<Vec<Message>> {
        let prompt = match self.settings.granularity {
            Granularity::StepWise => {
                let step = plan.front().ok_or(AgentError::EmptyPlan)?;
                info!(step = %step, "👉 acting on step");
                build_step_prompt(&step.step)
            }
            Granularity::SingleShot => build_plan_prompt(task.as_str(), &plan.render()),
        };

        let screen_size = self.desktop.screen_size()?;
        let screenshot = self.desktop.capture()?;
        let grounding = self.desktop.has_grounder();
        let tools = ToolSet::new(&mut self.desktop);
        let system = vec![agent_system_message(screen_size, tools.infos(), grounding)];

        let mut action_loop = ActionLoop::new(self.oracle.as_ref(), tools, system);
        action_loop
            .run(vec![Message::user_with_image(prompt, screenshot)], budget)
            .await
    }
}

/// Next phase after a replan decision; mutates `plan` for `Replan`.
pub fn transition(decision: ReplanDecision, plan: &mut Plan) -> Phase {
    match decision {
        ReplanDecision::Done => Phase::Done,
        ReplanDecision::Replan { plan: steps } => {
            *plan = Plan::from_steps(steps);
            if plan.is_empty() {
                warn!("replan returned no steps, treating the task as done");
                Phase::Done
            } else {
                info!("🔄 replanned:\n{}", plan.render());
                Phase::Acting
            }
        }
        ReplanDecision::Continue if plan.is_empty() => Phase::Done,
        ReplanDecision::Continue => Phase::Acting,
    }
}
