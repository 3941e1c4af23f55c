mod common;

use std::{sync::Arc, time::Duration};

use common::{RecordingBackend, ScriptedOracle, text_reply};
use deskpilot::{
    agent::{Granularity, Orchestrator, OrchestratorSettings, Step, Task},
    error::{Error, agent_error::AgentError, oracle_error::OracleError},
    input::Desktop,
};
use serde_json::{Value, json};

fn settings(granularity: Granularity) -> OrchestratorSettings {
    OrchestratorSettings {
        granularity,
        recursion_limit: 100,
        backoff: Duration::ZERO,
        replan_settle: Duration::ZERO,
        plan_with_screenshot: false,
    }
}

fn plan_reply(steps: &[&str]) -> Value {
    json!({ "plan": steps.iter().map(|s| json!({"step": s})).collect::<Vec<_>>() })
}

fn decision(name: &str) -> Value {
    json!({ "decision": name })
}

fn orchestrator(oracle: &Arc<ScriptedOracle>, granularity: Granularity) -> (Orchestrator, RecordingBackend) {
    let backend = RecordingBackend::new();
    let desktop = Desktop::new(Box::new(backend.clone()));
    (
        Orchestrator::new(oracle.clone(), desktop, settings(granularity)),
        backend,
    )
}

fn step_texts(steps: &[Step]) -> Vec<&str> {
    steps.iter().map(|s| s.step.as_str()).collect()
}

#[tokio::test]
async fn continue_continue_done_runs_three_acting_rounds() {
    let oracle = Arc::new(
        ScriptedOracle::new()
            .then_structured(plan_reply(&["open start menu", "search notepad", "press enter"]))
            .then_structured(decision("continue"))
            .then_structured(decision("continue"))
            .then_structured(decision("done")),
    );
    let (mut orchestrator, _backend) = orchestrator(&oracle, Granularity::StepWise);

    let report = orchestrator.run(Task::new("open notepad").unwrap()).await.unwrap();

    assert_eq!(report.planning_rounds, 1);
    assert_eq!(report.acting_rounds, 3);
    assert_eq!(report.replanning_rounds, 3);
    assert!(report.final_plan.is_empty());
    assert_eq!(
        oracle.structured_calls(),
        vec!["plan", "replan_decision", "replan_decision", "replan_decision"]
    );
}

#[tokio::test]
async fn notepad_scenario_pops_one_step_per_round() {
    let steps = ["open start menu", "search notepad", "press enter", "type hi"];
    let oracle = Arc::new(
        ScriptedOracle::new()
            .then_structured(plan_reply(&steps))
            .then_structured(decision("continue"))
            .then_structured(decision("continue"))
            .then_structured(decision("continue"))
            .then_structured(decision("done")),
    );
    let (mut orchestrator, _backend) = orchestrator(&oracle, Granularity::StepWise);

    let report = orchestrator
        .run(Task::new("open notepad and type 'hi'").unwrap())
        .await
        .unwrap();

    assert_eq!(report.acting_rounds, 4);
    assert!(report.final_plan.is_empty());
    assert_eq!(step_texts(&report.steps_completed), steps);
    assert_eq!(
        report.history[0].text(),
        "1. open start menu\n2. search notepad\n3. press enter\n4. type hi"
    );

    let requests = oracle.chat_requests.lock().unwrap();
    let first_user = requests[0].iter().find(|m| m.image().is_some()).unwrap();
    assert_eq!(first_user.text(), "step to be performed: open start menu");
    let last_user = requests[3].iter().find(|m| m.image().is_some()).unwrap();
    assert_eq!(last_user.text(), "step to be performed: type hi");
}

#[tokio::test]
async fn replan_replaces_the_remaining_steps() {
    let oracle = Arc::new(
        ScriptedOracle::new()
            .then_structured(plan_reply(&["click file", "click save"]))
            .then_structured(json!({
                "decision": "replan",
                "plan": [{"step": "press ctrl+s"}, {"step": "press enter"}],
            }))
            .then_structured(decision("continue"))
            .then_structured(decision("continue")),
    );
    let (mut orchestrator, _backend) = orchestrator(&oracle, Granularity::StepWise);

    let report = orchestrator.run(Task::new("save the file").unwrap()).await.unwrap();

    assert_eq!(report.acting_rounds, 3);
    assert_eq!(report.replanning_rounds, 3);
    assert_eq!(
        step_texts(&report.steps_completed),
        ["click file", "press ctrl+s", "press enter"]
    );
}

#[tokio::test]
async fn single_shot_hands_over_the_whole_plan() {
    let oracle = Arc::new(
        ScriptedOracle::new()
            .then_structured(plan_reply(&["open start menu", "search notepad"]))
            .then_structured(decision("done"))
            .then_chat(text_reply("notepad is open")),
    );
    let (mut orchestrator, _backend) = orchestrator(&oracle, Granularity::SingleShot);

    let report = orchestrator.run(Task::new("open notepad").unwrap()).await.unwrap();

    assert_eq!(report.acting_rounds, 1);
    assert_eq!(report.final_plan.len(), 2);
    assert!(report.steps_completed.is_empty());
    assert_eq!(report.history.last().unwrap().text(), "notepad is open");

    let requests = oracle.chat_requests.lock().unwrap();
    let user = requests[0].iter().find(|m| m.image().is_some()).unwrap();
    assert_eq!(
        user.text(),
        "Task: open notepad\n\nPlan:\n1. open start menu\n2. search notepad"
    );
}

#[tokio::test]
async fn overloaded_planner_is_retried_once() {
    let oracle = Arc::new(
        ScriptedOracle::new()
            .then_structured_error(OracleError::RateLimited("overloaded".into()))
            .then_structured(plan_reply(&["press win"]))
            .then_structured_error(OracleError::RateLimited("overloaded".into()))
            .then_structured(decision("done")),
    );
    let (mut orchestrator, _backend) = orchestrator(&oracle, Granularity::StepWise);

    let report = orchestrator.run(Task::new("open the start menu").unwrap()).await.unwrap();

    assert_eq!(report.planning_rounds, 1);
    assert_eq!(report.replanning_rounds, 1);
    assert_eq!(
        oracle.structured_calls(),
        vec!["plan", "plan", "replan_decision", "replan_decision"]
    );
}

#[tokio::test]
async fn second_overload_is_fatal() {
    let oracle = Arc::new(
        ScriptedOracle::new()
            .then_structured_error(OracleError::RateLimited("overloaded".into()))
            .then_structured_error(OracleError::RateLimited("overloaded".into()))
            .then_structured(plan_reply(&["never used"])),
    );
    let (mut orchestrator, backend) = orchestrator(&oracle, Granularity::StepWise);

    let err = orchestrator.run(Task::new("anything").unwrap()).await.unwrap_err();

    assert!(matches!(err, Error::OracleError(OracleError::RateLimited(_))));
    assert_eq!(oracle.structured_calls().len(), 2);
    assert!(backend.events().is_empty());
}

#[tokio::test]
async fn non_retryable_oracle_errors_are_not_retried() {
    let oracle = Arc::new(
        ScriptedOracle::new()
            .then_structured_error(OracleError::Status {
                status: 401,
                body: "bad key".into(),
            })
            .then_structured(plan_reply(&["never used"])),
    );
    let (mut orchestrator, _backend) = orchestrator(&oracle, Granularity::StepWise);

    let err = orchestrator.run(Task::new("anything").unwrap()).await.unwrap_err();

    assert!(matches!(err, Error::OracleError(OracleError::Status { status: 401, .. })));
    assert_eq!(oracle.structured_calls().len(), 1);
}

#[tokio::test]
async fn empty_plan_is_rejected() {
    let oracle = Arc::new(ScriptedOracle::new().then_structured(plan_reply(&[])));
    let (mut orchestrator, _backend) = orchestrator(&oracle, Granularity::StepWise);

    let err = orchestrator.run(Task::new("anything").unwrap()).await.unwrap_err();

    assert!(matches!(err, Error::AgentError(AgentError::EmptyPlan)));
    assert_eq!(oracle.chat_calls(), 0);
}

#[tokio::test]
async fn recursion_limit_covers_nested_oracle_rounds() {
    let oracle = Arc::new(ScriptedOracle::new().then_structured(plan_reply(&["press win"])));
    let backend = RecordingBackend::new();
    let desktop = Desktop::new(Box::new(backend.clone()));
    let mut settings = settings(Granularity::StepWise);
    settings.recursion_limit = 2;
    let mut orchestrator = Orchestrator::new(oracle.clone(), desktop, settings);

    let err = orchestrator.run(Task::new("open the start menu").unwrap()).await.unwrap_err();

    // planning and acting spend the budget before the first agent round
    assert!(matches!(err, Error::AgentError(AgentError::RecursionLimit(2))));
    assert_eq!(oracle.chat_calls(), 0);
}

#[tokio::test]
async fn replanning_looks_at_a_fresh_screenshot() {
    let oracle = Arc::new(
        ScriptedOracle::new()
            .then_structured(plan_reply(&["press win"]))
            .then_structured(decision("done")),
    );
    let (mut orchestrator, backend) = orchestrator(&oracle, Granularity::StepWise);

    orchestrator.run(Task::new("open the start menu").unwrap()).await.unwrap();

    // one capture for the acting round's context, one before the replan judgment
    assert_eq!(backend.captures(), 2);
}
