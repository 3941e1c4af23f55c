use crate::{
    input::Screenshot,
    message::Message,
    prompt::builder::{build_replan_prompt, build_task_prompt},
};

const ACTIONS: &str = "The available actions are: moving the mouse, left, right or middle clicks, double clicks, \
vertical and horizontal scrolling, dragging, pressing a key, typing a string and pressing a key combination.";

pub fn planner_messages(task: &str, screenshot: Option<Screenshot>) -> Vec<Message> {
    let system = Message::system(format!(
        "You plan how to carry out a task on a computer using only the mouse and the keyboard. \
Break the task into an ordered plan where every step is a single, very simple action. {ACTIONS}"
    ));
    let prompt = build_task_prompt(task);
    let user = match screenshot {
        Some(screenshot) => Message::user_with_image(
            format!("{prompt}\n\nThe attached screenshot shows the current screen."),
            screenshot,
        ),
        None => Message::user(prompt),
    };
    vec![system, user]
}

pub fn replan_messages(
    task: &str,
    plan: &str,
    screenshot: Screenshot,
    last_message: &str,
) -> Vec<Message> {
    let system = Message::system(format!(
        r#"You supervise a computer agent working through a plan. Compare the task, the remaining plan and the current screen, then decide:
- "continue" when the task is not finished yet and the remaining plan still works;
- "replan" with a new plan when the remaining plan will not complete the task. Every step must be a single, very simple action. {ACTIONS}
- "done" when the task has been completed.
Replan only if the remaining plan cannot complete the task."#
    ));
    let user = Message::user_with_image(build_replan_prompt(task, plan, last_message), screenshot);
    vec![system, user]
}
