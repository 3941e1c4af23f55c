use crate::tools::ToolInfo;

pub fn build_task_prompt(task: &str) -> String {
    format!("Task: {task}")
}

pub fn build_step_prompt(step: &str) -> String {
    format!("step to be performed: {step}")
}

/// Whole-plan hand-off for single-shot execution.
pub fn build_plan_prompt(task: &str, plan: &str) -> String {
    format!("Task: {task}\n\nPlan:\n{plan}")
}

pub fn build_replan_prompt(task: &str, plan: &str, last_message: &str) -> String {
    let plan = if plan.is_empty() { "(no steps left)" } else { plan };
    let last_message = if last_message.trim().is_empty() {
        "(none)"
    } else {
        last_message
    };
    format!("Task: {task}\n\nRemaining plan:\n{plan}\n\nLast agent message: {last_message}")
}

pub fn build_element_choice_prompt(reference: &str, catalog: &str) -> String {
    format!(
        r#"The screenshot shows a desktop. These elements were detected on it:

{catalog}

Which entry is "{reference}"? Answer with the label number or the exact text of one entry above.
Never invent text that is not in the list. If nothing fits, answer with an empty name."#
    )
}

pub fn build_tools_prompt(tools: &[ToolInfo]) -> String {
    let tools_text = tools
        .iter()
        .map(|tool| {
            format!(
                "- {}({}) - {}",
                tool.name,
                param_list(&tool.params_schema),
                tool.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Available tools:\n{tools_text}\n\nThese are the ONLY tools available. Do not use or reference any other tools."
    )
}

fn param_list(schema: &serde_json::Value) -> String {
    schema["properties"]
        .as_object()
        .map(|properties| properties.keys().cloned().collect::<Vec<_>>().join(", "))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::instantiate::instantiate_tools;

    #[test]
    fn replan_prompt_marks_missing_parts() {
        let prompt = build_replan_prompt("open notepad", "", " ");
        assert!(prompt.contains("(no steps left)"));
        assert!(prompt.contains("Last agent message: (none)"));
    }

    #[test]
    fn tools_prompt_lists_parameters() {
        let prompt = build_tools_prompt(&instantiate_tools(false));
        assert!(prompt.contains("- scroll(delta, direction)"));
        assert!(prompt.contains("- press_key(key)"));
    }
}
