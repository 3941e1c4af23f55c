use crate::{message::Message, prompt::builder::build_tools_prompt, tools::ToolInfo};

/// System prompt for the action loop, sized to the live screen.
pub fn agent_system_message(screen_size: (u32, u32), tools: &[ToolInfo], grounding: bool) -> Message {
    let (width, height) = screen_size;
    let targeting = if grounding {
        "Pointer tools accept either pixel coordinates (`x`, `y`) or an `element` description such as \"the Save button\"; prefer `element` when the target has a visible label."
    } else {
        "Pointer tools take pixel coordinates (`x`, `y`) measured from the top-left corner of the screen."
    };

    let content = format!(
        r#"You operate a computer through its mouse and keyboard to carry out the given task or step.

{tools}

Conventions:
- The screen is {width}x{height} pixels. {targeting}
- scroll: a negative vertical delta scrolls down, a positive one scrolls up.
- press_key and key_combination take key names or the symbol printed on the key (enter, shift, ctrl, alt, win, f5, a, 1, !, @), never numeric key codes.
- type_string takes the literal text, including spaces, newlines (\n) and tabs (\t).

You receive a screenshot together with the instruction. Every tool returns a new screenshot taken after the action, use it to decide what to do next. You may call several tools in one reply.
When the instruction has been carried out, reply without tool calls and describe what was done."#,
        tools = build_tools_prompt(tools),
    );
    Message::system(content)
}
