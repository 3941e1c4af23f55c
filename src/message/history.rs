use crate::message::{Content, Message, Role};

/// Placeholder left behind once a tool result has been seen by the oracle.
pub const CONSUMED_TOOL_OUTPUT: &str = "[output consumed]";

/// Bounds context growth between oracle rounds.
///
/// Tool results from rounds before the latest assistant tool-call message are
/// cleared. Only the most recent tool result that carries a screenshot keeps
/// it, wherever it sits, so the newest image is always the last one in context.
pub fn compact_history(history: &mut [Message]) {
    let Some(boundary) = history
        .iter()
        .rposition(|m| m.role == Role::Assistant && m.has_tool_calls())
    else {
        return;
    };
    let newest_image = history
        .iter()
        .rposition(|m| m.is_tool() && m.image().is_some());

    for (index, message) in history.iter_mut().enumerate() {
        if !message.is_tool() {
            continue;
        }
        let keep_image = Some(index) == newest_image;
        if index < boundary {
            consume(message, keep_image);
        } else if !keep_image {
            drop_image(message);
        }
    }
}

fn consume(message: &mut Message, keep_image: bool) {
    message.content = match (&message.content, keep_image) {
        (Content::TextWithImage { image, .. }, true) => Content::TextWithImage {
            text: CONSUMED_TOOL_OUTPUT.to_string(),
            image: image.clone(),
        },
        _ => Content::Text(CONSUMED_TOOL_OUTPUT.to_string()),
    };
}

fn drop_image(message: &mut Message) {
    if let Content::TextWithImage { text, .. } = &message.content {
        message.content = Content::Text(text.clone());
    }
}
