pub mod history;
pub mod planner;
pub mod agent;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::input::Screenshot;

pub use history::compact_history;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// Plain text, or text paired with a point-in-time screenshot.
#[derive(Debug, Clone)]
pub enum Content {
    Text(String),
    TextWithImage { text: String, image: Screenshot },
}

impl Content {
    pub fn text(&self) -> &str {
        match self {
            Content::Text(text) | Content::TextWithImage { text, .. } => text,
        }
    }

    pub fn image(&self) -> Option<&Screenshot> {
        match self {
            Content::Text(_) => None,
            Content::TextWithImage { image, .. } => Some(image),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

impl fmt::Display for ToolCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}({})", self.name, self.id, self.arguments)
    }
}

/// What a tool hands back: a short description plus the post-action screenshot.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub text: String,
    pub screenshot: Option<Screenshot>,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            screenshot: None,
        }
    }

    pub fn with_screenshot(text: impl Into<String>, screenshot: Screenshot) -> Self {
        Self {
            text: text.into(),
            screenshot: Some(screenshot),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolResult {
    pub id: String,
    pub name: String,
    pub content: ToolOutput,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: Content,
    pub tool_calls: Vec<ToolCall>,
    pub tool_call_id: Option<String>,
    pub name: Option<String>,
}

impl Message {
    fn with_role(role: Role, content: Content) -> Self {
        Self {
            role,
            content,
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::with_role(Role::System, Content::Text(text.into()))
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role(Role::User, Content::Text(text.into()))
    }

    pub fn user_with_image(text: impl Into<String>, image: Screenshot) -> Self {
        Self::with_role(
            Role::User,
            Content::TextWithImage {
                text: text.into(),
                image,
            },
        )
    }

    pub fn assistant(text: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        let mut message = Self::with_role(Role::Assistant, Content::Text(text.into()));
        message.tool_calls = tool_calls;
        message
    }

    pub fn tool(result: ToolResult) -> Self {
        let content = match result.content.screenshot {
            Some(image) => Content::TextWithImage {
                text: result.content.text,
                image,
            },
            None => Content::Text(result.content.text),
        };
        let mut message = Self::with_role(Role::Tool, content);
        message.tool_call_id = Some(result.id);
        message.name = Some(result.name);
        message
    }

    pub fn text(&self) -> &str {
        self.content.text()
    }

    pub fn image(&self) -> Option<&Screenshot> {
        self.content.image()
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    pub fn is_tool(&self) -> bool {
        self.role == Role::Tool
    }
}
