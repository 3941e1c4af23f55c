use serde::Serialize;
use serde_json::Value;

/// A capability declared to the oracle: name, purpose and JSON-schema arguments.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub params_schema: Value,
}

impl ToolInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>, params_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params_schema,
        }
    }
}
