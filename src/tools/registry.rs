use std::collections::HashMap;

use tracing::debug;

use crate::{
    error::Result,
    input::Desktop,
    message::{ToolCall, ToolOutput},
    tools::{ToolAction, ToolInfo, ToolKind, instantiate::instantiate_tools},
};

/// Result text for a call naming a tool that is not bound.
pub const BAD_TOOL_NAME: &str = "bad tool name, retry";

/// The tool set bound to one action loop: a name lookup table over the
/// closed primitive set, dispatched against a borrowed desktop.
pub struct ToolSet<'a> {
    desktop: &'a mut Desktop,
    table: HashMap<&'static str, ToolKind>,
    infos: Vec<ToolInfo>,
}

impl<'a> ToolSet<'a> {
    pub fn new(desktop: &'a mut Desktop) -> Self {
        let table = ToolKind::ALL.iter().map(|kind| (kind.name(), *kind)).collect();
        let infos = instantiate_tools(desktop.has_grounder());
        Self {
            desktop,
            table,
            infos,
        }
    }

    pub fn get(&self, name: &str) -> Option<ToolKind> {
        self.table.get(name).copied()
    }

    /// Capabilities declared to the oracle on every round.
    pub fn infos(&self) -> &[ToolInfo] {
        &self.infos
    }

    pub async fn execute(&mut self, kind: ToolKind, call: &ToolCall) -> Result<ToolOutput> {
        let action = ToolAction::parse(kind, &call.arguments)?;
        debug!(tool = kind.name(), id = %call.id, ?action, "executing tool");
        let screenshot = action.perform(self.desktop).await?;
        Ok(ToolOutput::with_screenshot(action.describe(), screenshot))
    }
}
