use crate::tools::{ToolInfo, ToolKind};

pub fn instantiate_tools(grounding: bool) -> Vec<ToolInfo> {
    ToolKind::ALL
        .iter()
        .map(|kind| ToolInfo::new(kind.name(), kind.description(), kind.params_schema(grounding)))
        .collect()
}
