pub mod action;
pub mod instantiate;
pub mod model;
pub mod registry;

pub use action::{ToolAction, ToolKind};
pub use model::ToolInfo;
pub use registry::{BAD_TOOL_NAME, ToolSet};
