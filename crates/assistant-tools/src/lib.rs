//! The fixed tool set the model may request, plus the registry and the
//! dispatch boundary that converts every failure into an error-shaped
//! result instead of letting it reach the chat loop.

pub mod dates;
pub mod dispatch;
pub mod registry;
pub mod tools;

pub use dispatch::{dispatch, ToolError, ToolRequest};
pub use registry::{RegistryError, SharedTool, Tool, ToolRegistry};
pub use tools::{builtin_registry, BUILTIN_TOOL_NAMES};
