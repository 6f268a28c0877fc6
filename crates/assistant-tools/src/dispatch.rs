use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::registry::ToolRegistry;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{0}")]
    Provider(#[from] lunchmoney_client::LunchMoneyError),

    #[error("Execution failed: {0}")]
    Execution(String),
}

pub type Result<T> = std::result::Result<T, ToolError>;

/// The structured payload extracted from a model turn. A request whose
/// `tool` names nothing in the registry is reported, not raised.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolRequest {
    #[serde(default)]
    pub tool: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl ToolRequest {
    pub fn new(tool: impl Into<String>, args: Map<String, Value>) -> Self {
        Self {
            tool: tool.into(),
            args,
        }
    }
}

/// Executes one tool request. This boundary never raises: unknown names
/// and executor failures of any kind come back as `{"error": ...}` so the
/// loop can feed them to the model like any other result.
pub async fn dispatch(registry: &ToolRegistry, request: &ToolRequest) -> Value {
    let Some(tool) = registry.get(&request.tool) else {
        log::warn!("dispatch: unknown tool {:?}", request.tool);
        return json!({ "error": format!("Unknown tool: {}", request.tool) });
    };

    match tool.execute(request.args.clone()).await {
        Ok(result) => result,
        Err(error) => {
            log::warn!("dispatch: {} failed: {error}", request.tool);
            json!({ "error": error.to_string() })
        }
    }
}
