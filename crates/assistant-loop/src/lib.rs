//! The tool-calling orchestration loop: extract a structured request
//! from a model turn, dispatch it against the read-only registry, feed
//! the result back, and stop at the step budget.

pub mod config;
pub mod extract;
pub mod prompt;
pub mod runner;

pub use config::ChatLoopConfig;
pub use extract::extract_tool_call;
pub use prompt::system_prompt;
pub use runner::{run_chat_loop, LoopError, LoopOutcome};
