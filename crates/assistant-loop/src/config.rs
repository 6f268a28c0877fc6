pub const DEFAULT_MAX_STEPS: usize = 2;

/// Configuration for one loop invocation.
#[derive(Debug, Clone)]
pub struct ChatLoopConfig {
    /// Maximum tool invocations per run. The loop makes at most
    /// `max_steps + 1` model calls.
    pub max_steps: usize,
    /// Months of history assumed when a tool request carries no dates.
    pub months_back: u32,
    pub temperature: f32,
}

impl Default for ChatLoopConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            months_back: chat_core::config::DEFAULT_MONTHS_BACK,
            temperature: chat_core::config::DEFAULT_TEMPERATURE,
        }
    }
}

impl ChatLoopConfig {
    pub fn from_config(config: &chat_core::Config) -> Self {
        Self {
            months_back: config.months_back,
            temperature: config.temperature,
            ..Default::default()
        }
    }
}
