use async_trait::async_trait;
use thiserror::Error;

use chat_core::Message;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

/// One blocking chat completion: the full ordered transcript in, one
/// assistant turn out. Upstream failures surface as errors; there is no
/// retry at this layer.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn send(&self, messages: &[Message], temperature: f32) -> Result<Message>;
}
