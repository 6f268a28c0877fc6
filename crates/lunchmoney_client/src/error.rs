use thiserror::Error;

#[derive(Debug, Error)]
pub enum LunchMoneyError {
    #[error("Missing LUNCHMONEY_TOKEN")]
    MissingToken,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed: {status} {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LunchMoneyError>;
