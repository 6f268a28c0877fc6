use serde::{Deserialize, Serialize};

pub const DEFAULT_LUNCHMONEY_BASE_URL: &str = "https://dev.lunchmoney.app/v1";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1:8b";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MONTHS_BACK: u32 = 3;

/// Process-wide configuration, built once at startup and passed by
/// reference to every client. Nothing reads the environment after this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Lunch Money bearer token. Absence is a configuration error raised
    /// by the provider client before any network call.
    pub lunchmoney_token: Option<String>,
    pub lunchmoney_base_url: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub temperature: f32,
    /// Months of history to assume when a tool request carries no dates.
    pub months_back: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lunchmoney_token: None,
            lunchmoney_base_url: DEFAULT_LUNCHMONEY_BASE_URL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            months_back: DEFAULT_MONTHS_BACK,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(token) = std::env::var("LUNCHMONEY_TOKEN") {
            if !token.trim().is_empty() {
                config.lunchmoney_token = Some(token);
            }
        }
        if let Ok(base) = std::env::var("LUNCHMONEY_BASE_URL") {
            if !base.trim().is_empty() {
                config.lunchmoney_base_url = normalize_base_url(&base);
            }
        }
        if let Ok(url) = std::env::var("OLLAMA_URL") {
            if !url.trim().is_empty() {
                config.ollama_url = normalize_base_url(&url);
            }
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            if !model.trim().is_empty() {
                config.ollama_model = model;
            }
        }
        if let Ok(temperature) = std::env::var("OLLAMA_TEMPERATURE") {
            match temperature.trim().parse::<f32>() {
                Ok(value) => config.temperature = value,
                Err(_) => log::warn!(
                    "Ignoring unparseable OLLAMA_TEMPERATURE: {temperature:?}"
                ),
            }
        }
        if let Ok(months) = std::env::var("LM_DEFAULT_MONTHS_BACK") {
            match parse_months_back(&months) {
                Some(value) => config.months_back = value,
                None => log::warn!(
                    "Ignoring out-of-range LM_DEFAULT_MONTHS_BACK: {months:?}"
                ),
            }
        }

        config
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Accepts 1..=24 months, matching the range the original settings UI offered.
fn parse_months_back(value: &str) -> Option<u32> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|months| (1..=24).contains(months))
}
