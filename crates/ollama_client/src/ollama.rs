use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use chat_core::{Config, Message};

use crate::provider::{ModelClient, ModelError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: config.ollama_url.trim_end_matches('/').to_string(),
            model: config.ollama_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ModelClient for OllamaClient {
    async fn send(&self, messages: &[Message], temperature: f32) -> Result<Message> {
        let url = format!("{}/api/chat", self.base_url);
        log::debug!(
            "POST {url} model={} messages={}",
            self.model,
            messages.len()
        );

        let response = self
            .http
            .post(&url)
            .json(&ChatRequest {
                model: &self.model,
                messages,
                stream: false,
                options: ChatOptions { temperature },
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api(format!(
                "{} {}",
                status.as_u16(),
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("request failed")
                } else {
                    body.as_str()
                }
            )));
        }

        let body: Value = response.json().await?;
        Ok(parse_assistant_turn(&body))
    }
}

/// Ollama replies with a `message` object; some endpoints return a bare
/// `response` string instead. Either way the result is one assistant turn.
fn parse_assistant_turn(body: &Value) -> Message {
    let content = body
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .or_else(|| body.get("response").and_then(Value::as_str))
        .unwrap_or_default();
    Message::assistant(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::Role;
    use serde_json::json;

    #[test]
    fn parse_assistant_turn_prefers_message_object() {
        let body = json!({
            "message": {"role": "assistant", "content": "Your total is $42."},
            "response": "ignored"
        });
        let turn = parse_assistant_turn(&body);
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content, "Your total is $42.");
    }

    #[test]
    fn parse_assistant_turn_falls_back_to_response_field() {
        let body = json!({"response": "fallback text"});
        assert_eq!(parse_assistant_turn(&body).content, "fallback text");
    }

    #[test]
    fn parse_assistant_turn_tolerates_empty_body() {
        assert_eq!(parse_assistant_turn(&json!({})).content, "");
    }

    #[test]
    fn chat_request_serializes_wire_shape() {
        let messages = vec![Message::user("hello")];
        let request = ChatRequest {
            model: "llama3.1:8b",
            messages: &messages,
            stream: false,
            options: ChatOptions { temperature: 0.2 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3.1:8b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
        assert!((json["options"]["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }
}
