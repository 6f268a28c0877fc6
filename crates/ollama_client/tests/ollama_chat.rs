//! Integration tests for OllamaClient against a mock HTTP server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chat_core::{Config, Message, Role};
use ollama_client::{ModelClient, ModelError, OllamaClient};

fn client_for(server: &MockServer) -> OllamaClient {
    let config = Config {
        ollama_url: server.uri(),
        ollama_model: "llama3.1:8b".to_string(),
        ..Config::default()
    };
    OllamaClient::new(&config).expect("client should build")
}

#[tokio::test]
async fn send_posts_transcript_and_returns_assistant_turn() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "llama3.1:8b",
            "stream": false,
            "messages": [
                {"role": "system", "content": "be helpful"},
                {"role": "user", "content": "how much on gas?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": "You spent $120 on gas."}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let transcript = vec![
        Message::system("be helpful"),
        Message::user("how much on gas?"),
    ];

    let turn = client.send(&transcript, 0.2).await.unwrap();
    assert_eq!(turn.role, Role::Assistant);
    assert_eq!(turn.content, "You spent $120 on gas.");
}

#[tokio::test]
async fn non_2xx_is_a_fatal_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let error = client
        .send(&[Message::user("hi")], 0.2)
        .await
        .expect_err("500 should fail");

    match error {
        ModelError::Api(message) => {
            assert!(message.contains("500"));
            assert!(message.contains("model not loaded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
