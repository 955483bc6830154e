use grammate::client::{Form, FormState, HttpCheckClient};
use grammate::server::{self, AppState};
use grammate::{GeminiClient, GrammarChecker};
use httpmock::prelude::*;
use serde_json::json;

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

/// Starts the real server on an ephemeral port, backed by a mocked provider.
async fn start_server(provider: &MockServer) -> String {
    let generator = GeminiClient::new(&provider.base_url(), "gemini-2.0-flash", "test-key");
    let state = AppState::new(GrammarChecker::new(generator));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, state));
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_form_to_provider_round_trip() {
    let provider = MockServer::start();
    let provider_mock = provider.mock(|when, then| {
        when.method(POST)
            .path(GENERATE_PATH)
            .header("x-goog-api-key", "test-key")
            .body_contains("I has a apple.");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "Corrected: I have an apple.\nScore: 85\nExplanation: Subject-verb agreement and article correction."}]}
                }]
            }));
    });

    let server_url = start_server(&provider).await;
    let api = HttpCheckClient::new(&server_url);
    let mut form = Form::with_input("I has a apple.");
    form.submit(&api).await;

    provider_mock.assert();
    match form.state() {
        FormState::Success(result) => {
            assert_eq!(result.original_text, "I has a apple.");
            assert_eq!(result.corrected_text, "I have an apple.");
            assert_eq!(result.grammar_score, 85);
            assert_eq!(
                result.explanation,
                "Subject-verb agreement and article correction."
            );
        }
        other => panic!("unexpected state: {other:?}"),
    }
}

#[tokio::test]
async fn test_provider_error_reaches_form_as_details() {
    let provider = MockServer::start();
    provider.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(429)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
            }));
    });

    let server_url = start_server(&provider).await;
    let api = HttpCheckClient::new(&server_url);
    let mut form = Form::with_input("Some text.");
    form.submit(&api).await;

    assert_eq!(
        form.state(),
        &FormState::Error("Provider returned 429: RESOURCE_EXHAUSTED: Quota exceeded".to_string())
    );

    // The server survives the failure and answers validation errors as usual.
    let response = reqwest::Client::new()
        .post(format!("{}/api/check-grammar", server_url))
        .json(&json!({"text": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}
