use crate::domain::model::{CheckRequest, CheckResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

pub const FALLBACK_MESSAGE: &str = "Failed to check grammar. Please try again.";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server rejected the request with status {status}")]
    Rejected {
        status: u16,
        details: Option<String>,
        error: Option<String>,
    },

    #[error("Invalid response format from server")]
    InvalidResponse,
}

impl ClientError {
    /// Message shown to the user: server `details`, then server `error`, then
    /// a fixed fallback.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Rejected { details, error, .. } => details
                .as_deref()
                .filter(|s| !s.is_empty())
                .or(error.as_deref().filter(|s| !s.is_empty()))
                .unwrap_or(FALLBACK_MESSAGE)
                .to_string(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }
}

#[async_trait]
pub trait CheckApi: Send + Sync {
    async fn check_grammar(&self, text: &str) -> Result<CheckResult, ClientError>;
}

/// Talks to `POST /api/check-grammar` on a running server.
#[derive(Debug, Clone)]
pub struct HttpCheckClient {
    client: Client,
    endpoint: String,
}

impl HttpCheckClient {
    pub fn new(server_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/api/check-grammar", server_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn string_field(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_string)
}

/// A success body is accepted only with a non-empty `correctedText` and a
/// complete result shape.
pub fn accept_result(body: Value) -> Result<CheckResult, ClientError> {
    let has_correction = body
        .get("correctedText")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty());
    if !has_correction {
        return Err(ClientError::InvalidResponse);
    }
    serde_json::from_value(body).map_err(|e| {
        tracing::debug!("Undecodable result body: {}", e);
        ClientError::InvalidResponse
    })
}

#[async_trait]
impl CheckApi for HttpCheckClient {
    async fn check_grammar(&self, text: &str) -> Result<CheckResult, ClientError> {
        tracing::debug!("Sending request with text: {}", text);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&CheckRequest::new(text))
            .send()
            .await?;

        let status = response.status();
        let body: Option<Value> = response.json().await.ok();
        tracing::debug!("Received response ({}): {:?}", status, body);

        if !status.is_success() {
            let body = body.unwrap_or(Value::Null);
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                details: string_field(&body, "details"),
                error: string_field(&body, "error"),
            });
        }

        accept_result(body.unwrap_or(Value::Null))
    }
}
