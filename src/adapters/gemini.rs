use crate::domain::ports::TextGenerator;
use crate::utils::error::{GrammateError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Client for the Gemini `generateContent` REST endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_base_url: String,
    model: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_base_url", &self.api_base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiClient {
    pub fn new(api_base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base_url, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        // Single-turn, non-streamed request
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        tracing::debug!("Making provider request to: {}", self.endpoint());
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Provider response status: {}", status);

        if !status.is_success() {
            // Prefer the structured error payload; fall back to the raw body
            let raw = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorEnvelope>(&raw) {
                Ok(envelope) => {
                    let error = envelope.error;
                    tracing::error!(
                        status = status.as_u16(),
                        provider_status = error.status.as_deref().unwrap_or("unknown"),
                        message = error.message.as_deref().unwrap_or(""),
                        "Provider rejected the request"
                    );
                    match (error.status, error.message) {
                        (Some(code), Some(message)) => format!("{}: {}", code, message),
                        (None, Some(message)) => message,
                        (Some(code), None) => code,
                        (None, None) => raw,
                    }
                }
                Err(_) => {
                    tracing::error!(status = status.as_u16(), body = %raw, "Provider rejected the request");
                    if raw.is_empty() {
                        status.canonical_reason().unwrap_or("unknown error").to_string()
                    } else {
                        raw
                    }
                }
            };

            return Err(GrammateError::ProviderError {
                status: status.as_u16(),
                message,
            });
        }

        // Success status but the body may still carry no text
        let payload: GenerateContentResponse = response.json().await?;
        extract_text(payload)
    }
}

fn extract_text(payload: GenerateContentResponse) -> Result<String> {
    // No candidates at all usually means the prompt itself was blocked
    let Some(candidate) = payload.candidates.into_iter().next() else {
        let reason = payload
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .map(|reason| format!("prompt blocked: {}", reason))
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(GrammateError::EmptyReply { reason });
    };

    // Only the first candidate counts; its text parts are joined as-is
    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    // Candidate stopped before producing text (safety, recitation, ...)
    if text.is_empty() {
        let reason = candidate
            .finish_reason
            .map(|reason| format!("finish reason: {}", reason))
            .unwrap_or_else(|| "candidate had no text".to_string());
        return Err(GrammateError::EmptyReply { reason });
    }

    Ok(text)
}
