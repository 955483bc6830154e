use serde::{Deserialize, Serialize};

/// Body of `POST /api/check-grammar`. `text` stays optional so a missing
/// field reaches validation instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub text: Option<String>,
}

impl CheckRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub original_text: String,
    pub corrected_text: String,
    pub grammar_score: u32,
    pub explanation: String,
}

/// Fields extracted from a provider reply before fallbacks are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReply {
    pub corrected: Option<String>,
    pub score: Option<u32>,
    pub explanation: Option<String>,
}
