use crate::domain::model::{CheckResult, ParsedReply};
use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_SCORE: u32 = 50;
pub const NO_EXPLANATION: &str = "No explanation provided";

// `.` never crosses a newline, so each capture stops at the end of its line.
static CORRECTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Corrected: (.*)").expect("valid regex"));
// ASCII digits only; `\d` would also accept other Unicode digit classes.
static SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Score: ([0-9]+)").expect("valid regex"));
static EXPLANATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Explanation: (.*)").expect("valid regex"));

/// Builds the instruction sent to the provider. The user's text is embedded verbatim.
pub fn build_prompt(text: &str) -> String {
    format!(
        r#"Analyze this text for grammar: "{text}"
    
    Please provide:
    1. The corrected version
    2. A score from 0-100
    3. A brief explanation of the corrections
    
    Format your response exactly like this:
    Corrected: [corrected text]
    Score: [number]
    Explanation: [explanation]"#
    )
}

/// Extracts the three labelled fields from a free-text reply. The first
/// occurrence of each label wins; every extraction is independent.
pub fn parse_reply(reply: &str) -> ParsedReply {
    let corrected = CORRECTED_RE
        .captures(reply)
        .map(|caps| caps[1].trim().to_string());

    let score = SCORE_RE.captures(reply).and_then(|caps| {
        let digits = &caps[1];
        match digits.parse::<u32>() {
            Ok(score) => Some(score),
            Err(e) => {
                tracing::warn!("Ignoring unrepresentable score '{}': {}", digits, e);
                None
            }
        }
    });

    let explanation = EXPLANATION_RE
        .captures(reply)
        .map(|caps| caps[1].trim().to_string());

    ParsedReply {
        corrected,
        score,
        explanation,
    }
}

impl ParsedReply {
    /// Fills every missed extraction with its fallback. Never fails.
    pub fn into_result(self, original: &str) -> CheckResult {
        CheckResult {
            original_text: original.to_string(),
            corrected_text: self.corrected.unwrap_or_else(|| original.to_string()),
            grammar_score: self.score.unwrap_or(DEFAULT_SCORE),
            explanation: self
                .explanation
                .unwrap_or_else(|| NO_EXPLANATION.to_string()),
        }
    }
}
