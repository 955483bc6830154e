use crate::core::analysis::{build_prompt, parse_reply};
use crate::domain::model::{CheckRequest, CheckResult};
use crate::domain::ports::TextGenerator;
use crate::utils::error::{GrammateError, Result};

pub const TEXT_REQUIRED: &str = "Text is required";

/// Runs one grammar check: validate, prompt the provider once, parse the reply.
pub struct GrammarChecker<G: TextGenerator> {
    generator: G,
}

impl<G: TextGenerator> GrammarChecker<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub async fn check(&self, request: CheckRequest) -> Result<CheckResult> {
        // Missing or blank text never reaches the provider
        let text = match request.text {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(GrammateError::validation(TEXT_REQUIRED)),
        };

        tracing::info!(chars = text.chars().count(), "Received text");
        tracing::debug!("Input text: {}", text);

        // One prompt, one provider call, no retry
        let prompt = build_prompt(&text);
        tracing::debug!("Sending request to provider");
        let reply = self.generator.generate(&prompt).await.map_err(|e| {
            tracing::error!(error = %e, debug = ?e, "Provider call failed");
            e
        })?;
        tracing::debug!("Received reply: {}", reply);

        // A reply that misses a label is expected, not an error
        let parsed = parse_reply(&reply);
        if parsed.corrected.is_none() || parsed.score.is_none() || parsed.explanation.is_none() {
            tracing::warn!(
                corrected = parsed.corrected.is_some(),
                score = parsed.score.is_some(),
                explanation = parsed.explanation.is_some(),
                "Provider reply missed expected fields, using fallbacks"
            );
        }

        // Fallbacks fill whatever the reply left out
        let result = parsed.into_result(&text);
        tracing::info!(score = result.grammar_score, "Sending formatted result");
        tracing::debug!("Formatted result: {:?}", result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeGenerator {
        reply: std::result::Result<String, String>,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl FakeGenerator {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            self.reply.clone().map_err(|message| GrammateError::ProviderError {
                status: 503,
                message,
            })
        }
    }

    #[tokio::test]
    async fn test_check_parses_reply() {
        let checker = GrammarChecker::new(FakeGenerator::replying(
            "Corrected: I have an apple.\nScore: 85\nExplanation: Subject-verb agreement and article correction.",
        ));

        let result = checker.check(CheckRequest::new("I has a apple.")).await.unwrap();

        assert_eq!(result.original_text, "I has a apple.");
        assert_eq!(result.corrected_text, "I have an apple.");
        assert_eq!(result.grammar_score, 85);
        assert_eq!(
            result.explanation,
            "Subject-verb agreement and article correction."
        );

        let prompt = checker.generator().last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("\"I has a apple.\""));
    }

    #[tokio::test]
    async fn test_blank_text_skips_provider() {
        let checker = GrammarChecker::new(FakeGenerator::replying("Score: 1"));

        for request in [
            CheckRequest::default(),
            CheckRequest::new(""),
            CheckRequest::new("  \n\t "),
        ] {
            let err = checker.check(request).await.unwrap_err();
            assert!(matches!(
                err,
                GrammateError::ValidationError { ref message } if message == TEXT_REQUIRED
            ));
        }

        assert_eq!(checker.generator().calls(), 0);
    }

    #[tokio::test]
    async fn test_original_text_is_not_trimmed() {
        let checker = GrammarChecker::new(FakeGenerator::replying("nothing useful"));

        let result = checker.check(CheckRequest::new("  hello world \n")).await.unwrap();

        assert_eq!(result.original_text, "  hello world \n");
        assert_eq!(result.corrected_text, "  hello world \n");
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let checker = GrammarChecker::new(FakeGenerator::failing("overloaded"));

        let err = checker.check(CheckRequest::new("text")).await.unwrap_err();

        assert!(matches!(err, GrammateError::ProviderError { status: 503, .. }));
        assert_eq!(checker.generator().calls(), 1);
    }
}
