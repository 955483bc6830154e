use crate::utils::error::Result;
use async_trait::async_trait;

/// A text-generation provider: one prompt in, one complete reply out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
