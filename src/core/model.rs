use async_trait::async_trait;

use crate::error::Result;

/// A generative text model: one prompt in, one text response out.
#[async_trait]
pub trait TextModel: Send + Sync + std::fmt::Debug {
    /// Model identifier used in logs
    fn name(&self) -> &str;

    /// Send the prompt once and return the raw response text
    async fn generate(&self, prompt: &str) -> Result<String>;
}
