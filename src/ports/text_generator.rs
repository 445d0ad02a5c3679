use crate::error::GenerationError;

/// Port trait for the hosted text-generation service used to write summaries.
///
/// Implementations live in `services::llm` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a single prompt and return the generated text verbatim.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Provider name for logging.
    fn provider(&self) -> &'static str;

    fn model(&self) -> &str;
}
