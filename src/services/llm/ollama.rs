use std::time::Duration;

use ollama_native::Ollama;
use url::Url;

use crate::error::GenerationError;
use crate::ports::text_generator::TextGenerator;

const PROVIDER: &str = "ollama";

/// Local Ollama server. Needs no credential.
pub struct OllamaClient {
    ollama: Ollama,
    model: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(base_url: &Url, model: String, timeout: Duration) -> Self {
        log::debug!("Using ollama at {} with model {}", base_url, model);
        Self {
            ollama: Ollama::new(base_url.as_str().trim_end_matches('/')),
            model,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = self.ollama.generate(&self.model).prompt(prompt);

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| {
                GenerationError::upstream(
                    PROVIDER,
                    format!("Timed out after {}s", self.timeout.as_secs()),
                )
            })?
            .map_err(|e| GenerationError::upstream(PROVIDER, e.to_string()))?;

        Ok(response.response)
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }
}
