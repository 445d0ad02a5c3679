pub mod groq;
pub mod ollama;

use std::sync::Arc;

use color_eyre::eyre::{Context, Result};

use crate::config::{LlmConfig, LlmProvider};
use crate::ports::text_generator::TextGenerator;

/// Build the text generator selected in the config.
pub fn build_text_generator(config: &LlmConfig) -> Result<Arc<dyn TextGenerator>> {
    let base_url = config.base_url()?;

    let generator: Arc<dyn TextGenerator> = match config.provider {
        LlmProvider::Groq => {
            if config.api_key.is_none() {
                log::warn!(
                    "{} is not set; summary requests will fail until it is provided",
                    groq::API_KEY_VAR
                );
            }
            Arc::new(
                groq::GroqClient::new(
                    &base_url,
                    config.model.clone(),
                    config.api_key.clone(),
                    config.timeout(),
                )
                .wrap_err("Failed to create Groq client")?,
            )
        }
        LlmProvider::Ollama => Arc::new(ollama::OllamaClient::new(
            &base_url,
            config.model.clone(),
            config.timeout(),
        )),
    };

    log::info!(
        "Summaries use provider {} with model {}",
        generator.provider(),
        generator.model()
    );
    Ok(generator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_groq_by_default() {
        let generator = build_text_generator(&LlmConfig::default()).unwrap();
        assert_eq!(generator.provider(), "groq");
        assert_eq!(generator.model(), "llama3-70b-8192");
    }

    #[test]
    fn test_builds_ollama() {
        let config = LlmConfig {
            provider: LlmProvider::Ollama,
            model: "llama3.1:8b".into(),
            ..LlmConfig::default()
        };
        let generator = build_text_generator(&config).unwrap();
        assert_eq!(generator.provider(), "ollama");
        assert_eq!(generator.model(), "llama3.1:8b");
    }
}
