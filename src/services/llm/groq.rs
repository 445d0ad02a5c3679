//! Groq chat completions adapter (OpenAI-compatible API).

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::GenerationError;
use crate::ports::text_generator::TextGenerator;

pub const API_KEY_VAR: &str = "GROQ_API_KEY";
const PROVIDER: &str = "groq";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct GroqClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GroqClient {
    /// The key is optional here: a missing key only fails when a summary is requested.
    pub fn new(
        base_url: &Url,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                GenerationError::upstream(PROVIDER, format!("Failed to build client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.as_str().trim_end_matches('/')),
            model,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

fn first_choice(response: ChatCompletionResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| GenerationError::upstream(PROVIDER, "Response contained no completion"))
}

#[async_trait::async_trait]
impl TextGenerator for GroqClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential(API_KEY_VAR))?;

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        log::debug!("Sending chat completion request to {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::upstream(PROVIDER, format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Groq returned {}: {}", status, body);
            return Err(GenerationError::upstream(
                PROVIDER,
                format!("Server returned: {status}"),
            ));
        }

        let response = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| {
                GenerationError::upstream(PROVIDER, format!("Failed to parse response: {e}"))
            })?;

        first_choice(response)
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_key: Option<&str>) -> GroqClient {
        GroqClient::new(
            &Url::parse("https://api.groq.com/openai/v1/").unwrap(),
            "llama3-70b-8192".into(),
            api_key.map(str::to_string),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        assert_eq!(
            client(Some("key")).endpoint,
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let result = client(None).generate("hello").await;
        assert_eq!(result, Err(GenerationError::MissingCredential(API_KEY_VAR)));
    }

    #[tokio::test]
    async fn test_blank_key_counts_as_missing() {
        let result = client(Some("  ")).generate("hello").await;
        assert_eq!(result, Err(GenerationError::MissingCredential(API_KEY_VAR)));
    }

    #[test]
    fn test_request_body_shape() {
        let request = ChatCompletionRequest {
            model: "llama3-70b-8192",
            messages: vec![ChatMessage {
                role: "user",
                content: "Summarize",
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "llama3-70b-8192",
                "messages": [{"role": "user", "content": "Summarize"}]
            })
        );
    }

    #[test]
    fn test_first_choice_content() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"A desert epic."}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice(response).unwrap(), "A desert epic.");
    }

    #[test]
    fn test_no_choices_is_upstream_error() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            first_choice(response),
            Err(GenerationError::Upstream { .. })
        ));
    }
}
