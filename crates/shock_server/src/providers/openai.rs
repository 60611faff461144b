//! Chat-completion text analysis.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ServiceError, TextAnalysisProvider};
use crate::config::AnalysisConfig;

const SYSTEM_PROMPT: &str = "You are a financial analyst specialising in how world events move markets.";
const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f64 = 0.7;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions client.
pub struct OpenAiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// `MissingCredential` when no API key is configured.
    pub fn new(config: &AnalysisConfig) -> Result<Self, ServiceError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ServiceError::MissingCredential("analysis.api_key".to_string()))?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
        })
    }

    fn request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

fn first_reply(response: ChatResponse) -> Result<String, ServiceError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ServiceError::MalformedResponse("no completion text".into()))
}

#[async_trait]
impl TextAnalysisProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn analyze(&self, prompt: &str) -> Result<String, ServiceError> {
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "requesting completion");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request(prompt))
            .send()
            .await?
            .error_for_status()?;

        let body: ChatResponse = response.json().await?;
        first_reply(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key: Option<&str>) -> AnalysisConfig {
        AnalysisConfig {
            api_key: key.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_key_is_rejected() {
        assert!(matches!(
            OpenAiProvider::new(&config(None)),
            Err(ServiceError::MissingCredential(_))
        ));
        assert!(matches!(
            OpenAiProvider::new(&config(Some(" "))),
            Err(ServiceError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_endpoint_and_request_body() {
        let provider = OpenAiProvider::new(&AnalysisConfig {
            base_url: "https://llm.internal/v1/".to_string(),
            ..config(Some("sk-test"))
        })
        .unwrap();
        assert_eq!(provider.endpoint, "https://llm.internal/v1/chat/completions");

        let json = serde_json::to_value(provider.request("What happened?")).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "What happened?");
        assert_eq!(json["max_tokens"], 500);
    }

    #[test]
    fn test_first_reply() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  Markets fell.  "}}]}"#,
        )
        .unwrap();
        assert_eq!(first_reply(body).unwrap(), "Markets fell.");

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            first_reply(empty),
            Err(ServiceError::MalformedResponse(_))
        ));
    }
}
