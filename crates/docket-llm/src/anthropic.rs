//! Anthropic (Claude) messages API provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use docket_core::error::{DocketError, DocketResult};
use docket_core::traits::{GenerationOptions, Llm, LlmConfig, LlmResponse, TokenUsage};
use docket_core::types::{Message, MessageRole};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub(crate) const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20240620";

/// Anthropic LLM provider.
pub struct AnthropicLlm {
    client: Client,
    config: LlmConfig,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

impl AnthropicLlm {
    /// Create a new Anthropic provider.
    ///
    /// The API key comes from the config or `ANTHROPIC_API_KEY`.
    pub fn new(config: LlmConfig) -> DocketResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .ok_or_else(|| {
                DocketError::Configuration("Anthropic API key not found. Set ANTHROPIC_API_KEY environment variable or provide api_key in config.".to_string())
            })?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "x-api-key",
            api_key
                .parse()
                .map_err(|_| DocketError::Configuration("Invalid API key format".to_string()))?,
        );
        headers.insert(
            "anthropic-version",
            reqwest::header::HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DocketError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| ANTHROPIC_API_URL.to_string());

        let mut config = config;
        if config.model.is_empty() {
            config.model = DEFAULT_ANTHROPIC_MODEL.to_string();
        }

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    fn build_request<'a>(
        &'a self,
        messages: &'a [Message],
        options: &GenerationOptions,
    ) -> AnthropicRequest<'a> {
        // The system prompt travels outside the message list.
        let system = messages
            .iter()
            .find(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str());

        let messages = messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| AnthropicMessage {
                role: match m.role {
                    MessageRole::Assistant => "assistant",
                    _ => "user",
                },
                content: &m.content,
            })
            .collect();

        AnthropicRequest {
            model: &self.config.model,
            max_tokens: options.max_tokens.unwrap_or(self.config.max_tokens),
            temperature: options.temperature.unwrap_or(self.config.temperature),
            system,
            messages,
        }
    }
}

#[async_trait]
impl Llm for AnthropicLlm {
    async fn generate(
        &self,
        messages: &[Message],
        options: Option<GenerationOptions>,
    ) -> DocketResult<LlmResponse> {
        let options = options.unwrap_or_default();
        let request = self.build_request(messages, &options);

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| DocketError::llm_connection("Anthropic API request failed", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DocketError::llm_connection("Failed to read Anthropic response body", e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(DocketError::llm(format!(
                "Anthropic API error ({}): {}",
                status, message
            )));
        }

        let response: AnthropicResponse = serde_json::from_str(&body).map_err(|e| {
            DocketError::llm_invalid_response(format!("Failed to parse Anthropic response: {}", e))
        })?;

        let content = response
            .content
            .into_iter()
            .find(|c| c.content_type == "text")
            .and_then(|c| c.text);

        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.input_tokens + u.output_tokens,
        });

        Ok(LlmResponse { content, usage })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> AnthropicLlm {
        AnthropicLlm::new(LlmConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_request_lifts_system_prompt() {
        let provider = provider();
        let messages = vec![
            Message::system("You compare support tickets."),
            Message::user("Are these the same?"),
        ];
        let request = provider.build_request(&messages, &GenerationOptions::default());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], DEFAULT_ANTHROPIC_MODEL);
        assert_eq!(json["system"], "You compare support tickets.");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["temperature"], 0.0);
    }

    #[test]
    fn test_parses_text_content() {
        let body = r#"{"content":[{"type":"text","text":"YES 0.9"}],"usage":{"input_tokens":40,"output_tokens":3}}"#;
        let response: AnthropicResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.content[0].text.as_deref(), Some("YES 0.9"));
        assert_eq!(response.usage.unwrap().output_tokens, 3);
    }
}
