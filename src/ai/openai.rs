//! OpenAI-Compatible Provider
//!
//! Completion service backed by an OpenAI-style Chat Completions endpoint.
//! Works against api.openai.com or any compatible gateway via `api_base`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CompletionOptions, CompletionService, ProviderConfig};
use crate::types::{DocuError, ErrorClassifier, Result};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI-compatible chat-completions provider
pub struct OpenAiProvider {
    /// API key, never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key_str = config
            .api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                DocuError::Config(
                    "OpenAI API key not found. Set OPENAI_API_KEY or provide llm.api_key"
                        .to_string(),
                )
            })?;

        let api_base = config
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        url::Url::parse(&api_base)
            .map_err(|e| DocuError::Config(format!("Invalid llm.api_base '{}': {}", api_base, e)))?;

        let model = config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DocuError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base,
            model,
            client,
        })
    }

    fn build_request(&self, prompt: &str, options: &CompletionOptions) -> ChatCompletionRequest {
        let system_content = if options.json_mode {
            "You are a code documentation expert. Respond ONLY with a valid JSON object, \
             no explanation and no markdown fences."
        } else {
            "You are a code documentation expert. Respond with clear, factual prose."
        };

        ChatCompletionRequest {
            model: options.model.clone().unwrap_or_else(|| self.model.clone()),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_content.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: options.temperature,
            max_tokens: Some(options.max_tokens),
            response_format: options.json_mode.then(|| ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }
}

#[async_trait]
impl CompletionService for OpenAiProvider {
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String> {
        let start = Instant::now();
        let request = self.build_request(prompt, options);
        let url = format!("{}/chat/completions", self.api_base);

        debug!(
            model = %request.model,
            json_mode = options.json_mode,
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DocuError::Llm(ErrorClassifier::classify(&e.to_string(), "openai")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "Completion request failed");
            return Err(DocuError::Llm(ErrorClassifier::classify_http_status(
                status, &body, "openai",
            )));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| DocuError::LlmApi(format!("Failed to parse provider response: {}", e)))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DocuError::LlmApi("No content in provider response".to_string()))?;

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            chars = content.len(),
            "Completion received"
        );

        Ok(content)
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
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
    content: Option<String>,
}
