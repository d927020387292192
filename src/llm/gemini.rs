//! Google Gemini `generateContent` client

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{CompletionClient, LlmError};
use crate::config::Config;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl From<&Config> for GeminiConfig {
    fn from(config: &Config) -> Self {
        Self {
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            api_base: config.gemini_api_base.clone(),
            temperature: config.llm_temperature,
            timeout: Duration::from_secs(config.llm_timeout_seconds),
        }
    }
}

pub struct GeminiClient {
    http_client: reqwest::Client,
    config: GeminiConfig,
    display_name: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.config.model)
            .field("api_base", &self.config.api_base)
            .finish()
    }
}

// generateContent request/response structures
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client for Gemini")?;

        let display_name = format!("Gemini ({})", config.model);
        Ok(Self {
            http_client,
            config,
            display_name,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base, self.config.model
        )
    }

    fn completion_text(response: GenerateContentResponse) -> Result<String, LlmError> {
        let candidate = match response.candidates.into_iter().next() {
            Some(candidate) => candidate,
            None => {
                let reason = response
                    .prompt_feedback
                    .and_then(|f| f.block_reason)
                    .map(|r| format!("blocked: {}", r))
                    .unwrap_or_else(|| "no candidates".to_string());
                return Err(LlmError::EmptyCompletion(reason));
            }
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate
                .finish_reason
                .map(|r| format!("finish reason: {}", r))
                .unwrap_or_else(|| "no text parts".to_string());
            return Err(LlmError::EmptyCompletion(reason));
        }

        Ok(text)
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    fn name(&self) -> &str {
        &self.display_name
    }

    fn is_ready(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;

        let text = Self::completion_text(parsed)?;
        debug!("Gemini completion: {} chars", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_completion_text_joins_parts() {
        let text = GeminiClient::completion_text(response(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "rece"}, {"text": "ipt"}]},
                "finishReason": "STOP"
            }]
        })))
        .unwrap();
        assert_eq!(text, "receipt");
    }

    #[test]
    fn test_blocked_prompt_is_empty_completion() {
        let err = GeminiClient::completion_text(response(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .unwrap_err();
        assert!(err.to_string().contains("blocked: SAFETY"));
    }

    #[test]
    fn test_candidate_without_text_is_empty_completion() {
        let err = GeminiClient::completion_text(response(json!({
            "candidates": [{"finishReason": "MAX_TOKENS"}]
        })))
        .unwrap_err();
        assert!(matches!(err, LlmError::EmptyCompletion(r) if r.contains("MAX_TOKENS")));
    }
}
