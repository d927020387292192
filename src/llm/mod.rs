//! LLM text completion
//!
//! The rest of the service only needs "prompt in, text out", so that is all
//! `CompletionClient` exposes.

pub mod gemini;

use async_trait::async_trait;

pub use gemini::GeminiClient;

#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Request(String),

    #[error("LLM request timed out")]
    Timeout,

    #[error("LLM API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("LLM returned an empty completion ({0})")]
    EmptyCompletion(String),

    #[error("Failed to decode LLM response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Display name reported as `ai_processor` in responses
    fn name(&self) -> &str;

    /// Whether the client was configured and can be called
    fn is_ready(&self) -> bool {
        true
    }

    /// Send a prompt and return the completion text
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}
