/*!
 * Test Helpers and Utilities
 *
 * Stub OCR engine and scripted LLM client, plus builders for a test
 * configuration and a fully wired AppState. Tests can modify the returned
 * objects as needed.
 */

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{
    config::{Config, OcrEngineKind},
    ingestion::document_processing::DocumentProcessor,
    llm::{CompletionClient, LlmError},
    ocr::{
        engine::{OcrEngine, RawOcrOutput},
        error::OcrError,
    },
    AppState,
};

/// OCR engine that returns a canned result.
pub struct StubOcrEngine {
    outcome: Result<Value, OcrError>,
    delay: Option<Duration>,
    available: bool,
    calls: Arc<AtomicUsize>,
}

impl StubOcrEngine {
    pub fn returning(raw: Value) -> Self {
        Self {
            outcome: Ok(raw),
            delay: None,
            available: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Engine whose result is a PaddleOCR page with the given lines
    pub fn with_lines(lines: &[&str]) -> Self {
        Self::returning(serde_json::json!([{ "rec_texts": lines }]))
    }

    pub fn failing(error: OcrError) -> Self {
        Self {
            outcome: Err(error),
            delay: None,
            available: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared counter of `recognize` calls
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl OcrEngine for StubOcrEngine {
    fn name(&self) -> &str {
        "StubOCR"
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(&self, _image_data: &[u8]) -> Result<RawOcrOutput, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}

/// LLM client that replays scripted completions and records every prompt.
///
/// `Err(message)` entries surface as `LlmError::Request(message)`.
pub struct ScriptedCompletionClient {
    script: Mutex<VecDeque<Result<String, String>>>,
    repeat: Option<Result<String, String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletionClient {
    /// Replay `script` in order; calls past its end fail.
    pub fn new(script: Vec<Result<String, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            repeat: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call the same way.
    pub fn always(response: Result<String, String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            repeat: Some(response),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    fn name(&self) -> &str {
        "Scripted LLM"
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.repeat.clone())
            .unwrap_or_else(|| Err("no scripted completion left".to_string()));

        next.map_err(LlmError::Request)
    }
}

/// Creates a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        allowed_origin: "http://localhost:3000".to_string(),
        gemini_api_key: "test-gemini-key".to_string(),
        gemini_model: "gemini-2.0-flash".to_string(),
        gemini_api_base: "http://127.0.0.1:9".to_string(),
        llm_temperature: 0.0,
        llm_timeout_seconds: 5,
        ocr_engine: OcrEngineKind::Paddle,
        paddle_ocr_url: "http://127.0.0.1:9".to_string(),
        ocr_language: "ind".to_string(),
        ocr_timeout_seconds: 5,
        max_file_size_mb: 1,
        classification_char_limit: 1000,
    }
}

/// Creates a test AppState wired to the given engine and LLM client
pub fn create_test_app_state(
    engine: Arc<dyn OcrEngine>,
    llm: Arc<dyn CompletionClient>,
) -> Arc<AppState> {
    create_test_app_state_with_config(create_test_config(), engine, llm)
}

/// Creates a test AppState with a custom configuration
pub fn create_test_app_state_with_config(
    config: Config,
    engine: Arc<dyn OcrEngine>,
    llm: Arc<dyn CompletionClient>,
) -> Arc<AppState> {
    let processor = DocumentProcessor::new(engine, llm, &config);
    Arc::new(AppState { config, processor })
}
