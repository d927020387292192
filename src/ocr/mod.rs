pub mod engine;
pub mod error;
pub mod lines;

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::ocr::engine::OcrEngine;
use crate::ocr::error::OcrError;
use crate::ocr::lines::{default_sources, LineSource};

/// Runs an image through the configured engine and resolves the result into text lines.
pub struct OcrService {
    engine: Arc<dyn OcrEngine>,
    sources: Vec<Box<dyn LineSource>>,
    timeout: Duration,
}

impl OcrService {
    pub fn new(engine: Arc<dyn OcrEngine>, timeout: Duration) -> Self {
        Self::with_sources(engine, default_sources(), timeout)
    }

    pub fn with_sources(
        engine: Arc<dyn OcrEngine>,
        sources: Vec<Box<dyn LineSource>>,
        timeout: Duration,
    ) -> Self {
        Self {
            engine,
            sources,
            timeout,
        }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    pub async fn is_ready(&self) -> bool {
        self.engine.is_available().await
    }

    /// Recognize an image and return its text lines, in best-effort reading order.
    pub async fn recognize(&self, image_data: &[u8]) -> Result<Vec<String>, OcrError> {
        let raw = tokio::time::timeout(self.timeout, self.engine.recognize(image_data))
            .await
            .map_err(|_| OcrError::Timeout {
                seconds: self.timeout.as_secs(),
            })??;

        if is_empty_result(&raw) {
            return Err(OcrError::NoTextDetected);
        }

        for source in &self.sources {
            let lines = source.extract(&raw);
            if !lines.is_empty() {
                info!(
                    "{} extracted {} lines via '{}'",
                    self.engine.name(),
                    lines.len(),
                    source.name()
                );
                debug!("Sample lines: {:?}", &lines[..lines.len().min(3)]);
                return Ok(lines);
            }
            debug!("Line source '{}' found no text", source.name());
        }

        warn!("No line source matched OCR result; top-level keys: {}", describe_keys(&raw));
        Err(OcrError::ExtractionFailed {
            sources: self
                .sources
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

fn is_empty_result(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn describe_keys(raw: &Value) -> String {
    let first = match raw {
        Value::Array(items) => items.first(),
        other => Some(other),
    };

    match first {
        Some(Value::Object(map)) => map.keys().cloned().collect::<Vec<_>>().join(", "),
        _ => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::StubOcrEngine;
    use serde_json::json;

    fn service(engine: StubOcrEngine) -> OcrService {
        OcrService::new(Arc::new(engine), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_recognize_prefers_fast_path() {
        let svc = service(StubOcrEngine::returning(json!([
            {"rec_texts": ["WARUNG BU SRI", "Nasi Goreng 15000"], "text": "ignored"}
        ])));

        let lines = svc.recognize(b"fake").await.unwrap();
        assert_eq!(lines, vec!["WARUNG BU SRI", "Nasi Goreng 15000"]);
    }

    #[tokio::test]
    async fn test_recognize_falls_back_to_deep_walk() {
        let svc = service(StubOcrEngine::returning(json!([
            {"ocr_result": [{"rec_text": "line 1"}, {"rec_text": "line 2"}]}
        ])));

        let lines = svc.recognize(b"fake").await.unwrap();
        assert_eq!(lines, vec!["line 1", "line 2"]);
    }

    #[tokio::test]
    async fn test_empty_result_is_no_text_detected() {
        for raw in [json!(null), json!([]), json!({})] {
            let svc = service(StubOcrEngine::returning(raw));
            let err = svc.recognize(b"fake").await.unwrap_err();
            assert!(matches!(err, OcrError::NoTextDetected));
        }
    }

    #[tokio::test]
    async fn test_unrecognized_structure_is_extraction_failure() {
        let svc = service(StubOcrEngine::returning(json!([{"dt_polys": [[0, 0], [1, 1]]}])));

        let err = svc.recognize(b"fake").await.unwrap_err();
        match err {
            OcrError::ExtractionFailed { sources } => assert_eq!(sources, "rec_texts, deep_walk"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_engine_errors_propagate() {
        let svc = service(StubOcrEngine::failing(OcrError::Engine("model crashed".into())));
        let err = svc.recognize(b"fake").await.unwrap_err();
        assert!(matches!(err, OcrError::Engine(_)));
    }

    #[tokio::test]
    async fn test_slow_engine_times_out() {
        let engine = StubOcrEngine::returning(json!([{"rec_texts": ["late"]}]))
            .with_delay(Duration::from_millis(500));
        let svc = OcrService::new(Arc::new(engine), Duration::from_millis(20));

        let err = svc.recognize(b"fake").await.unwrap_err();
        assert!(matches!(err, OcrError::Timeout { .. }));
    }
}
