//! OCR engines
//!
//! An engine turns image bytes into its own raw, nested result. Nothing here
//! interprets that result; see `ocr::lines` for that.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::error::OcrError;
use crate::config::{Config, OcrEngineKind};

/// The engine's raw result, shape owned by the engine.
pub type RawOcrOutput = Value;

#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Human-readable engine name, reported in response metadata
    fn name(&self) -> &str;

    /// Check if the engine can currently take work
    async fn is_available(&self) -> bool;

    /// Run recognition over an encoded image (PNG, JPEG, ...)
    async fn recognize(&self, image_data: &[u8]) -> Result<RawOcrOutput, OcrError>;
}

/// PaddleOCR behind a PaddleX-style serving endpoint.
///
/// Request: `POST {base}/ocr` with `{"file": <base64>, "fileType": 1}`.
/// Response envelope: `{"errorCode": 0, "errorMsg": "Success", "result": {"ocrResults": [{"prunedResult": {...}}]}}`.
pub struct PaddleServingEngine {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

/// Upper bound for the `/health` readiness probe, independent of the OCR timeout.
const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

impl PaddleServingEngine {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn timed_out(&self) -> OcrError {
        OcrError::Timeout {
            seconds: self.timeout.as_secs(),
        }
    }

    /// Strip the serving envelope. Known layouts become a list of page results;
    /// anything else is handed back untouched for the line sources to sniff.
    fn unwrap_envelope(body: Value) -> Result<RawOcrOutput, OcrError> {
        if let Some(code) = body.get("errorCode").and_then(Value::as_i64) {
            if code != 0 {
                let message = body
                    .get("errorMsg")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error");
                return Err(OcrError::Engine(format!(
                    "PaddleOCR returned error code {}: {}",
                    code, message
                )));
            }
        }

        let result = match body {
            Value::Object(mut map) => map.remove("result").unwrap_or(Value::Object(map)),
            other => other,
        };

        match result.get("ocrResults").and_then(Value::as_array) {
            Some(pages) => Ok(Value::Array(
                pages
                    .iter()
                    .map(|page| page.get("prunedResult").cloned().unwrap_or_else(|| page.clone()))
                    .collect(),
            )),
            None => Ok(result),
        }
    }
}

#[async_trait]
impl OcrEngine for PaddleServingEngine {
    fn name(&self) -> &str {
        "PaddleOCR"
    }

    async fn is_available(&self) -> bool {
        let probe = self
            .client
            .get(format!("{}/health", self.base_url))
            .timeout(HEALTH_PROBE_TIMEOUT);
        match probe.send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn recognize(&self, image_data: &[u8]) -> Result<RawOcrOutput, OcrError> {
        use base64::Engine;

        let request = json!({
            "file": base64::engine::general_purpose::STANDARD.encode(image_data),
            "fileType": 1
        });

        let response = self
            .client
            .post(format!("{}/ocr", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.timed_out()
                } else if e.is_connect() {
                    OcrError::EngineUnavailable(format!("Failed to reach PaddleOCR: {}", e))
                } else {
                    OcrError::Engine(format!("Failed to call PaddleOCR: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Engine(format!(
                "PaddleOCR returned {}: {}",
                status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.timed_out()
                } else {
                    OcrError::Engine(format!("Failed to parse PaddleOCR response: {}", e))
                }
            })?;

        debug!("PaddleOCR response received ({} bytes of image)", image_data.len());
        Self::unwrap_envelope(body)
    }
}

/// Local Tesseract via libtesseract.
#[cfg(feature = "ocr")]
pub struct TesseractEngine {
    language: String,
}

#[cfg(feature = "ocr")]
impl TesseractEngine {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
        }
    }

    /// Leptonica is picky about formats, so normalize everything to PNG first.
    fn to_png(image_data: &[u8]) -> Result<Vec<u8>, OcrError> {
        let decoded = image::load_from_memory(image_data)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

        let mut png = std::io::Cursor::new(Vec::new());
        decoded
            .write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| OcrError::InvalidImage(format!("Failed to re-encode image: {}", e)))?;
        Ok(png.into_inner())
    }

    fn run(language: &str, png: &[u8]) -> Result<String, OcrError> {
        let mut tesseract = tesseract::Tesseract::new(None, Some(language))
            .map_err(|e| OcrError::EngineUnavailable(format!("Failed to initialize Tesseract: {}", e)))?
            .set_image_from_mem(png)
            .map_err(|e| OcrError::InvalidImage(format!("Tesseract rejected image: {}", e)))?;

        tesseract
            .get_text()
            .map_err(|e| OcrError::Engine(format!("Failed to extract text: {}", e)))
    }
}

#[cfg(feature = "ocr")]
#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "Tesseract"
    }

    async fn is_available(&self) -> bool {
        tokio::process::Command::new("tesseract")
            .arg("--version")
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    async fn recognize(&self, image_data: &[u8]) -> Result<RawOcrOutput, OcrError> {
        let png = Self::to_png(image_data)?;
        let language = self.language.clone();

        let text = tokio::task::spawn_blocking(move || Self::run(&language, &png))
            .await
            .map_err(|e| OcrError::Engine(format!("Tesseract task failed: {}", e)))??;

        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        // Page layout matches PaddleOCR 3.x so the rec_texts fast path applies.
        Ok(json!([{ "rec_texts": lines }]))
    }
}

/// Create the OCR engine selected in configuration.
pub fn create_engine(config: &Config) -> Result<Arc<dyn OcrEngine>> {
    match config.ocr_engine {
        OcrEngineKind::Paddle => {
            info!("Using PaddleOCR serving endpoint at {}", config.paddle_ocr_url);
            let engine = PaddleServingEngine::new(
                &config.paddle_ocr_url,
                Duration::from_secs(config.ocr_timeout_seconds),
            )?;
            Ok(Arc::new(engine))
        }
        #[cfg(feature = "ocr")]
        OcrEngineKind::Tesseract => {
            info!("Using local Tesseract (language: {})", config.ocr_language);
            Ok(Arc::new(TesseractEngine::new(&config.ocr_language)))
        }
        #[cfg(not(feature = "ocr"))]
        OcrEngineKind::Tesseract => Err(anyhow::anyhow!(
            "OCR_ENGINE=tesseract requires building with the `ocr` feature"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_envelope_extracts_pruned_results() {
        let body = json!({
            "logId": "abc",
            "errorCode": 0,
            "errorMsg": "Success",
            "result": {
                "ocrResults": [
                    {"prunedResult": {"rec_texts": ["A", "B"]}, "ocrImage": "..."}
                ],
                "dataInfo": {"width": 100, "height": 100}
            }
        });

        let raw = PaddleServingEngine::unwrap_envelope(body).unwrap();
        assert_eq!(raw, json!([{"rec_texts": ["A", "B"]}]));
    }

    #[test]
    fn test_unwrap_envelope_rejects_error_codes() {
        let body = json!({"errorCode": 500, "errorMsg": "Internal Server Error"});
        let err = PaddleServingEngine::unwrap_envelope(body).unwrap_err();
        assert!(matches!(err, OcrError::Engine(msg) if msg.contains("Internal Server Error")));
    }

    #[test]
    fn test_unwrap_envelope_passes_unknown_layouts_through() {
        let body = json!({"result": [{"text": "hello"}]});
        let raw = PaddleServingEngine::unwrap_envelope(body).unwrap();
        assert_eq!(raw, json!([{"text": "hello"}]));

        let bare = json!([{"rec_texts": ["x"]}]);
        assert_eq!(PaddleServingEngine::unwrap_envelope(bare.clone()).unwrap(), bare);
    }
}
