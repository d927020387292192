/*!
 * Document Processing Pipeline
 *
 * Runs one uploaded image through the whole pipeline:
 * validate -> OCR -> classify (when asked to) -> extract fields.
 *
 * Failures up to and including OCR end the request. Classification and
 * extraction never fail; they degrade to defaults and leave a warning.
 */

use axum::http::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::documents::{
    DocumentClassifier, DocumentType, DocumentTypeHint, FieldExtractor, ParsedDocument,
    UnknownDocumentType,
};
use crate::llm::CompletionClient;
use crate::ocr::{engine::OcrEngine, error::OcrError, OcrService};
use crate::utils::ocr::is_image_content_type;

/// Appended to every terminal error message.
pub const HARD_FAILURE_MARKER: &str = "NO FALLBACK.";

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
    pub filename: Option<String>,
}

impl UploadedImage {
    pub fn validate(&self) -> Result<(), ProcessingError> {
        match self.content_type.as_deref() {
            Some(content_type) if is_image_content_type(content_type) => {}
            other => {
                return Err(ProcessingError::InvalidFileType(
                    other.unwrap_or("none").to_string(),
                ))
            }
        }

        if self.data.is_empty() {
            return Err(ProcessingError::InvalidUpload("Uploaded file is empty".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub document_type: DocumentType,
    pub raw_text: String,
    pub parsed: ParsedDocument,
    pub lines_detected: usize,
    pub auto_detected: bool,
    pub ocr_engine: String,
    pub ai_processor: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("No file provided")]
    MissingFile,

    #[error("Invalid file type ({0}). Please upload an image.")]
    InvalidFileType(String),

    #[error(transparent)]
    InvalidDocumentType(#[from] UnknownDocumentType),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("{message}")]
    Multipart { status: StatusCode, message: String },

    #[error(transparent)]
    Ocr(#[from] OcrError),
}

impl ProcessingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFile
            | Self::InvalidFileType(_)
            | Self::InvalidDocumentType(_)
            | Self::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            Self::Multipart { status, .. } => *status,
            Self::Ocr(e) => e.status_code(),
        }
    }

    /// Message returned to the caller, marked as a hard failure.
    pub fn detail(&self) -> String {
        let message = match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => format!("OCR processing failed: {}", self),
            _ => self.to_string(),
        };
        format!("{}. {}", message.trim_end_matches('.'), HARD_FAILURE_MARKER)
    }
}

/// The request pipeline, built once at startup and shared by every request.
pub struct DocumentProcessor {
    ocr: OcrService,
    classifier: DocumentClassifier,
    extractor: FieldExtractor,
    ai_processor: String,
    llm_ready: bool,
}

impl DocumentProcessor {
    pub fn new(engine: Arc<dyn OcrEngine>, llm: Arc<dyn CompletionClient>, config: &Config) -> Self {
        Self::with_limits(
            engine,
            llm,
            Duration::from_secs(config.ocr_timeout_seconds),
            config.classification_char_limit,
        )
    }

    pub fn with_limits(
        engine: Arc<dyn OcrEngine>,
        llm: Arc<dyn CompletionClient>,
        ocr_timeout: Duration,
        classification_char_limit: usize,
    ) -> Self {
        Self {
            ocr: OcrService::new(engine, ocr_timeout),
            classifier: DocumentClassifier::new(llm.clone(), classification_char_limit),
            extractor: FieldExtractor::new(llm.clone()),
            ai_processor: llm.name().to_string(),
            llm_ready: llm.is_ready(),
        }
    }

    pub fn ocr_engine_name(&self) -> &str {
        self.ocr.engine_name()
    }

    pub fn ai_processor_name(&self) -> &str {
        &self.ai_processor
    }

    pub async fn ocr_ready(&self) -> bool {
        self.ocr.is_ready().await
    }

    pub fn llm_ready(&self) -> bool {
        self.llm_ready
    }

    pub async fn process(
        &self,
        upload: &UploadedImage,
        hint: DocumentTypeHint,
    ) -> Result<ProcessedDocument, ProcessingError> {
        upload.validate()?;

        info!(
            "Processing image: {} ({} bytes)",
            upload.filename.as_deref().unwrap_or("<unnamed>"),
            upload.data.len()
        );

        let lines = self.ocr.recognize(&upload.data).await.map_err(|e| {
            warn!("OCR failed: {}", e);
            e
        })?;
        let raw_text = lines.join("\n");

        let mut warnings = Vec::new();
        let document_type = match hint {
            DocumentTypeHint::Explicit(document_type) => {
                info!("Using specified document type: {}", document_type);
                document_type
            }
            DocumentTypeHint::Auto => {
                info!("Auto-detecting document type...");
                let classification = self.classifier.classify(&raw_text).await;
                warnings.extend(classification.warning);
                classification.document_type
            }
        };

        let extraction = self.extractor.extract(&raw_text, document_type).await;
        warnings.extend(extraction.warning);

        Ok(ProcessedDocument {
            document_type,
            raw_text,
            parsed: extraction.parsed,
            lines_detected: lines.len(),
            auto_detected: hint.is_auto(),
            ocr_engine: self.ocr.engine_name().to_string(),
            ai_processor: self.ai_processor.clone(),
            warnings,
        })
    }
}
