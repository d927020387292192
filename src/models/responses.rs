use serde::Serialize;
use utoipa::ToSchema;

use crate::documents::{DocumentType, ParsedDocument};
use crate::ingestion::document_processing::ProcessedDocument;

pub const SERVICE_NAME: &str = "NUSA AI OCR Service";

/// Successful `/ocr/process` response
#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessResponse {
    pub success: bool,
    pub data: ProcessData,
    pub meta: ProcessMeta,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessData {
    pub document_type: DocumentType,
    pub raw_text: String,
    /// Field record for `documentType`; its shape depends on the type
    #[schema(value_type = Object)]
    pub parsed: ParsedDocument,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessMeta {
    pub ocr_engine: String,
    pub ai_processor: String,
    pub lines_detected: usize,
    pub auto_detected: bool,
    /// Degradations that did not fail the request (classifier or extractor fallbacks)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl From<ProcessedDocument> for ProcessResponse {
    fn from(doc: ProcessedDocument) -> Self {
        Self {
            success: true,
            data: ProcessData {
                document_type: doc.document_type,
                raw_text: doc.raw_text,
                parsed: doc.parsed,
            },
            meta: ProcessMeta {
                ocr_engine: doc.ocr_engine,
                ai_processor: doc.ai_processor,
                lines_detected: doc.lines_detected,
                auto_detected: doc.auto_detected,
                warnings: doc.warnings,
            },
        }
    }
}

/// Body of every failed request
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub status: String,
    pub service: String,
    pub version: String,
    pub ocr_engine: String,
    pub ai_processor: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub ocr_ready: bool,
    pub gemini_ready: bool,
    pub allowed_origin: String,
}
