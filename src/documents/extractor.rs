use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{info, warn};

use super::fields::ParsedDocument;
use super::templates::extraction_prompt;
use super::DocumentType;
use crate::llm::CompletionClient;

/// Opening fence with an optional language tag, e.g. "```json".
static OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[A-Za-z0-9_-]*[ \t]*\r?\n?").expect("valid regex"));

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub parsed: ParsedDocument,
    /// Set when the placeholder was returned instead of real fields
    pub warning: Option<String>,
}

impl Extraction {
    fn placeholder(doc_type: DocumentType, warning: String) -> Self {
        Self {
            parsed: ParsedDocument::placeholder(doc_type),
            warning: Some(warning),
        }
    }
}

/// Pulls a typed field record for a known document type out of OCR text.
pub struct FieldExtractor {
    llm: Arc<dyn CompletionClient>,
}

impl FieldExtractor {
    pub fn new(llm: Arc<dyn CompletionClient>) -> Self {
        Self { llm }
    }

    /// Extract fields. Never fails: any problem yields the type's placeholder and a warning.
    pub async fn extract(&self, ocr_text: &str, doc_type: DocumentType) -> Extraction {
        let prompt = extraction_prompt(doc_type, ocr_text);

        let completion = match self.llm.complete(&prompt).await {
            Ok(completion) => completion,
            Err(e) => {
                warn!("{} extraction failed: {}", doc_type, e);
                return Extraction::placeholder(doc_type, format!("{} extraction failed: {}", doc_type, e));
            }
        };

        match parse_completion(doc_type, &completion) {
            Ok(parsed) => {
                info!("Extracted {} fields", doc_type);
                Extraction {
                    parsed,
                    warning: None,
                }
            }
            Err(e) => {
                warn!("{} JSON parse error: {}, using placeholder", doc_type, e);
                Extraction::placeholder(doc_type, format!("Could not parse {} fields: {}", doc_type, e))
            }
        }
    }
}

/// Parse a completion into the record for `doc_type`, after removing any code fence.
pub fn parse_completion(doc_type: DocumentType, completion: &str) -> Result<ParsedDocument, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(completion))?;
    ParsedDocument::from_value(doc_type, value)
}

/// Remove a surrounding markdown code fence, if there is one. Text without a
/// leading fence is only trimmed.
pub fn strip_code_fence(completion: &str) -> &str {
    let trimmed = completion.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let without_open = match OPENING_FENCE.find(trimmed) {
        Some(m) => &trimmed[m.end()..],
        None => trimmed,
    };
    // Anything after the last fence (notes, caveats) is dropped.
    let without_close = match without_open.rfind("```") {
        Some(end) => &without_open[..end],
        None => without_open,
    };
    without_close.trim()
}
