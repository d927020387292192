//! Document types, their field records, and the LLM-backed classifier and extractor.

pub mod classifier;
pub mod extractor;
pub mod fields;
pub mod templates;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use classifier::{Classification, DocumentClassifier};
pub use extractor::{Extraction, FieldExtractor};
pub use fields::ParsedDocument;

/// The closed set of document kinds the service knows how to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Receipt,
    Invoice,
    PurchaseOrder,
    BankStatement,
    StockCard,
    Contract,
}

impl DocumentType {
    pub const ALL: [DocumentType; 6] = [
        DocumentType::Receipt,
        DocumentType::Invoice,
        DocumentType::PurchaseOrder,
        DocumentType::BankStatement,
        DocumentType::StockCard,
        DocumentType::Contract,
    ];

    /// Used whenever classification can't produce a trustworthy answer.
    pub const FALLBACK: DocumentType = DocumentType::Receipt;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receipt => "receipt",
            Self::Invoice => "invoice",
            Self::PurchaseOrder => "purchase_order",
            Self::BankStatement => "bank_statement",
            Self::StockCard => "stock_card",
            Self::Contract => "contract",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported document type '{0}'. Expected one of: auto, receipt, invoice, purchase_order, bank_statement, stock_card, contract")]
pub struct UnknownDocumentType(pub String);

impl FromStr for DocumentType {
    type Err = UnknownDocumentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| UnknownDocumentType(s.trim().to_string()))
    }
}

/// What the caller asked for: a specific type, or detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentTypeHint {
    #[default]
    Auto,
    Explicit(DocumentType),
}

impl DocumentTypeHint {
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl FromStr for DocumentTypeHint {
    type Err = UnknownDocumentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        trimmed.parse().map(Self::Explicit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_round_trips_through_str() {
        for doc_type in DocumentType::ALL {
            assert_eq!(doc_type.as_str().parse::<DocumentType>().unwrap(), doc_type);
        }
    }

    #[test]
    fn test_document_type_parse_is_case_insensitive() {
        assert_eq!("  Bank_Statement ".parse::<DocumentType>().unwrap(), DocumentType::BankStatement);
        assert!("bank statement".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_hint_parsing() {
        assert_eq!("auto".parse::<DocumentTypeHint>().unwrap(), DocumentTypeHint::Auto);
        assert_eq!("".parse::<DocumentTypeHint>().unwrap(), DocumentTypeHint::Auto);
        assert_eq!("AUTO".parse::<DocumentTypeHint>().unwrap(), DocumentTypeHint::Auto);
        assert_eq!(
            "invoice".parse::<DocumentTypeHint>().unwrap(),
            DocumentTypeHint::Explicit(DocumentType::Invoice)
        );

        let err = "memo".parse::<DocumentTypeHint>().unwrap_err();
        assert_eq!(err, UnknownDocumentType("memo".to_string()));
    }

    #[test]
    fn test_document_type_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&DocumentType::PurchaseOrder).unwrap(), "\"purchase_order\"");
    }
}
