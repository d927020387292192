use std::sync::Arc;
use tracing::{info, warn};

use super::templates::{classification_prompt, truncate_chars};
use super::DocumentType;
use crate::llm::CompletionClient;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub document_type: DocumentType,
    /// Set when the answer was not usable and the fallback type was chosen
    pub warning: Option<String>,
}

/// Asks the LLM which of the known document types some OCR text is.
pub struct DocumentClassifier {
    llm: Arc<dyn CompletionClient>,
    char_limit: usize,
}

impl DocumentClassifier {
    pub fn new(llm: Arc<dyn CompletionClient>, char_limit: usize) -> Self {
        Self { llm, char_limit }
    }

    /// Classify OCR text. Never fails: anything unusable becomes `DocumentType::FALLBACK`.
    pub async fn classify(&self, ocr_text: &str) -> Classification {
        let prompt = classification_prompt(truncate_chars(ocr_text, self.char_limit));

        let answer = match self.llm.complete(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Document type detection failed: {}, defaulting to {}", e, DocumentType::FALLBACK);
                return Classification {
                    document_type: DocumentType::FALLBACK,
                    warning: Some(format!("Document type detection failed ({}); defaulted to {}", e, DocumentType::FALLBACK)),
                };
            }
        };

        match parse_answer(&answer) {
            Some(document_type) => {
                info!("Detected document type: {}", document_type);
                Classification {
                    document_type,
                    warning: None,
                }
            }
            None => {
                warn!("Unknown document type detected: {:?}, defaulting to {}", answer.trim(), DocumentType::FALLBACK);
                Classification {
                    document_type: DocumentType::FALLBACK,
                    warning: Some(format!(
                        "Unrecognized document type answer '{}'; defaulted to {}",
                        answer.trim(),
                        DocumentType::FALLBACK
                    )),
                }
            }
        }
    }
}

/// Accept only a single vocabulary token, tolerating quotes, backticks and a trailing period.
fn parse_answer(answer: &str) -> Option<DocumentType> {
    let token = answer
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '.'))
        .trim()
        .to_lowercase();

    if token.is_empty() || token.split_whitespace().count() != 1 {
        return None;
    }

    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedCompletionClient;

    fn classifier(llm: &Arc<ScriptedCompletionClient>) -> DocumentClassifier {
        DocumentClassifier::new(llm.clone(), 1000)
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("receipt"), Some(DocumentType::Receipt));
        assert_eq!(parse_answer("  Invoice\n"), Some(DocumentType::Invoice));
        assert_eq!(parse_answer("`bank_statement`."), Some(DocumentType::BankStatement));
        assert_eq!(parse_answer("\"stock_card\""), Some(DocumentType::StockCard));
        assert_eq!(parse_answer("it is a receipt"), None);
        assert_eq!(parse_answer("memo"), None);
        assert_eq!(parse_answer(""), None);
    }

    #[tokio::test]
    async fn test_valid_answer_is_accepted() {
        let llm = Arc::new(ScriptedCompletionClient::new(vec![Ok("purchase_order".into())]));
        let result = classifier(&llm).classify("PO-2025-001").await;

        assert_eq!(result.document_type, DocumentType::PurchaseOrder);
        assert!(result.warning.is_none());
    }

    #[tokio::test]
    async fn test_out_of_vocabulary_defaults_to_receipt() {
        for answer in ["memo", "Receipt or invoice", "```json\n{}\n```", "faktur"] {
            let llm = Arc::new(ScriptedCompletionClient::new(vec![Ok(answer.into())]));
            let result = classifier(&llm).classify("some text").await;

            assert_eq!(result.document_type, DocumentType::Receipt, "answer {:?}", answer);
            assert!(result.warning.is_some());
        }
    }

    #[tokio::test]
    async fn test_llm_failure_defaults_to_receipt() {
        let llm = Arc::new(ScriptedCompletionClient::new(vec![Err("quota exceeded".into())]));
        let result = classifier(&llm).classify("some text").await;

        assert_eq!(result.document_type, DocumentType::Receipt);
        assert!(result.warning.unwrap().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_prompt_only_carries_truncated_text() {
        let llm = Arc::new(ScriptedCompletionClient::new(vec![Ok("contract".into())]));
        let text = format!("{}{}", "A".repeat(10), "Z".repeat(50));
        DocumentClassifier::new(llm.clone(), 10).classify(&text).await;

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("AAAAAAAAAA"));
        assert!(!prompts[0].contains("ZZ"));
    }

    #[tokio::test]
    async fn test_classification_is_idempotent() {
        let llm = Arc::new(ScriptedCompletionClient::always(Ok("invoice".into())));
        let detector = classifier(&llm);

        let first = detector.classify("INVOICE #42").await;
        let second = detector.classify("INVOICE #42").await;
        assert_eq!(first, second);
        assert_eq!(llm.prompts()[0], llm.prompts()[1]);
    }
}
