//! Line sources
//!
//! The OCR engines don't agree on a result layout, and PaddleOCR has changed
//! its own between major versions. Each `LineSource` understands one layout
//! and pulls the recognized text lines out of it; `OcrService` tries them in
//! order and keeps the first non-empty answer.

use serde_json::Value;

/// Keys whose string value is a recognized line.
const TEXT_KEYS: [&str; 4] = ["rec_text", "text", "transcription", "content"];

/// Keys known to hold nested recognition results. Walked before anything else.
const RESULT_KEYS: [&str; 5] = ["ocr_text_result", "text_result", "ocr_result", "det_res", "rec_res"];

pub trait LineSource: Send + Sync {
    /// Short name used in logs and error messages
    fn name(&self) -> &'static str;

    /// Extract text lines from a raw engine result. An empty vector means
    /// this source doesn't recognize the layout.
    fn extract(&self, raw: &Value) -> Vec<String>;
}

/// PaddleOCR 3.x page results: `[{"rec_texts": ["...", ...], ...}, ...]`.
pub struct RecTextsSource;

impl LineSource for RecTextsSource {
    fn name(&self) -> &'static str {
        "rec_texts"
    }

    fn extract(&self, raw: &Value) -> Vec<String> {
        let pages: Vec<&Value> = match raw {
            Value::Array(items) => items.iter().collect(),
            Value::Object(_) => vec![raw],
            _ => return Vec::new(),
        };

        pages
            .into_iter()
            .filter_map(|page| page.get("rec_texts").and_then(Value::as_array))
            .flatten()
            .filter_map(|text| match text {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Best-effort depth-first search over the whole result for anything that looks like text.
pub struct DeepWalkSource;

impl DeepWalkSource {
    fn walk(value: &Value, lines: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                for key in TEXT_KEYS {
                    if let Some(Value::String(text)) = map.get(key) {
                        let text = text.trim();
                        if !text.is_empty() {
                            lines.push(text.to_string());
                        }
                    }
                }

                for key in RESULT_KEYS {
                    if let Some(nested) = map.get(key) {
                        Self::walk(nested, lines);
                    }
                }

                for (key, nested) in map {
                    if RESULT_KEYS.contains(&key.as_str()) {
                        continue;
                    }
                    if nested.is_object() || nested.is_array() {
                        Self::walk(nested, lines);
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    Self::walk(item, lines);
                }
            }
            _ => {}
        }
    }
}

impl LineSource for DeepWalkSource {
    fn name(&self) -> &'static str {
        "deep_walk"
    }

    fn extract(&self, raw: &Value) -> Vec<String> {
        let mut lines = Vec::new();
        Self::walk(raw, &mut lines);
        lines
    }
}

/// Sources in the order `OcrService` consults them.
pub fn default_sources() -> Vec<Box<dyn LineSource>> {
    vec![Box::new(RecTextsSource), Box::new(DeepWalkSource)]
}
