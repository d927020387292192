use crate::config::{Config, OcrEngineKind};
use std::collections::HashMap;

// Helper to load a config from a fixed set of variables
fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_vars(|key| map.get(key).cloned())
}

// Minimum variables needed for a valid configuration
const MINIMUM: &[(&str, &str)] = &[("GEMINI_API_KEY", "test-key")];

#[test]
fn test_defaults_with_only_api_key() {
    let config = config_from(MINIMUM).expect("Config should load successfully");

    assert_eq!(config.gemini_api_key, "test-key");
    assert_eq!(config.gemini_model, "gemini-2.0-flash");
    assert_eq!(config.gemini_api_base, "https://generativelanguage.googleapis.com");
    assert_eq!(config.llm_temperature, 0.0);
    assert_eq!(config.llm_timeout_seconds, 60);
    assert_eq!(config.allowed_origin, "http://localhost:3000");
    assert_eq!(config.server_address(), "0.0.0.0:8000");
    assert_eq!(config.ocr_engine, OcrEngineKind::Paddle);
    assert_eq!(config.paddle_ocr_url, "http://localhost:8080");
    assert_eq!(config.ocr_language, "ind");
    assert_eq!(config.ocr_timeout_seconds, 120);
    assert_eq!(config.max_file_size_mb, 20);
    assert_eq!(config.max_file_size_bytes(), 20 * 1024 * 1024);
    assert_eq!(config.classification_char_limit, 1000);
}

#[test]
fn test_missing_api_key_fails() {
    let err = config_from(&[]).unwrap_err();
    assert!(err.to_string().contains("GEMINI_API_KEY"));
}

#[test]
fn test_blank_api_key_is_treated_as_missing() {
    let err = config_from(&[("GEMINI_API_KEY", "   ")]).unwrap_err();
    assert!(err.to_string().contains("GEMINI_API_KEY not found"));
}

#[test]
fn test_overrides_are_applied() {
    let config = config_from(&[
        ("GEMINI_API_KEY", "k"),
        ("GEMINI_MODEL", "gemini-1.5-pro"),
        ("GEMINI_API_BASE", "http://llm.internal:9000/"),
        ("HOST", "127.0.0.1"),
        ("PORT", "9100"),
        ("OCR_ENGINE", "Tesseract"),
        ("PADDLE_OCR_URL", "http://paddle:8866/"),
        ("MAX_FILE_SIZE_MB", "5"),
        ("LLM_TEMPERATURE", "0.4"),
    ])
    .expect("Config should load successfully");

    assert_eq!(config.gemini_model, "gemini-1.5-pro");
    assert_eq!(config.gemini_api_base, "http://llm.internal:9000");
    assert_eq!(config.server_address(), "127.0.0.1:9100");
    assert_eq!(config.ocr_engine, OcrEngineKind::Tesseract);
    assert_eq!(config.paddle_ocr_url, "http://paddle:8866");
    assert_eq!(config.max_file_size_mb, 5);
    assert!((config.llm_temperature - 0.4).abs() < f32::EPSILON);
}

#[test]
fn test_invalid_numbers_are_rejected() {
    let err = config_from(&[("GEMINI_API_KEY", "k"), ("PORT", "eighty")]).unwrap_err();
    assert!(err.to_string().contains("PORT"));

    let err = config_from(&[("GEMINI_API_KEY", "k"), ("OCR_TIMEOUT_SECONDS", "-1")]).unwrap_err();
    assert!(err.to_string().contains("OCR_TIMEOUT_SECONDS"));
}

#[test]
fn test_unknown_engine_is_rejected() {
    let err = config_from(&[("GEMINI_API_KEY", "k"), ("OCR_ENGINE", "easyocr")]).unwrap_err();
    assert!(err.to_string().contains("easyocr"));
}

#[test]
fn test_out_of_range_values_fail_validation() {
    assert!(config_from(&[("GEMINI_API_KEY", "k"), ("MAX_FILE_SIZE_MB", "0")]).is_err());
    assert!(config_from(&[("GEMINI_API_KEY", "k"), ("CLASSIFICATION_CHAR_LIMIT", "0")]).is_err());
    assert!(config_from(&[("GEMINI_API_KEY", "k"), ("LLM_TIMEOUT_SECONDS", "0")]).is_err());
    assert!(config_from(&[("GEMINI_API_KEY", "k"), ("LLM_TEMPERATURE", "3.5")]).is_err());
}

#[test]
fn test_blank_optional_values_fall_back_to_defaults() {
    let config = config_from(&[("GEMINI_API_KEY", "k"), ("PORT", ""), ("GEMINI_MODEL", "  ")])
        .expect("Config should load successfully");

    assert_eq!(config.port, 8000);
    assert_eq!(config.gemini_model, "gemini-2.0-flash");
}
