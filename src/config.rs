use anyhow::{anyhow, Context, Result};
use std::str::FromStr;

/// Which OCR backend the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrEngineKind {
    /// PaddleOCR / PaddleX serving endpoint over HTTP
    Paddle,
    /// Local Tesseract (requires the `ocr` feature)
    Tesseract,
}

impl FromStr for OcrEngineKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "paddle" | "paddleocr" => Ok(Self::Paddle),
            "tesseract" => Ok(Self::Tesseract),
            other => Err(anyhow!(
                "Unknown OCR_ENGINE '{}'. Expected 'paddle' or 'tesseract'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub allowed_origin: String,

    // LLM configuration
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub llm_temperature: f32,
    pub llm_timeout_seconds: u64,

    // OCR configuration
    pub ocr_engine: OcrEngineKind,
    pub paddle_ocr_url: String,
    pub ocr_language: String,
    pub ocr_timeout_seconds: u64,

    // Request handling
    pub max_file_size_mb: u64,
    pub classification_char_limit: usize,
}

impl Config {
    /// Load configuration from the process environment (after `.env`, if any, has been applied).
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let gemini_api_key = var("GEMINI_API_KEY")
            .ok_or_else(|| anyhow!("GEMINI_API_KEY not found in environment variables"))?;

        let ocr_engine = match var("OCR_ENGINE") {
            Some(value) => value.parse()?,
            None => OcrEngineKind::Paddle,
        };

        let config = Config {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var(&var, "PORT", 8000)?,
            allowed_origin: var("ALLOWED_ORIGIN")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            gemini_api_key,
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.0-flash".to_string()),
            gemini_api_base: var("GEMINI_API_BASE")
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string())
                .trim_end_matches('/')
                .to_string(),
            llm_temperature: parse_var(&var, "LLM_TEMPERATURE", 0.0)?,
            llm_timeout_seconds: parse_var(&var, "LLM_TIMEOUT_SECONDS", 60)?,
            ocr_engine,
            paddle_ocr_url: var("PADDLE_OCR_URL")
                .unwrap_or_else(|| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            ocr_language: var("OCR_LANGUAGE").unwrap_or_else(|| "ind".to_string()),
            ocr_timeout_seconds: parse_var(&var, "OCR_TIMEOUT_SECONDS", 120)?,
            max_file_size_mb: parse_var(&var, "MAX_FILE_SIZE_MB", 20)?,
            classification_char_limit: parse_var(&var, "CLASSIFICATION_CHAR_LIMIT", 1000)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_file_size_mb == 0 {
            return Err(anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }
        if self.classification_char_limit == 0 {
            return Err(anyhow!("CLASSIFICATION_CHAR_LIMIT must be greater than zero"));
        }
        if self.ocr_timeout_seconds == 0 || self.llm_timeout_seconds == 0 {
            return Err(anyhow!("Timeouts must be at least one second"));
        }
        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(anyhow!(
                "LLM_TEMPERATURE must be between 0.0 and 2.0, got {}",
                self.llm_temperature
            ));
        }
        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn max_file_size_bytes(&self) -> usize {
        (self.max_file_size_mb as usize).saturating_mul(1024 * 1024)
    }
}

fn parse_var<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value for {}: '{}'", key, raw)),
        None => Ok(default),
    }
}
