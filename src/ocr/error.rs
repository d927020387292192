use axum::http::StatusCode;

#[derive(Debug, Clone, thiserror::Error)]
pub enum OcrError {
    #[error("No text detected in image. Please upload a clearer image.")]
    NoTextDetected,

    #[error("No OCR text found in result (checked: {sources}). Please check OCR service logs for structure details.")]
    ExtractionFailed { sources: String },

    #[error("Could not read image: {0}")]
    InvalidImage(String),

    #[error("OCR engine not available: {0}")]
    EngineUnavailable(String),

    #[error("OCR engine did not respond within {seconds}s")]
    Timeout { seconds: u64 },

    #[error("OCR engine error: {0}")]
    Engine(String),
}

impl OcrError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoTextDetected | Self::ExtractionFailed { .. } | Self::InvalidImage(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::EngineUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_results_are_unprocessable() {
        assert_eq!(OcrError::NoTextDetected.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            OcrError::ExtractionFailed { sources: "rec_texts".into() }.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_engine_failures_map_to_server_errors() {
        assert_eq!(OcrError::Engine("boom".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(OcrError::Timeout { seconds: 5 }.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            OcrError::EngineUnavailable("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
