/*!
 * Unit Tests for Upload Content-Type Routing
 *
 * These tests verify which uploads are allowed into the OCR pipeline,
 * based solely on the declared content type.
 */

#[cfg(test)]
mod tests {
    use nusa_ocr::ingestion::document_processing::{ProcessingError, UploadedImage};
    use nusa_ocr::utils::ocr::is_image_content_type;

    fn upload(content_type: Option<&str>, filename: &str) -> UploadedImage {
        UploadedImage {
            data: b"not really an image".to_vec(),
            content_type: content_type.map(str::to_string),
            filename: Some(filename.to_string()),
        }
    }

    #[test]
    fn test_common_image_types_need_ocr() {
        for content_type in [
            "image/png",
            "image/jpeg",
            "image/jpg",
            "image/tiff",
            "image/bmp",
            "image/gif",
            "image/webp",
            "image/heic",
        ] {
            assert!(is_image_content_type(content_type), "{} should be accepted", content_type);
        }
    }

    #[test]
    fn test_documents_are_not_images() {
        for content_type in [
            "application/pdf",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "application/msword",
            "text/plain",
            "text/csv",
            "multipart/form-data",
        ] {
            assert!(!is_image_content_type(content_type), "{} should be rejected", content_type);
        }
    }

    #[test]
    fn test_content_type_wins_over_filename() {
        // Filename extensions are ignored; only the declared type counts
        assert!(upload(Some("image/png"), "scan.pdf").validate().is_ok());
        assert!(matches!(
            upload(Some("application/pdf"), "scan.png").validate(),
            Err(ProcessingError::InvalidFileType(_))
        ));
    }

    #[test]
    fn test_missing_content_type_is_rejected() {
        let err = upload(None, "scan.png").validate().unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidFileType(_)));
        assert!(err.to_string().contains("none"));
    }
}
