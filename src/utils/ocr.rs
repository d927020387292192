/*!
 * Upload Utility Functions
 *
 * Helpers to decide whether an uploaded file can go through the OCR
 * pipeline based on its declared content type.
 */

/// Media type without parameters, lowercased: `"Image/PNG; q=1"` -> `"image/png"`.
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Determine if a declared content type is an image the OCR pipeline should accept
pub fn is_image_content_type(content_type: &str) -> bool {
    let essence = essence(content_type);
    match essence.strip_prefix("image/") {
        Some(subtype) => !subtype.is_empty(),
        None => false,
    }
}
