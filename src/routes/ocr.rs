use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::documents::DocumentTypeHint;
use crate::ingestion::document_processing::{ProcessingError, UploadedImage};
use crate::models::{ErrorResponse, ProcessResponse};
use crate::utils::ocr::is_image_content_type;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/process", post(process_document))
}

/// Multipart form accepted by `/ocr/process` (documentation only)
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct ProcessUpload {
    /// Document image (any `image/*` content type)
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    /// `auto` (default) or one of the supported document types
    document_type: Option<String>,
}

impl IntoResponse for ProcessingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected ({}): {}", status, self);
        }
        (status, Json(ErrorResponse::new(self.detail()))).into_response()
    }
}

fn multipart_error(err: MultipartError) -> ProcessingError {
    ProcessingError::Multipart {
        status: err.status(),
        message: err.body_text(),
    }
}

#[utoipa::path(
    post,
    path = "/ocr/process",
    tag = "ocr",
    request_body(content = ProcessUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Document recognized and parsed", body = ProcessResponse),
        (status = 400, description = "Missing file, non-image upload, malformed form or unknown document type", body = ErrorResponse),
        (status = 413, description = "Upload exceeds MAX_FILE_SIZE_MB", body = ErrorResponse),
        (status = 422, description = "No text could be read from the image", body = ErrorResponse),
        (status = 500, description = "OCR engine failure", body = ErrorResponse),
        (status = 503, description = "OCR engine unreachable", body = ErrorResponse),
        (status = 504, description = "OCR engine timed out", body = ErrorResponse)
    )
)]
async fn process_document(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessResponse>, ProcessingError> {
    let request_id = Uuid::new_v4();

    handle_upload(state, multipart)
        .instrument(info_span!("ocr_process", %request_id))
        .await
}

async fn handle_upload(
    state: Arc<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessResponse>, ProcessingError> {
    let multipart = multipart.map_err(|rejection| ProcessingError::Multipart {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;
    let (upload, hint) = read_form(multipart).await?;

    let processed = state.processor.process(&upload, hint).await?;
    info!(
        "Processed {} ({} lines, auto_detected={})",
        processed.document_type, processed.lines_detected, processed.auto_detected
    );

    Ok(Json(ProcessResponse::from(processed)))
}

async fn read_form(
    mut multipart: Multipart,
) -> Result<(UploadedImage, DocumentTypeHint), ProcessingError> {
    let mut upload = None;
    let mut document_type = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let content_type = field.content_type().map(str::to_string);
                // Reject on the declared type before buffering the body.
                if !content_type.as_deref().is_some_and(is_image_content_type) {
                    return Err(ProcessingError::InvalidFileType(
                        content_type.unwrap_or_else(|| "none".to_string()),
                    ));
                }
                let filename = field.file_name().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                upload = Some(UploadedImage {
                    data: data.to_vec(),
                    content_type,
                    filename,
                });
            }
            Some("document_type") => {
                document_type = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let upload = upload.ok_or(ProcessingError::MissingFile)?;
    let hint = match document_type {
        Some(raw) => raw.parse::<DocumentTypeHint>()?,
        None => DocumentTypeHint::Auto,
    };

    Ok((upload, hint))
}
