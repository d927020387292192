use axum::{routing::get, Json, Router};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::documents::DocumentType;
use crate::models::{ErrorResponse, HealthResponse, ProcessData, ProcessMeta, ProcessResponse, ServiceInfo};
use crate::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::service_info,
        crate::routes::health::health_check,
        crate::routes::ocr::process_document,
    ),
    components(schemas(
        DocumentType,
        ProcessResponse,
        ProcessData,
        ProcessMeta,
        ErrorResponse,
        ServiceInfo,
        HealthResponse,
        crate::routes::ocr::ProcessUpload,
    )),
    tags(
        (name = "health", description = "Service status"),
        (name = "ocr", description = "Document recognition and field extraction"),
    ),
    info(
        title = "NUSA AI OCR Service",
        description = "Reads text from document images and extracts structured fields with an LLM",
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();

        assert!(paths.contains_key("/"));
        assert!(paths.contains_key("/health"));
        assert!(paths.contains_key("/ocr/process"));
    }
}
