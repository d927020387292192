use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::models::{HealthResponse, ServiceInfo, SERVICE_NAME};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service name, version and active engines", body = ServiceInfo)
    )
)]
async fn service_info(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "OK".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr_engine: state.processor.ocr_engine_name().to_string(),
        ai_processor: state.processor.ai_processor_name().to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Readiness of the OCR engine and the LLM client", body = HealthResponse)
    )
)]
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        ocr_ready: state.processor.ocr_ready().await,
        gemini_ready: state.processor.llm_ready(),
        allowed_origin: state.config.allowed_origin.clone(),
    })
}
