//! Interface description endpoint (GET /openapi)

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};

const OPENAPI_DOCUMENT: &str = include_str!("../../../api/virtual-patient-list.openapi.yaml");

pub async fn openapi_document() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/yaml")],
        OPENAPI_DOCUMENT,
    )
}
