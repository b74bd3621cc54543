//! Virtual patient CRUD handlers
//!
//! Each handler invokes exactly one store operation and maps its outcome:
//! success to 2xx, `NotFound` to 404, `Conflict` to 409, `Backend` to 502.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use vpatient_store::StoreError;

use crate::{api::extractors::ValidatedJson, models::VirtualPatient, state::AppState, Error, Result};

/// Pick the user-facing message for a failed store call
fn store_error(action: &str, err: StoreError) -> Error {
    let message = match &err {
        StoreError::NotFound { .. } => "Virtual patient not found".to_string(),
        StoreError::Conflict { .. } => "Virtual patient already exists".to_string(),
        StoreError::Backend { .. } => format!("Failed to {action} virtual patient in database"),
    };
    Error::store(message, err)
}

/// List all virtual patients (GET /api/virtual-patient)
pub async fn list_virtual_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<VirtualPatient>>> {
    let ctx = state.operation_context();
    let patients = state
        .patients
        .list_documents(&ctx)
        .await
        .map_err(|e| store_error("list", e))?;

    Ok(Json(patients))
}

/// Create a virtual patient (POST /api/virtual-patient)
///
/// A missing or empty `id` is replaced with a fresh UUID.
pub async fn create_virtual_patient(
    State(state): State<AppState>,
    ValidatedJson(mut patient): ValidatedJson<VirtualPatient>,
) -> Result<impl IntoResponse> {
    if patient.id.trim().is_empty() {
        patient.id = uuid::Uuid::new_v4().to_string();
    }

    let ctx = state.operation_context();
    state
        .patients
        .create_document(&ctx, &patient.id, &patient)
        .await
        .map_err(|e| store_error("create", e))?;

    tracing::info!(id = %patient.id, "Virtual patient created");
    Ok((StatusCode::CREATED, Json(patient)))
}

/// Read one virtual patient (GET /api/virtual-patient/{virtualPatientId})
pub async fn get_virtual_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VirtualPatient>> {
    let ctx = state.operation_context();
    let patient = state
        .patients
        .find_document(&ctx, &id)
        .await
        .map_err(|e| store_error("read", e))?;

    Ok(Json(patient))
}

/// Replace a virtual patient (PUT /api/virtual-patient/{virtualPatientId})
///
/// The id in the path is authoritative; any id in the body is overwritten.
pub async fn update_virtual_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(mut patient): ValidatedJson<VirtualPatient>,
) -> Result<Json<VirtualPatient>> {
    patient.id = id;

    let ctx = state.operation_context();
    state
        .patients
        .update_document(&ctx, &patient.id, &patient)
        .await
        .map_err(|e| store_error("update", e))?;

    tracing::info!(id = %patient.id, "Virtual patient updated");
    Ok(Json(patient))
}

/// Delete a virtual patient (DELETE /api/virtual-patient/{virtualPatientId})
pub async fn delete_virtual_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let ctx = state.operation_context();
    state
        .patients
        .delete_document(&ctx, &id)
        .await
        .map_err(|e| store_error("delete", e))?;

    tracing::info!(id = %id, "Virtual patient deleted");
    Ok(StatusCode::NO_CONTENT)
}
