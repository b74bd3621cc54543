//! READ tests (GET /api/virtual-patient/{virtualPatientId})

use crate::support::{assert_error_body, assert_status, patient_with_id, with_test_app};
use axum::http::{Method, StatusCode};
use vpatient_api::models::VirtualPatient;

#[tokio::test]
async fn read_existing_patient() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = app
                .create_patient(&patient_with_id("vp-read", "Fracture"))
                .await?;

            let (status, _headers, body) = app
                .request(Method::GET, "/api/virtual-patient/vp-read", None)
                .await?;
            assert_status(status, StatusCode::OK, "read");

            let read: VirtualPatient = serde_json::from_slice(&body)?;
            assert_eq!(read, created);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn read_returns_404_for_unknown_id() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _headers, body) = app
                .request(Method::GET, "/api/virtual-patient/does-not-exist", None)
                .await?;
            assert_status(status, StatusCode::NOT_FOUND, "read unknown");

            let message = assert_error_body(&body, StatusCode::NOT_FOUND)?;
            assert_eq!(message, "Virtual patient not found");

            Ok(())
        })
    })
    .await
}
