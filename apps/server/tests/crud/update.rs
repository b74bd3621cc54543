//! UPDATE tests (PUT /api/virtual-patient/{virtualPatientId})
//!
//! Tests cover:
//! - Full replacement of the stored document
//! - Path id wins over the body id
//! - 404 for unknown ids

use crate::support::{
    assert_error_body, assert_status, new_patient, patient_with_id, to_json_body, with_test_app,
};
use axum::http::{Method, StatusCode};
use serde_json::json;
use vpatient_api::models::VirtualPatient;
use vpatient_store::{DocumentStore, OperationContext};

#[tokio::test]
async fn update_replaces_document() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let mut original = patient_with_id("vp-upd", "Sepsis");
            original["recordId"] = json!("record-7");
            app.create_patient(&original).await?;

            // Fields missing from the replacement are not carried over.
            let replacement = json!({
                "name": "Septic shock",
                "difficulty": 5,
                "symptoms": ["fever"]
            });
            let (status, _headers, body) = app
                .request(
                    Method::PUT,
                    "/api/virtual-patient/vp-upd",
                    Some(to_json_body(&replacement)?),
                )
                .await?;
            assert_status(status, StatusCode::OK, "update");

            let updated: VirtualPatient = serde_json::from_slice(&body)?;
            assert_eq!(updated.id, "vp-upd");
            assert_eq!(updated.difficulty, 5);

            let stored = app
                .store
                .find_document(&OperationContext::new(), "vp-upd")
                .await?;
            assert_eq!(stored.name, "Septic shock");
            assert_eq!(stored.record_id, None);
            assert_eq!(stored.anamnesis, "");
            assert_eq!(stored.symptoms, vec!["fever".to_string()]);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn update_uses_path_id_over_body_id() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            app.create_patient(&patient_with_id("vp-path", "Asthma")).await?;

            let (status, _headers, body) = app
                .request(
                    Method::PUT,
                    "/api/virtual-patient/vp-path",
                    Some(to_json_body(&patient_with_id("other-id", "Asthma attack"))?),
                )
                .await?;
            assert_status(status, StatusCode::OK, "update");

            let updated: VirtualPatient = serde_json::from_slice(&body)?;
            assert_eq!(updated.id, "vp-path");
            assert_eq!(app.store.len().await, 1);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn update_returns_404_for_unknown_id() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _headers, body) = app
                .request(
                    Method::PUT,
                    "/api/virtual-patient/missing",
                    Some(to_json_body(&new_patient("Burns"))?),
                )
                .await?;
            assert_status(status, StatusCode::NOT_FOUND, "update unknown");
            assert_error_body(&body, StatusCode::NOT_FOUND)?;

            // Update never creates.
            assert!(app.store.is_empty().await);

            Ok(())
        })
    })
    .await
}
