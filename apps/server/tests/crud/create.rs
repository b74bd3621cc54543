//! CREATE tests (POST /api/virtual-patient)
//!
//! Tests cover:
//! - Server-assigned ids when the body has none
//! - Caller-chosen ids are kept
//! - Created record is readable through the store

use crate::support::{assert_status, new_patient, patient_with_id, to_json_body, with_test_app};
use axum::http::{Method, StatusCode};
use vpatient_store::{DocumentStore, OperationContext};

#[tokio::test]
async fn create_assigns_id_when_missing() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _headers, body) = app
                .request(
                    Method::POST,
                    "/api/virtual-patient",
                    Some(to_json_body(&new_patient("Chest pain"))?),
                )
                .await?;
            assert_status(status, StatusCode::CREATED, "create");

            let created: serde_json::Value = serde_json::from_slice(&body)?;
            let id = created["id"].as_str().unwrap_or_default();
            assert!(uuid::Uuid::parse_str(id).is_ok(), "expected UUID id, got {id:?}");
            assert_eq!(created["name"], "Chest pain");
            assert_eq!(created["difficulty"], 3);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn create_replaces_blank_id() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = app.create_patient(&patient_with_id("", "Stroke")).await?;
            assert!(!created.id.is_empty());
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn create_keeps_supplied_id() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = app
                .create_patient(&patient_with_id("vp-001", "Anaphylaxis"))
                .await?;
            assert_eq!(created.id, "vp-001");

            let stored = app
                .store
                .find_document(&OperationContext::new(), "vp-001")
                .await?;
            assert_eq!(stored, created);

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn create_stores_record_id() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let mut patient = patient_with_id("vp-002", "Hypoglycemia");
            patient["recordId"] = serde_json::json!("record-0042");

            let created = app.create_patient(&patient).await?;
            assert_eq!(created.record_id.as_deref(), Some("record-0042"));

            Ok(())
        })
    })
    .await
}
