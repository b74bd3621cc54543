//! DELETE tests (DELETE /api/virtual-patient/{virtualPatientId})

use crate::support::{assert_status, patient_with_id, with_test_app};
use axum::http::{Method, StatusCode};

#[tokio::test]
async fn delete_then_read_is_not_found() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            app.create_patient(&patient_with_id("vp-del", "Seizure")).await?;

            let (status, _headers, body) = app
                .request(Method::DELETE, "/api/virtual-patient/vp-del", None)
                .await?;
            assert_status(status, StatusCode::NO_CONTENT, "delete");
            assert!(body.is_empty());

            let (status, _headers, _body) = app
                .request(Method::GET, "/api/virtual-patient/vp-del", None)
                .await?;
            assert_status(status, StatusCode::NOT_FOUND, "read after delete");

            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn delete_twice_is_not_found() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            app.create_patient(&patient_with_id("vp-del2", "Syncope")).await?;

            let (status, _headers, _body) = app
                .request(Method::DELETE, "/api/virtual-patient/vp-del2", None)
                .await?;
            assert_status(status, StatusCode::NO_CONTENT, "first delete");

            let (status, _headers, _body) = app
                .request(Method::DELETE, "/api/virtual-patient/vp-del2", None)
                .await?;
            assert_status(status, StatusCode::NOT_FOUND, "second delete");

            Ok(())
        })
    })
    .await
}
