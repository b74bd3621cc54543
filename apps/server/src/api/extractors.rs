//! Custom Axum extractors for request bodies

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::Error;

/// JSON body that is deserialized and then validated
///
/// Rejections are returned as [`Error::PayloadTooLarge`], [`Error::InvalidBody`] or
/// [`Error::Validation`] so they share the service's error body shape.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                Error::PayloadTooLarge(e.body_text())
            } else {
                Error::InvalidBody(format!("Failed to read request body: {}", e))
            }
        })?;

        let value: T = serde_json::from_slice(&bytes)
            .map_err(|e| Error::InvalidBody(format!("Invalid JSON in request body: {}", e)))?;

        value
            .validate()
            .map_err(|e| Error::Validation(e.to_string()))?;

        Ok(ValidatedJson(value))
    }
}
