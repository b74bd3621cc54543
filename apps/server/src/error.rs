//! Error types for the API service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use vpatient_store::StoreError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Store failure with the user-facing message chosen by the handler
    #[error("{message}")]
    Store {
        message: String,
        #[source]
        source: StoreError,
    },

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
}

impl Error {
    pub fn store(message: impl Into<String>, source: StoreError) -> Self {
        Error::Store {
            message: message.into(),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Store { source, .. } => match source {
                StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::Conflict { .. } => StatusCode::CONFLICT,
                StoreError::Backend { .. } => StatusCode::BAD_GATEWAY,
            },
            Error::InvalidBody(_) | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, detail) = match &self {
            Error::Store { message, source } => {
                if matches!(source, StoreError::Backend { .. }) {
                    tracing::error!(
                        kind = %source.kind(),
                        error = %source.diagnostic(),
                        "{message}"
                    );
                }
                (message.clone(), source.to_string())
            }
            Error::InvalidBody(detail) => ("Invalid request body".to_string(), detail.clone()),
            Error::Validation(detail) => ("Validation failed".to_string(), detail.clone()),
            Error::PayloadTooLarge(detail) => {
                ("Request body too large".to_string(), detail.clone())
            }
        };

        let body = Json(json!({
            "status": status.canonical_reason().unwrap_or("Error"),
            "message": message,
            "error": detail,
        }));

        (status, body).into_response()
    }
}
