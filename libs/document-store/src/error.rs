//! Error taxonomy for document store operations

use std::fmt;
use thiserror::Error;

/// Boxed backend error kept as diagnostic context
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Document store errors
///
/// Callers branch on the variant only. Backend-specific detail is carried for logging.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Document already exists: {collection}/{id}")]
    Conflict { collection: String, id: String },

    #[error("Backend error: {message}")]
    Backend {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

/// Category of a [`StoreError`], for logging and metrics labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Backend,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Backend => "backend",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StoreError {
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn conflict(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::Conflict {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Backend failure with the original error attached
    pub fn backend<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        StoreError::Backend {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Backend failure without an underlying error (cancellation, timeouts, shutdown)
    pub fn backend_msg(message: impl Into<String>) -> Self {
        StoreError::Backend {
            message: message.into(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Conflict { .. } => ErrorKind::Conflict,
            StoreError::Backend { .. } => ErrorKind::Backend,
        }
    }

    /// Full diagnostic chain, including the backend source error when present
    pub fn diagnostic(&self) -> String {
        match self {
            StoreError::Backend {
                message,
                source: Some(source),
            } => format!("{message}: {source}"),
            other => other.to_string(),
        }
    }
}
