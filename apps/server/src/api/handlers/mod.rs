//! Request handlers for API endpoints
//!
//! Handlers coordinate between routes and the document store, handling:
//! - Request extraction and validation
//! - Store invocation
//! - Response formatting
//! - Error handling

pub mod openapi;
pub mod virtual_patient;

pub use openapi::*;
pub use virtual_patient::*;
