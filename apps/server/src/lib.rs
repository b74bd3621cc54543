//! Virtual patient API service
//!
//! HTTP front end for the ambulance training exercise:
//! - CRUD over virtual patients at `/api/virtual-patient`
//! - Persistence through [`vpatient_store::DocumentStore`]
//! - Environment-driven configuration and structured logging

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod seed;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
