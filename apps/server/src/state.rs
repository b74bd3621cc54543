//! Shared application state handed to every request handler

use std::sync::Arc;
use vpatient_store::{DocumentStore, OperationContext};

use crate::{config::Config, models::VirtualPatient};

pub type PatientStore = Arc<dyn DocumentStore<VirtualPatient>>;

/// State injected into the router
///
/// Holds the single store instance for virtual patients, constructed once at start-up.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub patients: PatientStore,
}

impl AppState {
    pub fn new(config: Config, patients: PatientStore) -> Self {
        Self {
            config: Arc::new(config),
            patients,
        }
    }

    /// Context for the store calls made while serving one request
    pub fn operation_context(&self) -> OperationContext {
        OperationContext::with_timeout(self.config.server.request_timeout)
    }
}
