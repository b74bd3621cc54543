//! Virtual patient routes

use crate::api::handlers::{
    create_virtual_patient, delete_virtual_patient, get_virtual_patient, list_virtual_patients,
    update_virtual_patient,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn virtual_patient_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/virtual-patient",
            get(list_virtual_patients).post(create_virtual_patient),
        )
        .route(
            "/virtual-patient/:virtualPatientId",
            get(get_virtual_patient)
                .put(update_virtual_patient)
                .delete(delete_virtual_patient),
        )
}
