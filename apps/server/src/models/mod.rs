//! Domain models for the API service

pub mod virtual_patient;

pub use virtual_patient::VirtualPatient;
