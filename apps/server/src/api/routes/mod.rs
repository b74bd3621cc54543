//! Route definitions

pub mod virtual_patient;
