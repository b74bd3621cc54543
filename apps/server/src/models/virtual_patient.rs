use serde::{Deserialize, Serialize};
use validator::Validate;

/// Simulated patient used in ambulance training scenarios
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VirtualPatient {
    /// Assigned by the service on create when left empty
    #[serde(default)]
    pub id: String,

    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    /// Reference to the patient's medical record in an external system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,

    /// Scenario difficulty, 1 (easy) to 5 (hard)
    #[validate(range(min = 1, max = 5, message = "difficulty must be between 1 and 5"))]
    pub difficulty: i32,

    #[serde(default)]
    pub symptoms: Vec<String>,

    #[serde(default)]
    pub anamnesis: String,
}
