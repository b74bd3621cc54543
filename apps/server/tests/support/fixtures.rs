use axum::body::Bytes;
use serde_json::{json, Value};

/// A valid virtual patient body without an id
pub fn new_patient(name: &str) -> Value {
    json!({
        "name": name,
        "difficulty": 3,
        "symptoms": ["chest pain", "dyspnea"],
        "anamnesis": "Pain started two hours ago during exercise."
    })
}

/// A valid virtual patient body with a caller-chosen id
pub fn patient_with_id(id: &str, name: &str) -> Value {
    let mut patient = new_patient(name);
    patient["id"] = json!(id);
    patient
}

pub fn to_json_body(value: &Value) -> anyhow::Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}
