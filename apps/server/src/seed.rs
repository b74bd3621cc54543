//! Sample virtual patients for a freshly created collection

use vpatient_store::{DocumentStore, OperationContext, StoreError, StoreResult};

use crate::models::VirtualPatient;

fn sample(
    id: &str,
    name: &str,
    record_id: &str,
    difficulty: i32,
    symptoms: &[&str],
    anamnesis: &str,
) -> VirtualPatient {
    VirtualPatient {
        id: id.to_string(),
        name: name.to_string(),
        record_id: Some(record_id.to_string()),
        difficulty,
        symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        anamnesis: anamnesis.to_string(),
    }
}

pub fn sample_patients() -> Vec<VirtualPatient> {
    vec![
        sample(
            "vp-001",
            "Anna Kováčová",
            "mongo-record-123",
            2,
            &["fever", "cough", "fatigue"],
            "Patient reports feeling unwell for the past 3 days",
        ),
        sample(
            "vp-002",
            "Filip Mocháč",
            "mongo-record-456",
            3,
            &["headache", "nausea", "dizziness"],
            "Patient reports severe headache and dizziness since morning",
        ),
        sample(
            "vp-003",
            "Peter Novák",
            "mongo-record-789",
            4,
            &["chest pain", "shortness of breath", "sweating"],
            "Patient reports severe chest pain and difficulty breathing",
        ),
        sample(
            "vp-004",
            "Mária Horváthová",
            "mongo-record-101",
            1,
            &["sore throat", "runny nose", "mild fever"],
            "Patient reports cold-like symptoms for 2 days",
        ),
        sample(
            "vp-005",
            "Ján Tóth",
            "mongo-record-202",
            5,
            &["severe abdominal pain", "vomiting", "fever", "dehydration"],
            "Patient reports acute abdominal pain and persistent vomiting for 12 hours",
        ),
    ]
}

/// Insert the sample patients, leaving any id that already exists untouched
///
/// Returns how many were inserted.
pub async fn seed_patients(
    store: &dyn DocumentStore<VirtualPatient>,
    ctx: &OperationContext,
) -> StoreResult<usize> {
    let mut inserted = 0;
    for patient in sample_patients() {
        match store.create_document(ctx, &patient.id, &patient).await {
            Ok(()) => inserted += 1,
            Err(StoreError::Conflict { .. }) => {
                tracing::debug!(id = %patient.id, "Sample patient already present");
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        collection = store.collection_name(),
        inserted,
        "Sample virtual patients seeded"
    );
    Ok(inserted)
}
