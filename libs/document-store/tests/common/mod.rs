//! Behaviour every `DocumentStore` backend must share
//!
//! Each check takes a fresh, empty store so the same suite can run against the
//! in-memory backend and a live MongoDB.

use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use vpatient_store::{DocumentStore, ErrorKind, OperationContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
}

pub fn patient(id: &str, name: &str) -> Patient {
    Patient {
        id: id.to_string(),
        name: name.to_string(),
        symptoms: vec!["fever".to_string()],
    }
}

pub type SharedStore = Arc<dyn DocumentStore<Patient>>;

pub async fn create_then_find_round_trips(store: SharedStore) -> anyhow::Result<()> {
    let ctx = OperationContext::new();
    let inserted = patient("vp-001", "Anna");

    store.create_document(&ctx, "vp-001", &inserted).await?;
    let found = store.find_document(&ctx, "vp-001").await?;

    ensure!(found == inserted, "round trip changed the record: {found:?}");
    Ok(())
}

pub async fn absent_id_is_not_found(store: SharedStore) -> anyhow::Result<()> {
    let ctx = OperationContext::new();

    let find = store.find_document(&ctx, "missing").await.unwrap_err();
    let update = store
        .update_document(&ctx, "missing", &patient("missing", "Nobody"))
        .await
        .unwrap_err();
    let delete = store.delete_document(&ctx, "missing").await.unwrap_err();

    ensure!(find.kind() == ErrorKind::NotFound, "find: {find}");
    ensure!(update.kind() == ErrorKind::NotFound, "update: {update}");
    ensure!(delete.kind() == ErrorKind::NotFound, "delete: {delete}");

    // update must not have created the document
    ensure!(store.list_documents(&ctx).await?.is_empty());
    Ok(())
}

pub async fn duplicate_create_conflicts(store: SharedStore) -> anyhow::Result<()> {
    let ctx = OperationContext::new();
    store
        .create_document(&ctx, "vp-002", &patient("vp-002", "Filip"))
        .await?;

    let err = store
        .create_document(&ctx, "vp-002", &patient("vp-002", "Impostor"))
        .await
        .unwrap_err();

    ensure!(err.kind() == ErrorKind::Conflict, "expected conflict, got {err}");
    let kept = store.find_document(&ctx, "vp-002").await?;
    ensure!(kept.name == "Filip", "original was overwritten: {kept:?}");
    Ok(())
}

pub async fn delete_is_visible(store: SharedStore) -> anyhow::Result<()> {
    let ctx = OperationContext::new();
    store
        .create_document(&ctx, "vp-003", &patient("vp-003", "Peter"))
        .await?;

    store.delete_document(&ctx, "vp-003").await?;

    let err = store.find_document(&ctx, "vp-003").await.unwrap_err();
    ensure!(err.kind() == ErrorKind::NotFound, "expected not found, got {err}");
    Ok(())
}

pub async fn list_returns_exactly_inserted(store: SharedStore) -> anyhow::Result<()> {
    let ctx = OperationContext::new();
    ensure!(store.list_documents(&ctx).await?.is_empty());

    let inserted: Vec<Patient> = (0..7)
        .map(|n| patient(&format!("vp-{n:03}"), &format!("Patient {n}")))
        .collect();
    for record in &inserted {
        store.create_document(&ctx, &record.id, record).await?;
    }

    let listed = store.list_documents(&ctx).await?;
    ensure!(listed.len() == inserted.len(), "listed {} records", listed.len());

    let by_id: HashMap<&str, &Patient> = listed.iter().map(|p| (p.id.as_str(), p)).collect();
    ensure!(by_id.len() == inserted.len(), "duplicate ids in listing");
    for record in &inserted {
        ensure!(
            by_id.get(record.id.as_str()) == Some(&record),
            "missing or altered {}",
            record.id
        );
    }
    Ok(())
}

pub async fn update_replaces_whole_document(store: SharedStore) -> anyhow::Result<()> {
    let ctx = OperationContext::new();
    store.create_document(&ctx, "p1", &patient("p1", "A")).await?;

    let replacement = Patient {
        id: "p1".to_string(),
        name: "B".to_string(),
        symptoms: Vec::new(),
    };
    store.update_document(&ctx, "p1", &replacement).await?;

    let found = store.find_document(&ctx, "p1").await?;
    ensure!(found == replacement, "update merged instead of replacing: {found:?}");
    Ok(())
}

pub async fn concurrent_creates_single_winner(store: SharedStore) -> anyhow::Result<()> {
    let mut handles = Vec::new();
    for attempt in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let ctx = OperationContext::new();
            store
                .create_document(&ctx, "p2", &patient("p2", &format!("Writer {attempt}")))
                .await
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await? {
            Ok(()) => created += 1,
            Err(e) if e.kind() == ErrorKind::Conflict => conflicts += 1,
            Err(e) => anyhow::bail!("unexpected error: {e}"),
        }
    }

    ensure!(created == 1, "{created} writers succeeded");
    ensure!(conflicts == 7, "{conflicts} writers saw conflict");
    Ok(())
}

pub async fn cancelled_context_fails_fast(store: SharedStore) -> anyhow::Result<()> {
    let ctx = OperationContext::new();
    ctx.cancel();

    let started = Instant::now();
    let err = store.list_documents(&ctx).await.unwrap_err();
    ensure!(err.kind() == ErrorKind::Backend, "expected backend, got {err}");

    let err = store
        .create_document(&ctx, "p3", &patient("p3", "Late"))
        .await
        .unwrap_err();
    ensure!(err.kind() == ErrorKind::Backend, "expected backend, got {err}");
    ensure!(started.elapsed() < Duration::from_secs(1), "cancelled call blocked");

    // nothing was written
    let live = OperationContext::new();
    let err = store.find_document(&live, "p3").await.unwrap_err();
    ensure!(err.kind() == ErrorKind::NotFound);
    Ok(())
}

pub async fn expired_deadline_fails_fast(store: SharedStore) -> anyhow::Result<()> {
    let ctx = OperationContext::with_timeout(Duration::ZERO);

    let started = Instant::now();
    let err = store.find_document(&ctx, "anything").await.unwrap_err();

    ensure!(err.kind() == ErrorKind::Backend, "expected backend, got {err}");
    ensure!(started.elapsed() < Duration::from_secs(1), "expired call blocked");
    Ok(())
}
