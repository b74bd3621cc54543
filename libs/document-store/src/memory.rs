//! In-memory document store

use async_trait::async_trait;
use mongodb::bson::Document;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::{
    config::{StoreConfig, DEFAULT_TIMEOUT},
    context::OperationContext,
    error::{StoreError, StoreResult},
    record::{decode, default_collection_name, encode, Record},
    store::DocumentStore,
};

/// Document store backed by an in-process map
///
/// Records go through the same document codec as the MongoDB store, so a record that
/// round-trips here round-trips there. Each operation holds the map lock only for the
/// single-document change, which gives the same per-document atomicity the MongoDB
/// backend provides.
pub struct MemoryDocumentStore<T> {
    documents: RwLock<HashMap<String, Document>>,
    collection: String,
    timeout: Duration,
    disconnected: AtomicBool,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> MemoryDocumentStore<T> {
    pub fn new() -> Self {
        Self::with_collection(default_collection_name::<T>())
    }

    pub fn with_collection(collection: impl Into<String>) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            collection: collection.into(),
            timeout: DEFAULT_TIMEOUT,
            disconnected: AtomicBool::new(false),
            _record: PhantomData,
        }
    }

    /// Build from the same configuration the MongoDB store takes; connection settings
    /// are ignored
    pub fn from_config(config: &StoreConfig) -> Self {
        let resolved = config.resolve::<T>();
        let mut store = Self::with_collection(resolved.collection);
        store.timeout = resolved.timeout;
        store
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::Acquire)
    }

    fn ensure_connected(&self) -> StoreResult<()> {
        if self.is_disconnected() {
            return Err(StoreError::backend_msg(format!(
                "store for {} is disconnected",
                self.collection
            )));
        }
        Ok(())
    }
}

impl<T: Record> Default for MemoryDocumentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> DocumentStore<T> for MemoryDocumentStore<T> {
    async fn create_document(
        &self,
        ctx: &OperationContext,
        id: &str,
        record: &T,
    ) -> StoreResult<()> {
        self.ensure_connected()?;
        let document = encode(id, record)?;

        ctx.run("create_document", self.timeout, async {
            let mut documents = self.documents.write().await;
            if documents.contains_key(id) {
                return Err(StoreError::conflict(&self.collection, id));
            }
            documents.insert(id.to_string(), document);
            Ok(())
        })
        .await
    }

    async fn find_document(&self, ctx: &OperationContext, id: &str) -> StoreResult<T> {
        self.ensure_connected()?;

        let document = ctx
            .run("find_document", self.timeout, async {
                let documents = self.documents.read().await;
                documents
                    .get(id)
                    .cloned()
                    .ok_or_else(|| StoreError::not_found(&self.collection, id))
            })
            .await?;

        decode(document)
    }

    async fn update_document(
        &self,
        ctx: &OperationContext,
        id: &str,
        record: &T,
    ) -> StoreResult<()> {
        self.ensure_connected()?;
        let document = encode(id, record)?;

        ctx.run("update_document", self.timeout, async {
            let mut documents = self.documents.write().await;
            match documents.get_mut(id) {
                Some(existing) => {
                    *existing = document;
                    Ok(())
                }
                None => Err(StoreError::not_found(&self.collection, id)),
            }
        })
        .await
    }

    async fn delete_document(&self, ctx: &OperationContext, id: &str) -> StoreResult<()> {
        self.ensure_connected()?;

        ctx.run("delete_document", self.timeout, async {
            self.documents
                .write()
                .await
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| StoreError::not_found(&self.collection, id))
        })
        .await
    }

    async fn list_documents(&self, ctx: &OperationContext) -> StoreResult<Vec<T>> {
        self.ensure_connected()?;

        let documents: Vec<Document> = ctx
            .run("list_documents", self.timeout, async {
                let documents = self.documents.read().await;
                Ok::<_, StoreError>(documents.values().cloned().collect())
            })
            .await?;

        documents.into_iter().map(decode).collect()
    }

    async fn disconnect(&self) -> StoreResult<()> {
        if !self.disconnected.swap(true, Ordering::AcqRel) {
            tracing::debug!(collection = %self.collection, "In-memory store disconnected");
        }
        Ok(())
    }

    fn collection_name(&self) -> &str {
        &self.collection
    }
}
