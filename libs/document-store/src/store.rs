//! Core trait for document store backends

use async_trait::async_trait;

use crate::{context::OperationContext, error::StoreResult, record::Record};

/// Storage operations for one collection of records of type `T`
///
/// Any backend (MongoDB, in-memory, ...) can implement this trait. All operations are
/// safe to call concurrently from many requests; consistency of identifier uniqueness
/// and document presence is delegated to the backend.
///
/// Every operation is bounded by the supplied [`OperationContext`]. Cancellation or an
/// expired deadline surfaces as [`StoreError::Backend`](crate::StoreError::Backend).
#[async_trait]
pub trait DocumentStore<T: Record>: Send + Sync {
    /// Insert a new document keyed by `id`
    ///
    /// # Errors
    /// * `Conflict` - a document with `id` already exists; it is left unchanged
    /// * `Backend` - any other failure
    async fn create_document(&self, ctx: &OperationContext, id: &str, record: &T)
        -> StoreResult<()>;

    /// Fetch the document keyed by `id`
    ///
    /// # Errors
    /// * `NotFound` - no document with `id`
    /// * `Backend` - connectivity or decoding failure
    async fn find_document(&self, ctx: &OperationContext, id: &str) -> StoreResult<T>;

    /// Replace the document keyed by `id` with `record`
    ///
    /// Full replacement, never a merge. The stored identifier stays `id` even if the
    /// record carries a different one. Never creates.
    ///
    /// # Errors
    /// * `NotFound` - no document with `id`
    /// * `Backend` - any other failure
    async fn update_document(&self, ctx: &OperationContext, id: &str, record: &T)
        -> StoreResult<()>;

    /// Remove the document keyed by `id`
    ///
    /// # Errors
    /// * `NotFound` - no document with `id`
    /// * `Backend` - any other failure
    async fn delete_document(&self, ctx: &OperationContext, id: &str) -> StoreResult<()>;

    /// Every document in the collection, in backend-native order
    ///
    /// The order is unstable across calls and the result is not isolated from
    /// concurrent writes. An empty collection yields an empty vector.
    async fn list_documents(&self, ctx: &OperationContext) -> StoreResult<Vec<T>>;

    /// Release the backend connection
    ///
    /// Meant to be called once during shutdown. Later calls are no-ops and any
    /// operation issued afterwards fails with `Backend`.
    async fn disconnect(&self) -> StoreResult<()>;

    /// Name of the backing collection, for logging
    fn collection_name(&self) -> &str;
}
