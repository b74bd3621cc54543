//! MongoDB document store

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    error::{Error as MongoError, ErrorKind as MongoErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions},
    Client, Collection, IndexModel,
};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::{
    config::{ResolvedStoreConfig, StoreConfig, DEFAULT_CONNECT_RETRY_DELAY},
    context::OperationContext,
    error::{StoreError, StoreResult},
    record::{decode, encode, Record, ID_FIELD},
    store::DocumentStore,
};

/// Server error code for unique index violations
const DUPLICATE_KEY: i32 = 11000;
/// Server error code returned when a collection is created concurrently
const NAMESPACE_EXISTS: i32 = 48;

const ID_INDEX_NAME: &str = "id_unique";

/// MongoDB-backed store for records of type `T`
///
/// Holds one pooled client for the process lifetime. The client is safe for concurrent
/// use, so the store needs no locking of its own.
pub struct MongoDocumentStore<T> {
    client: Client,
    collection: Collection<Document>,
    config: ResolvedStoreConfig,
    created_collection: bool,
    disconnected: AtomicBool,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> MongoDocumentStore<T> {
    /// Connect, verify the server is reachable, and prepare the collection
    ///
    /// The connection is attempted `connect_attempts` times with a short fixed delay;
    /// the last failure is returned once the attempts are exhausted.
    pub async fn connect(config: StoreConfig) -> StoreResult<Self> {
        let config = config.resolve::<T>();
        let attempts = config.connect_attempts;

        let mut attempt = 1;
        let client = loop {
            match Self::open_client(&config).await {
                Ok(client) => break client,
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        attempt,
                        attempts,
                        error = %e.diagnostic(),
                        "MongoDB not reachable, retrying"
                    );
                    tokio::time::sleep(DEFAULT_CONNECT_RETRY_DELAY).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        let (collection, created_collection) =
            Self::prepare_collection(&client, &config).await?;

        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            timeout_ms = config.timeout.as_millis() as u64,
            "Document store connected"
        );

        Ok(Self {
            client,
            collection,
            config,
            created_collection,
            disconnected: AtomicBool::new(false),
            _record: PhantomData,
        })
    }

    /// Whether `connect` created the collection, i.e. it held no documents before
    pub fn created_collection(&self) -> bool {
        self.created_collection
    }

    async fn open_client(config: &ResolvedStoreConfig) -> StoreResult<Client> {
        let mut options = ClientOptions::parse(&config.connection_string)
            .await
            .map_err(|e| StoreError::backend("invalid MongoDB connection string", e))?;
        options.app_name.get_or_insert_with(|| env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout = Some(config.timeout);
        options.server_selection_timeout = Some(config.timeout);

        let client = Client::with_options(options)
            .map_err(|e| StoreError::backend("failed to create MongoDB client", e))?;

        // The driver connects lazily; ping so an unreachable server fails here.
        let database = client.database(&config.database);
        let ping = async { database.run_command(doc! { "ping": 1 }).await };
        match tokio::time::timeout(config.timeout + Duration::from_secs(1), ping).await {
            Ok(Ok(_)) => Ok(client),
            Ok(Err(e)) => Err(StoreError::backend("MongoDB ping failed", e)),
            Err(_) => Err(StoreError::backend_msg("MongoDB ping timed out")),
        }
    }

    /// Create the collection if missing and ensure `id` is a unique key
    ///
    /// Returns the collection and whether this call created it. An existing unique index
    /// on `{id: 1}` is accepted under any name; a non-unique one is an error.
    async fn prepare_collection(
        client: &Client,
        config: &ResolvedStoreConfig,
    ) -> StoreResult<(Collection<Document>, bool)> {
        let database = client.database(&config.database);

        let existing = database
            .list_collection_names()
            .await
            .map_err(|e| StoreError::backend("failed to list collections", e))?;

        let mut created = false;
        if !existing.iter().any(|name| name == &config.collection) {
            match database.create_collection(&config.collection).await {
                Ok(()) => {
                    tracing::info!(collection = %config.collection, "Created collection");
                    created = true;
                }
                Err(e) if command_code(&e) == Some(NAMESPACE_EXISTS) => {}
                Err(e) => {
                    return Err(StoreError::backend(
                        format!("failed to create collection {}", config.collection),
                        e,
                    ))
                }
            }
        }

        let collection = database.collection::<Document>(&config.collection);

        let indexes: Vec<IndexModel> = collection
            .list_indexes()
            .await
            .map_err(|e| StoreError::backend("failed to list indexes", e))?
            .try_collect::<Vec<IndexModel>>()
            .await
            .map_err(|e| StoreError::backend("failed to read index list", e))?;

        if let Some(index) = indexes.iter().find(|index| is_id_key(&index.keys)) {
            let options = index.options.as_ref();
            let name = options
                .and_then(|o| o.name.as_deref())
                .unwrap_or("<unnamed>");
            if options.and_then(|o| o.unique) != Some(true) {
                return Err(StoreError::backend_msg(format!(
                    "index {name} on {}.{ID_FIELD} exists but is not unique",
                    config.collection
                )));
            }
            tracing::debug!(
                collection = %config.collection,
                index = name,
                "Using existing unique index"
            );
            return Ok((collection, created));
        }

        let index = IndexModel::builder()
            .keys(doc! { ID_FIELD: 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(ID_INDEX_NAME.to_string())
                    .build(),
            )
            .build();
        collection.create_index(index).await.map_err(|e| {
            StoreError::backend(
                format!(
                    "failed to ensure unique index on {}.{ID_FIELD}",
                    config.collection
                ),
                e,
            )
        })?;

        Ok((collection, created))
    }

    fn ensure_connected(&self) -> StoreResult<()> {
        if self.disconnected.load(Ordering::Acquire) {
            return Err(StoreError::backend_msg(format!(
                "store for {} is disconnected",
                self.config.collection
            )));
        }
        Ok(())
    }

    fn by_id(id: &str) -> Document {
        doc! { ID_FIELD: id }
    }
}

/// Error code carried by a server write or command error, if any
fn server_code(error: &MongoError) -> Option<i32> {
    match error.kind.as_ref() {
        MongoErrorKind::Write(WriteFailure::WriteError(write_error)) => Some(write_error.code),
        MongoErrorKind::Command(command_error) => Some(command_error.code),
        _ => None,
    }
}

fn command_code(error: &MongoError) -> Option<i32> {
    match error.kind.as_ref() {
        MongoErrorKind::Command(command_error) => Some(command_error.code),
        _ => None,
    }
}

fn is_duplicate_key(error: &MongoError) -> bool {
    server_code(error) == Some(DUPLICATE_KEY)
}

/// True for an ascending single-field index on `id`, whatever numeric type the `1` has
fn is_id_key(keys: &Document) -> bool {
    if keys.len() != 1 {
        return false;
    }
    match keys.get(ID_FIELD) {
        Some(Bson::Int32(1)) | Some(Bson::Int64(1)) => true,
        Some(Bson::Double(value)) => *value == 1.0,
        _ => false,
    }
}

#[async_trait]
impl<T: Record> DocumentStore<T> for MongoDocumentStore<T> {
    async fn create_document(
        &self,
        ctx: &OperationContext,
        id: &str,
        record: &T,
    ) -> StoreResult<()> {
        self.ensure_connected()?;
        let document = encode(id, record)?;

        ctx.run("create_document", self.config.timeout, async {
            match self.collection.insert_one(document).await {
                Ok(_) => Ok(()),
                Err(e) if is_duplicate_key(&e) => {
                    Err(StoreError::conflict(&self.config.collection, id))
                }
                Err(e) => Err(StoreError::backend(
                    format!("failed to insert document {id}"),
                    e,
                )),
            }
        })
        .await?;

        tracing::debug!(collection = %self.config.collection, id, "Document created");
        Ok(())
    }

    async fn find_document(&self, ctx: &OperationContext, id: &str) -> StoreResult<T> {
        self.ensure_connected()?;

        let document = ctx
            .run("find_document", self.config.timeout, async {
                self.collection
                    .find_one(Self::by_id(id))
                    .await
                    .map_err(|e| StoreError::backend(format!("failed to find document {id}"), e))
            })
            .await?
            .ok_or_else(|| StoreError::not_found(&self.config.collection, id))?;

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

        let result = ctx
            .run("update_document", self.config.timeout, async {
                self.collection
                    .replace_one(Self::by_id(id), document)
                    .await
                    .map_err(|e| {
                        StoreError::backend(format!("failed to replace document {id}"), e)
                    })
            })
            .await?;

        if result.matched_count == 0 {
            return Err(StoreError::not_found(&self.config.collection, id));
        }

        tracing::debug!(collection = %self.config.collection, id, "Document replaced");
        Ok(())
    }

    async fn delete_document(&self, ctx: &OperationContext, id: &str) -> StoreResult<()> {
        self.ensure_connected()?;

        let result = ctx
            .run("delete_document", self.config.timeout, async {
                self.collection
                    .delete_one(Self::by_id(id))
                    .await
                    .map_err(|e| {
                        StoreError::backend(format!("failed to delete document {id}"), e)
                    })
            })
            .await?;

        if result.deleted_count == 0 {
            return Err(StoreError::not_found(&self.config.collection, id));
        }

        tracing::debug!(collection = %self.config.collection, id, "Document deleted");
        Ok(())
    }

    async fn list_documents(&self, ctx: &OperationContext) -> StoreResult<Vec<T>> {
        self.ensure_connected()?;

        let documents: Vec<Document> = ctx
            .run("list_documents", self.config.timeout, async {
                match self.collection.find(doc! {}).await {
                    Ok(cursor) => cursor
                        .try_collect::<Vec<Document>>()
                        .await
                        .map_err(|e| StoreError::backend("failed to read cursor", e)),
                    Err(e) => Err(StoreError::backend("failed to open cursor", e)),
                }
            })
            .await?;

        tracing::debug!(
            collection = %self.config.collection,
            count = documents.len(),
            "Documents listed"
        );

        documents.into_iter().map(decode).collect()
    }

    async fn disconnect(&self) -> StoreResult<()> {
        if self.disconnected.swap(true, Ordering::AcqRel) {
            tracing::debug!(collection = %self.config.collection, "Store already disconnected");
            return Ok(());
        }

        self.client.clone().shutdown().await;
        tracing::info!(collection = %self.config.collection, "Document store disconnected");
        Ok(())
    }

    fn collection_name(&self) -> &str {
        &self.config.collection
    }
}
