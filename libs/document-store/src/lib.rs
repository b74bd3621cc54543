//! Generic document store
//!
//! Type-safe CRUD and listing over one backend collection per record type, with every
//! backend failure normalized into the three-way [`StoreError`] taxonomy.
//!
//! # Backends
//!
//! - [`MongoDocumentStore`] - MongoDB, one client per process
//! - [`MemoryDocumentStore`] - in-process map, for tests and local development
//!
//! Both implement [`DocumentStore`], which is what request handlers depend on.
//!
//! # Example
//!
//! ```rust,no_run
//! use serde::{Deserialize, Serialize};
//! use vpatient_store::{DocumentStore, MongoDocumentStore, OperationContext, StoreConfig};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Patient {
//!     id: String,
//!     name: String,
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MongoDocumentStore::<Patient>::connect(StoreConfig::default()).await?;
//! let ctx = OperationContext::new();
//!
//! let patient = Patient { id: "p1".into(), name: "Anna".into() };
//! store.create_document(&ctx, "p1", &patient).await?;
//! let found = store.find_document(&ctx, "p1").await?;
//! assert_eq!(found.name, "Anna");
//!
//! store.disconnect().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod memory;
pub mod mongo;
pub mod record;
pub mod store;

pub use config::{ResolvedStoreConfig, StoreConfig};
pub use context::OperationContext;
pub use error::{ErrorKind, StoreError, StoreResult};
pub use memory::MemoryDocumentStore;
pub use mongo::MongoDocumentStore;
pub use record::{Record, ID_FIELD};
pub use store::DocumentStore;
