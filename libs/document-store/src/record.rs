//! Record bound and the codec between records and stored documents

use heck::ToSnakeCase;
use mongodb::bson::{self, Document};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{StoreError, StoreResult};

/// Document field holding the document identifier
pub const ID_FIELD: &str = "id";

/// Backend-assigned primary key, never exposed to records
const OBJECT_ID_FIELD: &str = "_id";

/// Any type the store can persist
///
/// Blanket-implemented for every serde type that can cross task boundaries. The store
/// never looks at record fields other than [`ID_FIELD`], which it writes itself.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {}

impl<T> Record for T where T: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {}

/// Default collection name for `T`: the snake_case form of its type name
///
/// Generic parameters and module paths are dropped, so `models::VirtualPatient`
/// becomes `virtual_patient`.
pub fn default_collection_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let without_generics = full.split('<').next().unwrap_or(full);
    let short = without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics);
    short.to_snake_case()
}

/// Encode a record into the document stored under `id`
///
/// The identifier field is always overwritten with `id`, so the addressed id stays
/// canonical no matter what the record carries.
pub(crate) fn encode<T: Record>(id: &str, record: &T) -> StoreResult<Document> {
    let mut document = bson::to_document(record)
        .map_err(|e| StoreError::backend(format!("failed to encode document {id}"), e))?;
    document.insert(ID_FIELD, id);
    Ok(document)
}

/// Decode a stored document back into a record
pub(crate) fn decode<T: Record>(mut document: Document) -> StoreResult<T> {
    document.remove(OBJECT_ID_FIELD);
    let id = document.get_str(ID_FIELD).unwrap_or_default().to_string();
    bson::from_document(document)
        .map_err(|e| StoreError::backend(format!("failed to decode document {id}"), e))
}
