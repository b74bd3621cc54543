//! Store configuration and defaults

use std::time::Duration;

use crate::record::default_collection_name;

pub const DEFAULT_CONNECTION_STRING: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "virtual-patients";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 3;
pub const DEFAULT_CONNECT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Store configuration as supplied by the caller; every field falls back to a default
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub connection_string: Option<String>,
    pub database: Option<String>,
    /// Target collection; derived from the record type name when unset
    pub collection: Option<String>,
    /// Upper bound for every single backend call
    pub timeout: Option<Duration>,
    /// Attempts at establishing the connection during construction
    pub connect_attempts: Option<u32>,
}

/// Store configuration with every default applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStoreConfig {
    pub connection_string: String,
    pub database: String,
    pub collection: String,
    pub timeout: Duration,
    pub connect_attempts: u32,
}

impl StoreConfig {
    /// Apply defaults for record type `T`
    ///
    /// Empty strings count as unset, so blank environment variables fall back too.
    pub fn resolve<T: ?Sized>(&self) -> ResolvedStoreConfig {
        fn non_empty(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }

        ResolvedStoreConfig {
            connection_string: non_empty(&self.connection_string)
                .unwrap_or_else(|| DEFAULT_CONNECTION_STRING.to_string()),
            database: non_empty(&self.database).unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            collection: non_empty(&self.collection).unwrap_or_else(default_collection_name::<T>),
            timeout: self
                .timeout
                .filter(|t| !t.is_zero())
                .unwrap_or(DEFAULT_TIMEOUT),
            connect_attempts: self
                .connect_attempts
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_CONNECT_ATTEMPTS),
        }
    }
}
