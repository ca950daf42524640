//! Cache capability for the agent
//!
//! The core depends on exactly six storage operations: open-by-name,
//! add-many, put, match, list-names and delete-by-name. Everything else
//! (eviction, expiry, size bounds) is deliberately absent; entries live
//! until the namespace containing them is deleted at a future activation.

pub mod memory;

pub use memory::{MemoryCache, MemoryCacheStorage};

use crate::error::AppshellResult;
use crate::fetch::types::Response;
use async_trait::async_trait;
use std::sync::Arc;

/// A named partition of stored request/response pairs
#[async_trait]
pub trait Cache: Send + Sync {
    /// Fetch and store every listed path as a single atomic group.
    ///
    /// If any path fails to fetch with a success status, nothing is
    /// stored and the whole group fails.
    async fn add_all(&self, paths: &[String]) -> AppshellResult<()>;

    /// Store a response snapshot, overwriting any prior entry with the
    /// same key
    async fn put(&self, key: &str, response: Response) -> AppshellResult<()>;

    /// Look up a stored entry by request identity
    async fn lookup(&self, key: &str) -> AppshellResult<Option<Response>>;
}

/// The host's cache storage: named caches owned by this origin
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open a cache namespace, creating it if absent
    async fn open(&self, name: &str) -> AppshellResult<Arc<dyn Cache>>;

    /// List all namespace names owned by this origin
    async fn keys(&self) -> AppshellResult<Vec<String>>;

    /// Delete a namespace by name.
    ///
    /// Returns whether a namespace was actually removed; deleting an
    /// absent namespace is a no-op, not an error.
    async fn delete(&self, name: &str) -> AppshellResult<bool>;
}
