//! In-memory cache storage
//!
//! The reference `CacheStorage` implementation: named caches holding
//! request-key -> response snapshots in maps. Suitable for embedding the
//! agent in hosts without their own storage engine, and for tests.

use crate::cache::{Cache, CacheStorage};
use crate::error::{AppshellError, AppshellResult};
use crate::fetch::types::{Request, Response};
use crate::net::Network;
use async_trait::async_trait;
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// A single in-memory cache namespace
pub struct MemoryCache {
    name: String,
    network: Arc<dyn Network>,
    entries: RwLock<HashMap<String, Response>>,
}

impl MemoryCache {
    fn new(name: String, network: Arc<dyn Network>) -> Self {
        Self {
            name,
            network,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The namespace name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Whether the namespace holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn add_all(&self, paths: &[String]) -> AppshellResult<()> {
        // Fetch the whole group before committing anything, so a partial
        // failure leaves the namespace unchanged.
        let fetches = paths.iter().map(|path| {
            let request = Request::get(path.clone());
            let network = Arc::clone(&self.network);
            async move { (path.clone(), network.fetch(&request).await) }
        });

        let mut fetched = Vec::with_capacity(paths.len());
        let mut failed = Vec::new();

        for (path, result) in join_all(fetches).await {
            match result {
                Ok(response) if response.ok() => {
                    fetched.push((Request::get(&path).cache_key(), response));
                }
                Ok(response) => {
                    failed.push(format!("{} (status {})", path, response.status));
                }
                Err(e) => failed.push(format!("{} ({})", path, e)),
            }
        }

        if !failed.is_empty() {
            return Err(AppshellError::Precache {
                paths: failed,
                reason: "one or more assets unfetchable".to_string(),
            });
        }

        let mut entries = self.entries.write().unwrap();
        for (key, response) in fetched {
            entries.insert(key, response);
        }
        debug!(cache = %self.name, count = paths.len(), "pre-cached asset group");
        Ok(())
    }

    async fn put(&self, key: &str, response: Response) -> AppshellResult<()> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), response);
        Ok(())
    }

    async fn lookup(&self, key: &str) -> AppshellResult<Option<Response>> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }
}

/// In-memory cache storage holding all namespaces for the origin
pub struct MemoryCacheStorage {
    network: Arc<dyn Network>,
    caches: RwLock<HashMap<String, Arc<MemoryCache>>>,
}

impl MemoryCacheStorage {
    /// Create a storage whose `add_all` fetches through the given network
    pub fn new(network: Arc<dyn Network>) -> Self {
        Self {
            network,
            caches: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> AppshellResult<Arc<dyn Cache>> {
        let mut caches = self.caches.write().unwrap();
        let cache = caches.entry(name.to_string()).or_insert_with(|| {
            debug!(cache = %name, "created cache namespace");
            Arc::new(MemoryCache::new(
                name.to_string(),
                Arc::clone(&self.network),
            ))
        });
        Ok(Arc::clone(cache) as Arc<dyn Cache>)
    }

    async fn keys(&self) -> AppshellResult<Vec<String>> {
        let mut names: Vec<String> = self.caches.read().unwrap().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn delete(&self, name: &str) -> AppshellResult<bool> {
        Ok(self.caches.write().unwrap().remove(name).is_some())
    }
}
