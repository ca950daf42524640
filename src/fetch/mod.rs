//! Fetch interception policy: network-first with cache fallback
//!
//! Every intercepted request goes to the live network first. A clean 200
//! refreshes the cache in the background; anything else passes through
//! untouched. Only when the network yields no response at all does the
//! cache chain kick in: exact entry, then the app shell for document
//! navigations, then nothing.

pub mod types;

pub use types::{CacheDirective, Destination, Method, Request, Response};

use crate::cache::CacheStorage;
use crate::error::AppshellResult;
use crate::event;
use crate::net::Network;
use std::sync::Arc;
use tracing::{debug, trace};

/// Request-routing policy applied to every intercepted request
pub struct FetchInterceptor {
    caches: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
    cache_name: String,
    shell_key: String,
}

impl FetchInterceptor {
    /// Create the interceptor for the current cache namespace
    pub fn new(
        caches: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
        cache_name: impl Into<String>,
        shell_path: &str,
    ) -> Self {
        Self {
            caches,
            network,
            cache_name: cache_name.into(),
            shell_key: Request::navigate(shell_path).cache_key(),
        }
    }

    /// Route one intercepted request.
    ///
    /// Returns the response to deliver, or `None` when neither network
    /// nor cache can produce one (the host surfaces that as a network
    /// error to the page).
    pub async fn handle(&self, request: &Request) -> Option<Response> {
        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_cacheable() {
                    // Duplicate the response and refresh the cache in the
                    // background; delivery never waits on the store.
                    self.store_detached(request.cache_key(), response.clone());
                } else {
                    trace!(
                        status = response.status,
                        url = %request.url,
                        "non-200 response passed through uncached"
                    );
                }
                Some(response)
            }
            Err(e) => {
                debug!(error = %e, url = %request.url, "network failed, trying cache");
                self.fallback(request).await
            }
        }
    }

    /// Cache-fallback chain for a request the network could not serve
    async fn fallback(&self, request: &Request) -> Option<Response> {
        let cache = match self.caches.open(&self.cache_name).await {
            Ok(cache) => cache,
            Err(e) => {
                debug!(error = %e, "cache unavailable during fallback");
                return None;
            }
        };

        match cache.lookup(&request.cache_key()).await {
            Ok(Some(hit)) => {
                debug!(url = %request.url, "served from cache");
                return Some(hit);
            }
            Ok(None) => {}
            Err(e) => {
                debug!(error = %e, "cache lookup failed");
                return None;
            }
        }

        // No entry for the request itself. Document navigations fall
        // back to the cached app shell; sub-resources get nothing.
        if request.destination.is_document() {
            match cache.lookup(&self.shell_key).await {
                Ok(Some(shell)) => {
                    debug!(url = %request.url, "served app shell as offline page");
                    return Some(shell);
                }
                Ok(None) => {}
                Err(e) => debug!(error = %e, "shell lookup failed"),
            }
        }

        None
    }

    fn store_detached(&self, key: String, response: Response) {
        let caches = Arc::clone(&self.caches);
        let cache_name = self.cache_name.clone();
        event::detach("background cache write", async move {
            store(caches, &cache_name, &key, response).await
        });
    }
}

async fn store(
    caches: Arc<dyn CacheStorage>,
    cache_name: &str,
    key: &str,
    response: Response,
) -> AppshellResult<()> {
    let cache = caches.open(cache_name).await?;
    cache.put(key, response).await?;
    trace!(%key, cache = %cache_name, "cache entry refreshed");
    Ok(())
}
