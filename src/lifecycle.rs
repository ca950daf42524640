//! Install/activate lifecycle
//!
//! Install pre-warms the versioned cache namespace with the static asset
//! list and starts the keep-alive pulse. Activate deletes every
//! namespace left behind by previous deployments. Both register their
//! asynchronous work on the event's scope so the host finalizes the
//! event only after cleanup is issued.

use crate::cache::CacheStorage;
use crate::config::CacheConfig;
use crate::event::EventScope;
use crate::keepalive::KeepAlive;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

/// Handles the install and activate events
pub struct Lifecycle {
    caches: Arc<dyn CacheStorage>,
    keep_alive: Arc<KeepAlive>,
    cache_name: String,
    precache: Vec<String>,
}

impl Lifecycle {
    /// Create a lifecycle manager for the current deployment
    pub fn new(
        config: &CacheConfig,
        caches: Arc<dyn CacheStorage>,
        keep_alive: Arc<KeepAlive>,
    ) -> Self {
        Self {
            caches,
            keep_alive,
            cache_name: config.version.clone(),
            precache: config.precache.clone(),
        }
    }

    /// Install: pre-cache the static asset list and start the pulse.
    ///
    /// Pre-caching is best-effort: a failed group is logged and
    /// swallowed, and install still completes. The pulse is started
    /// regardless of the pre-cache outcome.
    pub fn install(&self, scope: &EventScope) {
        let caches = Arc::clone(&self.caches);
        let cache_name = self.cache_name.clone();
        let precache = self.precache.clone();

        scope.wait_until(async move {
            info!(cache = %cache_name, assets = precache.len(), "caching static assets");
            let result = async {
                let cache = caches.open(&cache_name).await?;
                cache.add_all(&precache).await
            }
            .await;

            if let Err(e) = result {
                warn!(error = %e, "cache installation failed");
            }
        });

        self.keep_alive.start();
    }

    /// The pulse owned by this lifecycle
    pub fn keep_alive(&self) -> &KeepAlive {
        &self.keep_alive
    }

    /// Activate: delete every cache namespace whose name differs from
    /// the current version tag. The current namespace is never touched.
    ///
    /// Deletion failures are logged and do not fail activation; a stale
    /// namespace left behind is retried at the next activation.
    pub fn activate(&self, scope: &EventScope) {
        let caches = Arc::clone(&self.caches);
        let cache_name = self.cache_name.clone();

        scope.wait_until(async move {
            let names = match caches.keys().await {
                Ok(names) => names,
                Err(e) => {
                    warn!(error = %e, "could not enumerate cache namespaces");
                    return;
                }
            };

            let deletions = names
                .into_iter()
                .filter(|name| *name != cache_name)
                .map(|name| {
                    let caches = Arc::clone(&caches);
                    async move {
                        info!(cache = %name, "deleting old cache");
                        if let Err(e) = caches.delete(&name).await {
                            warn!(cache = %name, error = %e, "failed to delete old cache");
                        }
                    }
                });

            join_all(deletions).await;
        });
    }
}
