//! The offline agent: shared context for all host-delivered events
//!
//! The hosting runtime delivers lifecycle, fetch, push and sync events
//! one at a time; `OfflineAgent` is the single object they all land on.
//! It owns the configuration and the capability handles and wires the
//! lifecycle manager, fetch interceptor, keep-alive pulse and
//! notification relay together.

use crate::cache::CacheStorage;
use crate::config::Config;
use crate::event::EventScope;
use crate::fetch::types::{Request, Response};
use crate::fetch::FetchInterceptor;
use crate::keepalive::KeepAlive;
use crate::lifecycle::Lifecycle;
use crate::net::Network;
use crate::notify::{Clients, NotificationRelay, Notifier};
use std::sync::Arc;

/// The browser-resident offline-support agent
pub struct OfflineAgent {
    config: Config,
    lifecycle: Lifecycle,
    interceptor: FetchInterceptor,
    relay: NotificationRelay,
}

impl OfflineAgent {
    /// Wire an agent from its configuration and the host capabilities
    pub fn new(
        config: Config,
        caches: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
        notifier: Arc<dyn Notifier>,
        clients: Arc<dyn Clients>,
    ) -> Self {
        let keep_alive = Arc::new(KeepAlive::new(&config.keep_alive, Arc::clone(&network)));
        let lifecycle = Lifecycle::new(&config.cache, Arc::clone(&caches), keep_alive);
        let interceptor = FetchInterceptor::new(
            Arc::clone(&caches),
            Arc::clone(&network),
            config.cache.version.clone(),
            &config.cache.shell_path,
        );
        let relay = NotificationRelay::new(&config.notification, notifier, clients);

        Self {
            config,
            lifecycle,
            interceptor,
            relay,
        }
    }

    /// The agent's configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The keep-alive pulse, for inspection or explicit shutdown
    pub fn keep_alive(&self) -> &KeepAlive {
        self.lifecycle.keep_alive()
    }

    /// Install event: pre-warm the cache and start the pulse
    pub fn install(&self, scope: &EventScope) {
        self.lifecycle.install(scope);
    }

    /// Activate event: delete superseded cache namespaces
    pub fn activate(&self, scope: &EventScope) {
        self.lifecycle.activate(scope);
    }

    /// Fetch event: network-first with cache fallback.
    ///
    /// `None` means neither network nor cache produced a usable
    /// response; the host surfaces that as a network error.
    pub async fn handle_fetch(&self, request: &Request) -> Option<Response> {
        self.interceptor.handle(request).await
    }

    /// Push event: relay the payload as a system notification
    pub fn handle_push(&self, payload: Option<Vec<u8>>, scope: &EventScope) {
        self.relay.handle_push(payload, scope);
    }

    /// Notification click event
    pub fn handle_notification_click(&self, action: Option<&str>, scope: &EventScope) {
        self.relay.handle_click(action, scope);
    }

    /// Background-sync event: accepted, no work performed yet
    pub fn handle_sync(&self, tag: &str) {
        self.relay.handle_sync(tag);
    }
}
