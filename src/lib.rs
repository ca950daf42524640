//! appshell - Offline-support agent for web applications
//!
//! Intercepts network requests with a network-first/cache-fallback
//! policy, pre-warms a versioned cache namespace at install, keeps an
//! idle backend warm with a recurring probe, and relays push payloads as
//! system notifications. The hosting runtime provides the cache,
//! network, notification and client-window capabilities; the agent
//! provides the policy.

pub mod agent;
pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod fetch;
pub mod keepalive;
pub mod lifecycle;
pub mod net;
pub mod notify;

#[cfg(test)]
pub(crate) mod test_util;

pub use agent::OfflineAgent;
pub use error::{AppshellError, AppshellResult};
