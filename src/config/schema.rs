//! Configuration schema for appshell
//!
//! Carries the deploy-time constants of the agent: the versioned cache
//! namespace, the static asset list, the keep-alive cadence and the
//! notification shape. All sections have sensible defaults so an empty
//! (or absent) config file yields a working agent.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cache namespace and pre-cache settings
    pub cache: CacheConfig,

    /// Keep-alive pulse settings
    pub keep_alive: KeepAliveConfig,

    /// Push notification shape
    pub notification: NotificationConfig,
}

/// Cache namespace and static asset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Versioned cache namespace. Bump per deployment; activation deletes
    /// every namespace whose name differs from this one.
    pub version: String,

    /// Ordered static asset list pre-populated at install time
    pub precache: Vec<String>,

    /// Document served as the offline substitute (the app shell)
    pub shell_path: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            version: "appshell-v1".to_string(),
            precache: vec![
                "/".to_string(),
                "/static/manifest.json".to_string(),
                "/static/icon-192.png".to_string(),
                "/static/icon-512.png".to_string(),
                "/static/pwa-guide/android-guide.html".to_string(),
                "/static/pwa-guide/ios-guide.html".to_string(),
                "/static/pwa-guide/desktop-guide.html".to_string(),
            ],
            shell_path: "/".to_string(),
        }
    }
}

/// Keep-alive pulse settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeepAliveConfig {
    /// Whether the pulse is started at install
    pub enabled: bool,

    /// Seconds between probes (default: 20 minutes)
    pub interval_secs: u64,

    /// Path probed on each firing
    pub probe_path: String,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 20 * 60,
            probe_path: "/".to_string(),
        }
    }
}

/// Push notification shape
///
/// Fields map to the host's notification display contract: body text,
/// icon, badge, vibration pattern, dedup tag and a single "open" action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Notification title
    pub title: String,

    /// Body used when a push arrives with no payload
    pub default_body: String,

    /// Icon path
    pub icon: String,

    /// Badge path
    pub badge: String,

    /// Vibration pattern in milliseconds
    pub vibration: Vec<u64>,

    /// Tag used for notification deduplication/grouping
    pub tag: String,

    /// Identifier of the single actionable button
    pub open_action: String,

    /// Label of the actionable button
    pub open_label: String,

    /// Client window opened when the action is clicked
    pub open_url: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            title: "appshell".to_string(),
            default_body: "New update available".to_string(),
            icon: "/static/icon-192.png".to_string(),
            badge: "/static/icon-192.png".to_string(),
            vibration: vec![200, 100, 200],
            tag: "appshell-notification".to_string(),
            open_action: "open".to_string(),
            open_label: "Open".to_string(),
            open_url: "/".to_string(),
        }
    }
}
