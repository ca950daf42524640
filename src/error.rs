//! Error types for appshell
//!
//! All modules use `AppshellResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for appshell operations
pub type AppshellResult<T> = Result<T, AppshellError>;

/// All errors that can occur in appshell
#[derive(Error, Debug)]
pub enum AppshellError {
    // Cache capability errors
    #[error("Failed to open cache namespace {name}: {reason}")]
    CacheOpen { name: String, reason: String },

    #[error("Failed to store cache entry {key}: {reason}")]
    CacheWrite { key: String, reason: String },

    #[error("Failed to delete cache namespace {name}: {reason}")]
    CacheDelete { name: String, reason: String },

    #[error("Pre-cache group failed for {}: {reason}", .paths.join(", "))]
    Precache { paths: Vec<String>, reason: String },

    // Network capability errors
    #[error("Network request failed: {method} {url}: {reason}")]
    Network {
        method: String,
        url: String,
        reason: String,
    },

    // Notification capability errors
    #[error("Failed to display notification {tag}: {reason}")]
    NotificationDisplay { tag: String, reason: String },

    #[error("Failed to open client window at {url}: {reason}")]
    ClientWindow { url: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppshellError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a network error for a failed request
    pub fn network(
        method: impl Into<String>,
        url: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Network {
            method: method.into(),
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a cache write error
    pub fn cache_write(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CacheWrite {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error is absorbed by the agent rather than surfaced
    /// to the host. Pre-cache, probe and background cache-write failures
    /// are logged and swallowed.
    pub fn is_advisory(&self) -> bool {
        matches!(
            self,
            Self::Precache { .. } | Self::Network { .. } | Self::CacheWrite { .. }
        )
    }
}
