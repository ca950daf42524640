//! Request and response types for the fetch interceptor
//!
//! These mirror the subset of the host's fetch model the agent needs:
//! enough request identity to key the cache, the declared destination to
//! pick the document fallback, and a cloneable response snapshot.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP methods the agent issues or intercepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Options,
    Patch,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
        };
        write!(f, "{}", s)
    }
}

/// Declared destination of an intercepted request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    /// Full-document navigation; eligible for the app-shell fallback
    Document,
    Script,
    Style,
    Image,
    Font,
    /// Anything else (XHR, fetch(), media, ...)
    Other,
}

impl Destination {
    /// Whether a cache miss for this destination falls back to the shell
    pub fn is_document(&self) -> bool {
        matches!(self, Destination::Document)
    }
}

/// Cache directive forwarded to the network capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CacheDirective {
    /// Platform default
    #[default]
    Default,
    /// Bypass intermediary caches (used by the keep-alive probe)
    NoCache,
}

/// An intercepted or agent-issued request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub destination: Destination,
    pub cache_directive: CacheDirective,
}

impl Request {
    /// A plain GET for a sub-resource
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            destination: Destination::Other,
            cache_directive: CacheDirective::Default,
        }
    }

    /// A full-document navigation request
    pub fn navigate(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            destination: Destination::Document,
            cache_directive: CacheDirective::Default,
        }
    }

    /// The lightweight keep-alive probe: HEAD, no body wanted, bypassing
    /// intermediary caches
    pub fn probe(url: impl Into<String>) -> Self {
        Self {
            method: Method::Head,
            url: url.into(),
            destination: Destination::Other,
            cache_directive: CacheDirective::NoCache,
        }
    }

    /// Request identity used as the cache entry key.
    ///
    /// Method plus URL; header variance is left to the platform the agent
    /// is embedded in.
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

/// A stored or live response snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    /// Build a response with a status and body
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether this response may refresh a cache entry.
    ///
    /// Only a clean 200 is stored; redirects, partial content and error
    /// codes must never poison the cache.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200
    }

    /// Body as text, for payload-sized responses
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}
