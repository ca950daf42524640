//! Network capability for the agent
//!
//! The core never talks to a transport directly; it issues requests
//! through the `Network` trait and treats "no response obtainable"
//! (offline, DNS failure, timeout) as the error case the fallback chain
//! recovers from.

use crate::error::{AppshellError, AppshellResult};
use crate::fetch::types::{CacheDirective, Method, Request, Response};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::trace;

/// Abstract network interface
///
/// issue-request(method, url, cache-directive) -> response-or-failure.
/// An `Err` means no response was obtainable; responses with error status
/// codes are `Ok` and carry the status.
#[async_trait]
pub trait Network: Send + Sync {
    /// Issue the request to the live network
    async fn fetch(&self, request: &Request) -> AppshellResult<Response>;
}

/// HTTP-backed network capability
///
/// Resolves path-only URLs against the configured origin and runs the
/// blocking HTTP client on the runtime's blocking pool. Error status
/// codes are returned as responses, not errors, so the interceptor can
/// apply its own policy to them.
pub struct HttpNetwork {
    origin: String,
    agent: ureq::Agent,
}

impl HttpNetwork {
    /// Create a network capability rooted at the given origin,
    /// e.g. `https://app.example.com`
    pub fn new(origin: impl Into<String>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            origin: origin.into(),
            agent,
        }
    }

    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}{}", self.origin.trim_end_matches('/'), url)
        }
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &Request) -> AppshellResult<Response> {
        let agent = self.agent.clone();
        let method = request.method;
        let url = self.resolve(&request.url);
        let directive = request.cache_directive;

        trace!(%method, %url, "issuing live request");

        tokio::task::spawn_blocking(move || issue_blocking(&agent, method, &url, directive))
            .await
            .map_err(|e| AppshellError::Internal(format!("network task failed: {}", e)))?
    }
}

fn issue_blocking(
    agent: &ureq::Agent,
    method: Method,
    url: &str,
    directive: CacheDirective,
) -> AppshellResult<Response> {
    let map_err = |e: ureq::Error| AppshellError::network(method.to_string(), url, e.to_string());

    let mut response = match method {
        Method::Get => {
            let mut req = agent.get(url);
            if directive == CacheDirective::NoCache {
                req = req.header("Cache-Control", "no-cache");
            }
            req.call().map_err(map_err)?
        }
        Method::Head => {
            let mut req = agent.head(url);
            if directive == CacheDirective::NoCache {
                req = req.header("Cache-Control", "no-cache");
            }
            req.call().map_err(map_err)?
        }
        Method::Post => agent.post(url).send_empty().map_err(map_err)?,
        Method::Put => agent.put(url).send_empty().map_err(map_err)?,
        Method::Delete => agent.delete(url).call().map_err(map_err)?,
        Method::Options | Method::Patch => {
            return Err(AppshellError::network(
                method.to_string(),
                url,
                "method not supported by this network capability",
            ));
        }
    };

    let status = response.status().as_u16();

    let mut headers = HashMap::new();
    for (name, value) in response.headers() {
        if let Ok(v) = value.to_str() {
            headers.insert(name.as_str().to_string(), v.to_string());
        }
    }

    let body = response.body_mut().read_to_vec().map_err(map_err)?;

    Ok(Response {
        status,
        headers,
        body,
    })
}
