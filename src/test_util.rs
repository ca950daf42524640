//! Shared test doubles for unit tests

use crate::error::{AppshellError, AppshellResult};
use crate::fetch::types::{Request, Response};
use crate::net::Network;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Network double serving scripted responses per path.
///
/// `serve` installs a persistent response; `serve_once` queues a one-shot
/// response that takes precedence over the persistent one. Flipping
/// `set_offline(true)` makes every fetch fail, as if connectivity was
/// lost. All issued requests are recorded for assertions.
pub(crate) struct ScriptedNetwork {
    persistent: Mutex<HashMap<String, Response>>,
    queued: Mutex<HashMap<String, VecDeque<Response>>>,
    offline: AtomicBool,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedNetwork {
    pub(crate) fn new() -> Self {
        Self {
            persistent: Mutex::new(HashMap::new()),
            queued: Mutex::new(HashMap::new()),
            offline: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn serve(&self, path: &str, response: Response) {
        self.persistent
            .lock()
            .unwrap()
            .insert(path.to_string(), response);
    }

    pub(crate) fn serve_once(&self, path: &str, response: Response) {
        self.queued
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    pub(crate) fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Network for ScriptedNetwork {
    async fn fetch(&self, request: &Request) -> AppshellResult<Response> {
        self.requests.lock().unwrap().push(request.clone());

        if self.offline.load(Ordering::SeqCst) {
            return Err(AppshellError::network(
                request.method.to_string(),
                &request.url,
                "offline",
            ));
        }

        if let Some(queue) = self.queued.lock().unwrap().get_mut(&request.url) {
            if let Some(response) = queue.pop_front() {
                return Ok(response);
            }
        }

        self.persistent
            .lock()
            .unwrap()
            .get(&request.url)
            .cloned()
            .ok_or_else(|| {
                AppshellError::network(request.method.to_string(), &request.url, "unresolvable")
            })
    }
}
