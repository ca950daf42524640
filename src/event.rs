//! Event task scopes
//!
//! The hosting runtime delivers one event at a time, and each lifecycle
//! event must extend its own validity until the asynchronous sub-work it
//! triggered finishes. `EventScope` is that contract made explicit: the
//! handler registers pending operations with `wait_until`, and the host
//! awaits `settle` before considering the event fully handled.
//!
//! Cache writes racing the response path are not scoped; they go through
//! `detach`, which never blocks or fails the caller.

use crate::error::AppshellResult;
use std::future::Future;
use std::sync::Mutex;
use tokio::task::JoinSet;
use tracing::warn;

/// Per-event task group the host awaits before finalizing the event
#[derive(Default)]
pub struct EventScope {
    tasks: Mutex<JoinSet<()>>,
}

impl EventScope {
    /// Create an empty scope for a single event
    pub fn new() -> Self {
        Self::default()
    }

    /// Register asynchronous sub-work the host must await
    pub fn wait_until<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.lock().unwrap().spawn(future);
    }

    /// Number of registered operations still owned by this scope
    pub fn pending(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Await every registered operation. Panics in sub-tasks are logged,
    /// never propagated to the host.
    pub async fn settle(self) {
        let mut tasks = self.tasks.into_inner().unwrap();
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                if e.is_panic() {
                    warn!(error = %e, "event sub-task panicked");
                }
            }
        }
    }
}

/// Run a fallible future as a detached background task.
///
/// The task is never joined by the caller; an `Err` outcome is captured
/// by the logging sink and otherwise dropped.
pub fn detach<F>(context: &'static str, future: F)
where
    F: Future<Output = AppshellResult<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = future.await {
            warn!(error = %e, "{} failed", context);
        }
    });
}
