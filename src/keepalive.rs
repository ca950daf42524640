//! Keep-alive pulse
//!
//! A recurring probe to the origin root that keeps an idle backend from
//! suspending. The pulse is a supervised task owned by the agent: start
//! and stop are controlled transitions, and the handle is replaced under
//! a lock so at most one timer is ever live, even if install runs twice.
//!
//! Probe outcomes are advisory. Success and failure are both logged and
//! neither affects any other component's state.

use crate::config::KeepAliveConfig;
use crate::fetch::types::Request;
use crate::net::Network;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Outcome of the most recent probe, for diagnostics
#[derive(Debug, Clone)]
pub struct ProbeRecord {
    pub at: DateTime<Utc>,
    pub success: bool,
}

/// Supervised recurring network probe
pub struct KeepAlive {
    network: Arc<dyn Network>,
    enabled: bool,
    interval: Duration,
    probe_path: String,
    handle: Mutex<Option<JoinHandle<()>>>,
    last_probe: Arc<Mutex<Option<ProbeRecord>>>,
}

impl KeepAlive {
    /// Create a pulse from config; it does not run until `start`
    pub fn new(config: &KeepAliveConfig, network: Arc<dyn Network>) -> Self {
        Self {
            network,
            enabled: config.enabled,
            interval: Duration::from_secs(config.interval_secs),
            probe_path: config.probe_path.clone(),
            handle: Mutex::new(None),
            last_probe: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the recurring pulse, cancelling any previously running one
    /// first so at most one timer is active concurrently.
    pub fn start(&self) {
        if !self.enabled {
            debug!("keep-alive pulse disabled by config");
            return;
        }

        let mut handle = self.handle.lock().unwrap();
        if let Some(prev) = handle.take() {
            debug!("cancelling previous keep-alive timer");
            prev.abort();
        }

        let network = Arc::clone(&self.network);
        let probe_path = self.probe_path.clone();
        let interval = self.interval;
        let last_probe = Arc::clone(&self.last_probe);

        // Anchor the first firing one full interval from now, before the
        // task is ever polled, so the schedule is fixed at start time.
        let first_tick = tokio::time::Instant::now() + interval;

        *handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(first_tick, interval);
            loop {
                ticker.tick().await;
                let success = probe(network.as_ref(), &probe_path).await;
                *last_probe.lock().unwrap() = Some(ProbeRecord {
                    at: Utc::now(),
                    success,
                });
            }
        }));

        info!(interval_secs = self.interval.as_secs(), "keep-alive pulse started");
    }

    /// Stop the pulse if it is running
    pub fn stop(&self) {
        if let Some(handle) = self.handle.lock().unwrap().take() {
            handle.abort();
            info!("keep-alive pulse stopped");
        }
    }

    /// Whether a timer is currently live
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Outcome of the most recent probe, if any has fired yet
    pub fn last_probe(&self) -> Option<ProbeRecord> {
        self.last_probe.lock().unwrap().clone()
    }
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.lock().unwrap().take() {
            handle.abort();
        }
    }
}

/// Issue one probe. The response body is discarded; failures are
/// logged, never raised.
async fn probe(network: &dyn Network, path: &str) -> bool {
    let request = Request::probe(path);
    match network.fetch(&request).await {
        Ok(_) => {
            debug!("keep-alive ping sent");
            true
        }
        Err(e) => {
            warn!(error = %e, "keep-alive ping failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::types::{Method, Response};
    use crate::test_util::ScriptedNetwork;

    fn config(interval_secs: u64) -> KeepAliveConfig {
        KeepAliveConfig {
            enabled: true,
            interval_secs,
            probe_path: "/".to_string(),
        }
    }

    async fn let_tasks_run() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn probe_fires_each_interval() {
        let network = Arc::new(ScriptedNetwork::new());
        network.serve("/", Response::new(200, ""));
        let pulse = KeepAlive::new(&config(60), Arc::clone(&network) as Arc<dyn Network>);

        pulse.start();
        assert!(pulse.is_running());
        assert_eq!(network.request_count(), 0);

        tokio::time::advance(Duration::from_secs(61)).await;
        let_tasks_run().await;
        assert_eq!(network.request_count(), 1);

        tokio::time::advance(Duration::from_secs(60)).await;
        let_tasks_run().await;
        assert_eq!(network.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn probe_is_head_no_cache() {
        let network = Arc::new(ScriptedNetwork::new());
        network.serve("/", Response::new(200, ""));
        let pulse = KeepAlive::new(&config(60), Arc::clone(&network) as Arc<dyn Network>);

        pulse.start();
        tokio::time::advance(Duration::from_secs(61)).await;
        let_tasks_run().await;

        let requests = network.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Head);
        assert_eq!(
            requests[0].cache_directive,
            crate::fetch::types::CacheDirective::NoCache
        );
    }

    #[tokio::test(start_paused = true)]
    async fn restart_cancels_previous_timer() {
        let network = Arc::new(ScriptedNetwork::new());
        network.serve("/", Response::new(200, ""));
        let pulse = KeepAlive::new(&config(60), Arc::clone(&network) as Arc<dyn Network>);

        pulse.start();
        pulse.start();
        let_tasks_run().await;

        // Were both timers alive, one interval would produce two probes.
        tokio::time::advance(Duration::from_secs(61)).await;
        let_tasks_run().await;
        assert_eq!(network.request_count(), 1);
        assert!(pulse.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn probe_failure_is_absorbed_and_recorded() {
        let network = Arc::new(ScriptedNetwork::new());
        network.set_offline(true);
        let pulse = KeepAlive::new(&config(60), Arc::clone(&network) as Arc<dyn Network>);

        pulse.start();
        tokio::time::advance(Duration::from_secs(61)).await;
        let_tasks_run().await;

        // Pulse keeps running after a failed probe.
        assert!(pulse.is_running());
        let record = pulse.last_probe().unwrap();
        assert!(!record.success);

        network.set_offline(false);
        network.serve("/", Response::new(200, ""));
        tokio::time::advance(Duration::from_secs(60)).await;
        let_tasks_run().await;
        assert!(pulse.last_probe().unwrap().success);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_pulse_never_starts() {
        let network = Arc::new(ScriptedNetwork::new());
        network.serve("/", Response::new(200, ""));
        let mut cfg = config(60);
        cfg.enabled = false;
        let pulse = KeepAlive::new(&cfg, Arc::clone(&network) as Arc<dyn Network>);

        pulse.start();
        assert!(!pulse.is_running());

        tokio::time::advance(Duration::from_secs(120)).await;
        let_tasks_run().await;
        assert_eq!(network.request_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_probing() {
        let network = Arc::new(ScriptedNetwork::new());
        network.serve("/", Response::new(200, ""));
        let pulse = KeepAlive::new(&config(60), Arc::clone(&network) as Arc<dyn Network>);

        pulse.start();
        pulse.stop();
        assert!(!pulse.is_running());

        tokio::time::advance(Duration::from_secs(180)).await;
        let_tasks_run().await;
        assert_eq!(network.request_count(), 0);
    }
}
