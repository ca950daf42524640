//! Push notification relay
//!
//! Receives push payloads, surfaces them as system notifications and
//! handles the resulting click. The notification shape is fixed by
//! config; only the body varies with the payload. Background-sync events
//! are accepted and acknowledged but perform no work yet.

use crate::config::NotificationConfig;
use crate::error::AppshellResult;
use crate::event::EventScope;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// The single actionable button on a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    pub icon: String,
}

/// A notification handed to the host's display capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibration: Vec<u64>,
    pub tag: String,
    pub actions: Vec<NotificationAction>,
}

/// Host capability that displays and dismisses notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Display a notification; replaces any prior one with the same tag
    async fn show(&self, notification: Notification) -> AppshellResult<()>;

    /// Close the displayed notification with the given tag
    async fn close(&self, tag: &str) -> AppshellResult<()>;
}

/// Host capability that opens or focuses client windows
#[async_trait]
pub trait Clients: Send + Sync {
    /// Open (or focus) a client window at the given URL
    async fn open_window(&self, url: &str) -> AppshellResult<()>;
}

/// Push payloads are opaque blobs; producers commonly send JSON with a
/// title and body, so that shape is decoded when present.
#[derive(Debug, Default, Deserialize)]
struct PushMessage {
    title: Option<String>,
    body: Option<String>,
}

/// Relays push events to the host's notification capability
pub struct NotificationRelay {
    config: NotificationConfig,
    notifier: Arc<dyn Notifier>,
    clients: Arc<dyn Clients>,
}

impl NotificationRelay {
    /// Create a relay with the configured notification shape
    pub fn new(
        config: &NotificationConfig,
        notifier: Arc<dyn Notifier>,
        clients: Arc<dyn Clients>,
    ) -> Self {
        Self {
            config: config.clone(),
            notifier,
            clients,
        }
    }

    /// Build the fixed-shape notification for a push payload
    pub fn build_notification(&self, payload: Option<&[u8]>) -> Notification {
        let cfg = &self.config;
        let mut title = cfg.title.clone();
        let mut body = cfg.default_body.clone();

        if let Some(bytes) = payload {
            if let Ok(message) = serde_json::from_slice::<PushMessage>(bytes) {
                if let Some(t) = message.title {
                    title = t;
                }
                if let Some(b) = message.body {
                    body = b;
                }
            } else if let Ok(text) = std::str::from_utf8(bytes) {
                if !text.trim().is_empty() {
                    body = text.to_string();
                }
            }
        }

        Notification {
            title,
            body,
            icon: cfg.icon.clone(),
            badge: cfg.badge.clone(),
            vibration: cfg.vibration.clone(),
            tag: cfg.tag.clone(),
            actions: vec![NotificationAction {
                action: cfg.open_action.clone(),
                title: cfg.open_label.clone(),
                icon: cfg.icon.clone(),
            }],
        }
    }

    /// Push event: display the notification, keeping the event alive
    /// until display completes
    pub fn handle_push(&self, payload: Option<Vec<u8>>, scope: &EventScope) {
        let notification = self.build_notification(payload.as_deref());
        let notifier = Arc::clone(&self.notifier);

        scope.wait_until(async move {
            let tag = notification.tag.clone();
            if let Err(e) = notifier.show(notification).await {
                warn!(%tag, error = %e, "failed to display push notification");
            }
        });
    }

    /// Notification click: close the notification; the "open" action
    /// opens a client window at the configured URL, anything else is a
    /// no-op.
    pub fn handle_click(&self, action: Option<&str>, scope: &EventScope) {
        let notifier = Arc::clone(&self.notifier);
        let clients = Arc::clone(&self.clients);
        let tag = self.config.tag.clone();
        let open_url = self.config.open_url.clone();
        let is_open = action == Some(self.config.open_action.as_str());

        scope.wait_until(async move {
            if let Err(e) = notifier.close(&tag).await {
                debug!(%tag, error = %e, "failed to close notification");
            }
            if is_open {
                if let Err(e) = clients.open_window(&open_url).await {
                    warn!(url = %open_url, error = %e, "failed to open client window");
                }
            }
        });
    }

    /// Background-sync event: acknowledged, no work performed yet
    pub fn handle_sync(&self, tag: &str) {
        debug!(%tag, "background sync event acknowledged");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        shown: Mutex<Vec<Notification>>,
        closed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn show(&self, notification: Notification) -> AppshellResult<()> {
            self.shown.lock().unwrap().push(notification);
            Ok(())
        }

        async fn close(&self, tag: &str) -> AppshellResult<()> {
            self.closed.lock().unwrap().push(tag.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingClients {
        opened: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Clients for RecordingClients {
        async fn open_window(&self, url: &str) -> AppshellResult<()> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    struct Fixture {
        notifier: Arc<RecordingNotifier>,
        clients: Arc<RecordingClients>,
        relay: NotificationRelay,
    }

    fn fixture() -> Fixture {
        let notifier = Arc::new(RecordingNotifier::default());
        let clients = Arc::new(RecordingClients::default());
        let relay = NotificationRelay::new(
            &NotificationConfig::default(),
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Arc::clone(&clients) as Arc<dyn Clients>,
        );
        Fixture {
            notifier,
            clients,
            relay,
        }
    }

    #[tokio::test]
    async fn push_without_payload_uses_default_body() {
        let fx = fixture();
        let scope = EventScope::new();
        fx.relay.handle_push(None, &scope);
        scope.settle().await;

        let shown = fx.notifier.shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].body, "New update available");
        assert_eq!(shown[0].tag, "appshell-notification");
        assert_eq!(shown[0].vibration, vec![200, 100, 200]);
        assert_eq!(shown[0].actions.len(), 1);
        assert_eq!(shown[0].actions[0].action, "open");
    }

    #[tokio::test]
    async fn push_with_text_payload_sets_body() {
        let fx = fixture();
        let scope = EventScope::new();
        fx.relay
            .handle_push(Some(b"Deploy finished".to_vec()), &scope);
        scope.settle().await;

        let shown = fx.notifier.shown.lock().unwrap();
        assert_eq!(shown[0].body, "Deploy finished");
    }

    #[tokio::test]
    async fn push_with_json_payload_sets_title_and_body() {
        let fx = fixture();
        let scope = EventScope::new();
        let payload = br#"{"title": "Release", "body": "v2 is live"}"#.to_vec();
        fx.relay.handle_push(Some(payload), &scope);
        scope.settle().await;

        let shown = fx.notifier.shown.lock().unwrap();
        assert_eq!(shown[0].title, "Release");
        assert_eq!(shown[0].body, "v2 is live");
    }

    #[tokio::test]
    async fn click_open_action_opens_window() {
        let fx = fixture();
        let scope = EventScope::new();
        fx.relay.handle_click(Some("open"), &scope);
        scope.settle().await;

        assert_eq!(
            *fx.notifier.closed.lock().unwrap(),
            vec!["appshell-notification".to_string()]
        );
        assert_eq!(*fx.clients.opened.lock().unwrap(), vec!["/".to_string()]);
    }

    #[tokio::test]
    async fn click_other_interaction_only_closes() {
        let fx = fixture();

        for action in [None, Some("dismiss")] {
            let scope = EventScope::new();
            fx.relay.handle_click(action, &scope);
            scope.settle().await;
        }

        assert_eq!(fx.notifier.closed.lock().unwrap().len(), 2);
        assert!(fx.clients.opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sync_is_a_quiet_noop() {
        let fx = fixture();
        fx.relay.handle_sync("background-sync");
        assert!(fx.notifier.shown.lock().unwrap().is_empty());
        assert!(fx.clients.opened.lock().unwrap().is_empty());
    }
}
