//! Process-wide sync events
//!
//! Windows never share hotkey state directly. When one window changes
//! the saved chord it publishes a payload-less [`SyncEvent`]; every
//! subscriber re-reads from the backend.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Topic name for [`SyncEvent::HotkeyUpdated`]
pub const HOTKEY_UPDATED: &str = "hotkey-updated";

/// Notifications broadcast to every window in the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncEvent {
    /// The saved hotkey changed; re-query it
    HotkeyUpdated,
}

impl SyncEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            SyncEvent::HotkeyUpdated => HOTKEY_UPDATED,
        }
    }
}

impl std::fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.topic())
    }
}

/// Fan-out channel for [`SyncEvent`]s
///
/// Cloning the bus shares the same channel. Dropping a receiver
/// unsubscribes it.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SyncEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish to all current subscribers, returning how many were reached
    pub fn publish(&self, event: SyncEvent) -> usize {
        // No subscribers is not an error: nobody needs to refresh
        let reached = self.tx.send(event).unwrap_or(0);
        debug!(%event, reached, "sync event published");
        reached
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&SyncEvent::HotkeyUpdated).unwrap();
        assert_eq!(json, r#""hotkey-updated""#);

        let event: SyncEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, SyncEvent::HotkeyUpdated);
        assert_eq!(event.to_string(), HOTKEY_UPDATED);
    }

    #[tokio::test]
    async fn test_publish_fans_out() {
        let bus = EventBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.publish(SyncEvent::HotkeyUpdated), 2);
        assert_eq!(first.recv().await.unwrap(), SyncEvent::HotkeyUpdated);
        assert_eq!(second.recv().await.unwrap(), SyncEvent::HotkeyUpdated);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::default();
        assert_eq!(bus.publish(SyncEvent::HotkeyUpdated), 0);
    }

    #[test]
    fn test_dropping_receiver_unsubscribes() {
        let bus = EventBus::default();
        let rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        drop(rx);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
