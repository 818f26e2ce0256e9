//! Typed event bus for change notification.
//!
//! Uses a tokio broadcast channel so the storage manager can announce
//! changes without knowing who is listening. Events carry no diff; a
//! subscriber re-reads whatever collections it displays.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

use lf_core::config::StorageType;

/// Application-level events emitted after a mutation completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The storage manager connected its first provider.
    StorageInitialized {
        storage_type: StorageType,
    },
    /// All data was migrated to a different backend.
    StorageTypeChanged {
        from: StorageType,
        to: StorageType,
    },
    /// One or more records changed.
    StorageUpdated,
    /// Export settings were saved.
    SettingsUpdated,
}

/// Application-wide event bus backed by a tokio broadcast channel.
///
/// Every subscriber gets every event. Slow subscribers that fall behind
/// receive a `Lagged` error and may miss events; since events are only
/// refetch hints this is harmless.
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<AppEvent>>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Subscribe to receive application events.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers.
    pub fn emit(&self, event: AppEvent) {
        let label = event_label(&event);
        match self.sender.send(event) {
            Ok(count) => {
                debug!("event_bus: emitted {label} to {count} subscriber(s)");
            }
            Err(_) => {
                debug!("event_bus: no subscribers for {label}");
            }
        }
    }

    /// Get the current number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Wire name of an event, as used in logs.
pub fn event_label(event: &AppEvent) -> &'static str {
    match event {
        AppEvent::StorageInitialized { .. } => "storage-initialized",
        AppEvent::StorageTypeChanged { .. } => "storage-type-changed",
        AppEvent::StorageUpdated => "storage-updated",
        AppEvent::SettingsUpdated => "settings-updated",
    }
}
