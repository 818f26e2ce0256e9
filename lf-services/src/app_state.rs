//! Process-wide application state.
//!
//! Holds the shared infrastructure (configuration, event bus) and the one
//! storage manager, and owns their startup and teardown order.

use tracing::info;

use lf_core::config::{ConfigHandle, StorageType};
use lf_core::error::LfResult;

use crate::event_bus::EventBus;
use crate::manager::StorageManager;

/// Owner of everything a front end needs to reach the register.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: ConfigHandle,
    /// Change notification bus.
    pub event_bus: EventBus,
    /// The storage orchestrator.
    pub storage: StorageManager,
}

impl AppState {
    /// Build the state from configuration. Nothing is connected yet.
    pub async fn new(config: ConfigHandle) -> Self {
        let capacity = config.read().await.events.channel_capacity;
        let event_bus = EventBus::new(capacity);
        let storage = StorageManager::new(config.clone(), event_bus.clone());
        Self {
            config,
            event_bus,
            storage,
        }
    }

    /// Connect storage, optionally overriding the persisted backend.
    pub async fn start(&self, backend: Option<StorageType>) -> LfResult<()> {
        self.storage.init(backend).await?;
        info!(
            "application started ({} backend)",
            self.storage.storage_mode().await?
        );
        Ok(())
    }

    /// Stop the export timer and release the backend.
    ///
    /// A failure here can mean unsaved data, so it is returned to the caller.
    pub async fn shutdown(&self) -> LfResult<()> {
        self.storage.shutdown().await?;
        info!("application stopped");
        Ok(())
    }
}
