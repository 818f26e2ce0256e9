//! Shared test utilities for integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use lf_core::config::{AppConfig, ConfigHandle, StorageType};
use lf_core::error::{LfError, LfResult};
use lf_models::{
    create_provider, BulkWritePolicy, Collection, FileProvider, NewHighValueItem, NewLapelBadge,
    NewMissingItem, PortableFile, ProviderSettings, Record, StorageProvider,
};
use lf_services::event_bus::EventBus;
use lf_services::manager::ProviderFactory;
use lf_services::StorageManager;

/// Configuration with every location inside `root`, saved to `root/config.toml`.
pub fn create_test_config_handle(root: &Path) -> ConfigHandle {
    ConfigHandle::with_path(AppConfig::rooted_at(root), root.join("config.toml"))
}

/// Create an EventBus with a small buffer suitable for tests.
pub fn create_test_event_bus() -> EventBus {
    EventBus::new(64)
}

/// Create an initialized manager on `backend`.
/// Returns the manager and the TempDir (must be held alive for the duration of the test).
pub async fn create_test_manager(backend: StorageType) -> (StorageManager, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let manager = StorageManager::new(create_test_config_handle(dir.path()), create_test_event_bus());
    manager
        .init(Some(backend))
        .await
        .expect("failed to init storage manager");
    (manager, dir)
}

/// Create an initialized file-backend manager whose provider fails the given writes.
pub async fn create_faulty_manager(faults: Faults) -> (StorageManager, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let factory: ProviderFactory = Arc::new(
        move |kind: StorageType, settings: &ProviderSettings| -> Box<dyn StorageProvider> {
            match kind {
                StorageType::File => Box::new(FaultyProvider {
                    inner: FileProvider::new(None),
                    faults: faults.clone(),
                }),
                other => create_provider(other, settings),
            }
        },
    );
    let manager = StorageManager::with_factory(
        create_test_config_handle(dir.path()),
        create_test_event_bus(),
        factory,
    );
    manager
        .init(Some(StorageType::File))
        .await
        .expect("failed to init faulty manager");
    (manager, dir)
}

pub fn lapel_badge(name: &str) -> NewLapelBadge {
    NewLapelBadge {
        name: name.into(),
        congregation: "Central".into(),
        where_found: "Lobby".into(),
        logger: "Matt".into(),
    }
}

pub fn high_value_item(category: &str, description: &str) -> NewHighValueItem {
    NewHighValueItem {
        category: category.into(),
        description: description.into(),
        where_found: "Main hall".into(),
        logger: "Jo".into(),
    }
}

pub fn missing_item(description: &str) -> NewMissingItem {
    NewMissingItem {
        description: description.into(),
        last_location: "Car park".into(),
        reported_by: "Sam".into(),
        phone_number: "555-0000".into(),
        logger: "Priya".into(),
    }
}

/// Seed the register with a realistic mix:
/// 3 lapel badges, 2 high-value items, 1 missing item.
pub async fn seed_test_data(manager: &StorageManager) {
    for name in ["J. Doe", "R. Roe", "A. Person"] {
        manager
            .add_lapel_badge(lapel_badge(name))
            .await
            .expect("failed to add badge");
    }
    manager
        .add_high_value_item(high_value_item("Phone", "Black iPhone"))
        .await
        .expect("failed to add item");
    manager
        .add_high_value_item(high_value_item("Wallet", "Brown leather"))
        .await
        .expect("failed to add item");
    manager
        .add_missing_item(missing_item("Blue umbrella"))
        .await
        .expect("failed to add missing item");
}

/// Writes a faulty provider rejects.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    pub fail_set_on: Option<Collection>,
    pub fail_delete_on: Option<Collection>,
}

/// File provider that fails selected writes.
pub struct FaultyProvider {
    inner: FileProvider,
    faults: Faults,
}

impl FaultyProvider {
    fn injected(op: &str, collection: Collection) -> LfError {
        LfError::Internal(format!("injected {op} failure on {collection}"))
    }
}

#[async_trait]
impl StorageProvider for FaultyProvider {
    fn kind(&self) -> StorageType {
        self.inner.kind()
    }

    fn bulk_write_policy(&self) -> BulkWritePolicy {
        self.inner.bulk_write_policy()
    }

    async fn connect(&mut self) -> LfResult<()> {
        self.inner.connect().await
    }

    async fn disconnect(&mut self) -> LfResult<()> {
        self.inner.disconnect().await
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    async fn get_item(&self, collection: Collection, id: &str) -> LfResult<Option<Record>> {
        self.inner.get_item(collection, id).await
    }

    async fn get_all_items(&self, collection: Collection) -> LfResult<Vec<Record>> {
        self.inner.get_all_items(collection).await
    }

    async fn set_item(&mut self, collection: Collection, record: Record) -> LfResult<Record> {
        if self.faults.fail_set_on == Some(collection) {
            return Err(Self::injected("set", collection));
        }
        self.inner.set_item(collection, record).await
    }

    async fn update_item(
        &mut self,
        collection: Collection,
        id: &str,
        partial: Record,
    ) -> LfResult<Record> {
        self.inner.update_item(collection, id, partial).await
    }

    async fn delete_item(&mut self, collection: Collection, id: &str) -> LfResult<()> {
        if self.faults.fail_delete_on == Some(collection) {
            return Err(Self::injected("delete", collection));
        }
        self.inner.delete_item(collection, id).await
    }

    async fn bulk_set_items(&mut self, collection: Collection, records: Vec<Record>) -> LfResult<()> {
        self.inner.bulk_set_items(collection, records).await
    }

    async fn clear_store(&mut self, collection: Collection) -> LfResult<()> {
        self.inner.clear_store(collection).await
    }

    async fn import_data(&mut self, blob: &str) -> LfResult<()> {
        self.inner.import_data(blob).await
    }

    fn as_portable(&self) -> Option<&dyn PortableFile> {
        self.inner.as_portable()
    }

    fn as_portable_mut(&mut self) -> Option<&mut dyn PortableFile> {
        self.inner.as_portable_mut()
    }
}
