//! The storage manager: single owner of the active provider.
//!
//! Every domain operation runs under one async mutex, so calls are never
//! pipelined against each other. Operations that touch two records
//! (reunite, undo, mark-found) undo their first write when the second
//! fails. A change notification is emitted after the writes complete.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use lf_core::config::{ConfigHandle, StorageType};
use lf_core::constants::EXPORT_SETTINGS_ID;
use lf_core::error::{LfError, LfResult};
use lf_models::models::counter::format_item_number;
use lf_models::provider::{all_entities, get_entity, put_entity};
use lf_models::record::from_record;
use lf_models::{
    create_provider, Collection, Counter, Entity, ExportSettings, FoundStatus, HighValueItem,
    ItemSnapshot, ItemType, LapelBadge, MissingItem, MissingStatus, NewHighValueItem,
    NewLapelBadge, NewMissingItem, ProviderSettings, Record, ReturnedItem, StorageProvider,
};

use crate::event_bus::{AppEvent, EventBus};
use crate::report::{self, ReportData, ReportKind};
use crate::service::ServiceState;

/// Builds an unconnected provider for a backend.
pub type ProviderFactory =
    Arc<dyn Fn(StorageType, &ProviderSettings) -> Box<dyn StorageProvider> + Send + Sync>;

/// What a missing item turned out to be when it was handed in.
#[derive(Debug, Clone, PartialEq)]
pub enum FoundDetails {
    LapelBadge {
        name: String,
        congregation: String,
        where_found: String,
    },
    HighValue {
        category: String,
        where_found: String,
        /// Defaults to the missing report's description.
        description: Option<String>,
    },
}

/// The record created by [`StorageManager::mark_missing_item_as_found`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FoundRecord {
    LapelBadge(LapelBadge),
    HighValue(HighValueItem),
}

impl FoundRecord {
    pub fn id(&self) -> &str {
        match self {
            FoundRecord::LapelBadge(b) => &b.id,
            FoundRecord::HighValue(i) => &i.id,
        }
    }

    pub fn item_number(&self) -> &str {
        match self {
            FoundRecord::LapelBadge(b) => &b.item_number,
            FoundRecord::HighValue(i) => &i.item_number,
        }
    }

    fn collection(&self) -> Collection {
        match self {
            FoundRecord::LapelBadge(_) => LapelBadge::COLLECTION,
            FoundRecord::HighValue(_) => HighValueItem::COLLECTION,
        }
    }
}

/// Record counts of the active backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub storage_type: StorageType,
    pub lapel_badges: usize,
    pub high_value_items: usize,
    pub missing_items: usize,
    pub returned_items: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_export: Option<DateTime<Utc>>,
}

impl StorageStats {
    pub fn total(&self) -> usize {
        self.lapel_badges + self.high_value_items + self.missing_items + self.returned_items
    }
}

struct State {
    provider: Option<Box<dyn StorageProvider>>,
    export_settings: ExportSettings,
    service_state: ServiceState,
}

impl State {
    fn provider(&self) -> LfResult<&dyn StorageProvider> {
        self.provider.as_deref().ok_or(LfError::NotInitialized)
    }

    fn provider_mut(&mut self) -> LfResult<&mut dyn StorageProvider> {
        match self.provider.as_deref_mut() {
            Some(provider) => Ok(provider),
            None => Err(LfError::NotInitialized),
        }
    }
}

struct Inner {
    config: ConfigHandle,
    event_bus: EventBus,
    factory: ProviderFactory,
    state: Mutex<State>,
    timer: StdMutex<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.get_mut().ok().and_then(Option::take) {
            handle.abort();
        }
    }
}

/// Cheaply cloneable handle to the process-wide storage orchestrator.
#[derive(Clone)]
pub struct StorageManager {
    inner: Arc<Inner>,
}

impl StorageManager {
    /// Create a manager that builds the stock providers.
    pub fn new(config: ConfigHandle, event_bus: EventBus) -> Self {
        Self::with_factory(config, event_bus, Arc::new(create_provider))
    }

    /// Create a manager with a custom provider factory.
    pub fn with_factory(config: ConfigHandle, event_bus: EventBus, factory: ProviderFactory) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                event_bus,
                factory,
                state: Mutex::new(State {
                    provider: None,
                    export_settings: ExportSettings::default(),
                    service_state: ServiceState::Created,
                }),
                timer: StdMutex::new(None),
            }),
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.inner.config
    }

    // -- Lifecycle --

    /// Connect the provider and start the export timer.
    ///
    /// Uses `requested` when given, otherwise the persisted backend choice.
    /// A second call on an initialized manager does nothing.
    pub async fn init(&self, requested: Option<StorageType>) -> LfResult<()> {
        let storage_type = {
            let mut state = self.inner.state.lock().await;
            if state.provider.is_some() {
                debug!("storage manager already initialized");
                return Ok(());
            }

            let kind = match requested {
                Some(kind) => kind,
                None => self.inner.config.read().await.storage.backend,
            };
            info!("initializing storage manager with {kind} backend");
            state.service_state = ServiceState::Initializing;

            let opened = async {
                let mut provider = self.open_provider(kind).await?;
                match load_export_settings(provider.as_mut()).await {
                    Ok(settings) => Ok::<_, LfError>((provider, settings)),
                    Err(e) => {
                        disconnect_quietly(provider.as_mut()).await;
                        Err(e)
                    }
                }
            }
            .await;

            match opened {
                Ok((provider, settings)) => {
                    state.provider = Some(provider);
                    state.export_settings = settings;
                    state.service_state = ServiceState::Running;
                    kind
                }
                Err(e) => {
                    error!("storage manager failed to initialize: {e}");
                    state.service_state = ServiceState::Failed;
                    return Err(e);
                }
            }
        };

        self.setup_automatic_export().await;
        self.inner
            .event_bus
            .emit(AppEvent::StorageInitialized { storage_type });
        Ok(())
    }

    pub async fn is_initialized(&self) -> bool {
        self.inner.state.lock().await.provider.is_some()
    }

    pub async fn service_state(&self) -> ServiceState {
        self.inner.state.lock().await.service_state
    }

    /// Stop the timer and disconnect the provider.
    ///
    /// If the provider fails to disconnect it stays installed, so its data
    /// is still reachable and the shutdown can be retried.
    pub async fn shutdown(&self) -> LfResult<()> {
        self.cancel_timer();

        let mut state = self.inner.state.lock().await;
        state.service_state = ServiceState::ShuttingDown;
        if let Some(mut provider) = state.provider.take() {
            if let Err(e) = provider.disconnect().await {
                error!("{} provider failed to shut down: {e}", provider.kind());
                state.provider = Some(provider);
                state.service_state = ServiceState::Failed;
                return Err(e);
            }
        }
        state.service_state = ServiceState::Stopped;
        info!("storage manager stopped");
        Ok(())
    }

    async fn open_provider(&self, kind: StorageType) -> LfResult<Box<dyn StorageProvider>> {
        let settings = {
            let config = self.inner.config.read().await;
            ProviderSettings::from_config(&config)?
        };
        let mut provider = (self.inner.factory)(kind, &settings);
        provider.connect().await?;
        Ok(provider)
    }

    // -- Backend selection --

    /// Backend of the active provider.
    pub async fn storage_mode(&self) -> LfResult<StorageType> {
        Ok(self.inner.state.lock().await.provider()?.kind())
    }

    pub async fn set_storage_mode(&self, storage_type: StorageType) -> LfResult<()> {
        self.change_storage_type(storage_type).await
    }

    /// Migrate every collection to another backend and make it active.
    ///
    /// On failure the previous provider stays active and its data is
    /// untouched.
    pub async fn change_storage_type(&self, new_type: StorageType) -> LfResult<()> {
        let from = {
            let mut state = self.inner.state.lock().await;
            let current = state.provider()?;
            let from = current.kind();
            if from == new_type {
                debug!("storage backend already {new_type}");
                return Ok(());
            }

            info!("migrating storage from {from} to {new_type}");
            let blob = current.export_data().await?;

            let mut next = self.open_provider(new_type).await?;
            let mut settings = state.export_settings.clone();
            settings.last_export = Some(Utc::now());

            let migrated = async {
                next.import_data(&blob).await?;
                next.set_item(Collection::Settings, settings.to_record()?).await?;
                Ok::<_, LfError>(())
            }
            .await;
            if let Err(e) = migrated {
                error!("migration to {new_type} failed, keeping {from}: {e}");
                disconnect_quietly(next.as_mut()).await;
                return Err(e);
            }

            {
                let mut config = self.inner.config.write().await;
                config.storage.backend = new_type;
            }
            if let Err(e) = self.inner.config.save().await {
                warn!("could not persist storage backend choice: {e}");
            }

            if let Some(mut old) = state.provider.replace(next) {
                disconnect_quietly(old.as_mut()).await;
            }
            state.export_settings = settings;
            from
        };

        self.setup_automatic_export().await;
        info!("storage backend changed from {from} to {new_type}");
        self.inner.event_bus.emit(AppEvent::StorageTypeChanged {
            from,
            to: new_type,
        });
        Ok(())
    }

    // -- Reads --

    async fn load_all<T: Entity>(&self) -> LfResult<Vec<T>> {
        let state = self.inner.state.lock().await;
        all_entities::<T>(state.provider()?).await
    }

    async fn read_or_empty<T: Entity>(&self) -> Vec<T> {
        self.load_all::<T>().await.unwrap_or_else(|e| {
            warn!("could not read {}: {e}", T::COLLECTION);
            Vec::new()
        })
    }

    pub async fn load_lapel_badges(&self) -> LfResult<Vec<LapelBadge>> {
        self.load_all().await
    }

    pub async fn load_high_value_items(&self) -> LfResult<Vec<HighValueItem>> {
        self.load_all().await
    }

    pub async fn load_missing_items(&self) -> LfResult<Vec<MissingItem>> {
        self.load_all().await
    }

    pub async fn load_reunited_items(&self) -> LfResult<Vec<ReturnedItem>> {
        self.load_all().await
    }

    /// All lapel badges, or an empty list if the backend cannot be read.
    pub async fn lapel_badges(&self) -> Vec<LapelBadge> {
        self.read_or_empty().await
    }

    pub async fn high_value_items(&self) -> Vec<HighValueItem> {
        self.read_or_empty().await
    }

    pub async fn missing_items(&self) -> Vec<MissingItem> {
        self.read_or_empty().await
    }

    pub async fn reunited_items(&self) -> Vec<ReturnedItem> {
        self.read_or_empty().await
    }

    pub async fn stats(&self) -> LfResult<StorageStats> {
        let state = self.inner.state.lock().await;
        let provider = state.provider()?;
        Ok(StorageStats {
            storage_type: provider.kind(),
            lapel_badges: provider.count_items(Collection::LapelBadges).await?,
            high_value_items: provider.count_items(Collection::HighValueItems).await?,
            missing_items: provider.count_items(Collection::MissingItems).await?,
            returned_items: provider.count_items(Collection::ReturnedItems).await?,
            last_export: state.export_settings.last_export,
        })
    }

    // -- Item numbers --

    /// Advance the counter for `prefix` and format the new item number.
    pub async fn generate_item_number(&self, prefix: &str) -> LfResult<String> {
        let mut state = self.inner.state.lock().await;
        next_item_number(state.provider_mut()?, prefix).await
    }

    // -- Adds --

    pub async fn add_lapel_badge(&self, new: NewLapelBadge) -> LfResult<LapelBadge> {
        let badge = {
            let mut state = self.inner.state.lock().await;
            let provider = state.provider_mut()?;
            let badge = LapelBadge {
                id: new_id(),
                item_number: next_item_number(provider, ItemType::LapelBadge.prefix()).await?,
                name: new.name,
                congregation: new.congregation,
                where_found: new.where_found,
                logger: new.logger,
                timestamp: Utc::now(),
                status: FoundStatus::Found,
            };
            put_entity(provider, &badge).await?;
            badge
        };
        info!("logged lapel badge {}", badge.item_number);
        self.notify();
        Ok(badge)
    }

    pub async fn add_high_value_item(&self, new: NewHighValueItem) -> LfResult<HighValueItem> {
        let item = {
            let mut state = self.inner.state.lock().await;
            let provider = state.provider_mut()?;
            let item = HighValueItem {
                id: new_id(),
                item_number: next_item_number(provider, ItemType::HighValue.prefix()).await?,
                category: new.category,
                description: new.description,
                where_found: new.where_found,
                logger: new.logger,
                timestamp: Utc::now(),
                status: FoundStatus::Found,
            };
            put_entity(provider, &item).await?;
            item
        };
        info!("logged high-value item {}", item.item_number);
        self.notify();
        Ok(item)
    }

    pub async fn add_missing_item(&self, new: NewMissingItem) -> LfResult<MissingItem> {
        let item = {
            let mut state = self.inner.state.lock().await;
            let provider = state.provider_mut()?;
            let item = MissingItem {
                id: new_id(),
                item_number: next_item_number(provider, ItemType::Missing.prefix()).await?,
                description: new.description,
                last_location: new.last_location,
                reported_by: new.reported_by,
                phone_number: new.phone_number,
                logger: new.logger,
                timestamp: Utc::now(),
                status: MissingStatus::Missing,
            };
            put_entity(provider, &item).await?;
            item
        };
        info!("logged missing item {}", item.item_number);
        self.notify();
        Ok(item)
    }

    // -- Cross-entity operations --

    /// Mark an entry returned and record who collected it.
    ///
    /// The snapshot in the returned record is taken at lookup, before the
    /// status flip, so it shows the entry's open status.
    pub async fn mark_item_reunited(
        &self,
        item_id: &str,
        item_type: ItemType,
        recipient_name: &str,
        phone_number: &str,
        returned_by: &str,
        return_timestamp: Option<DateTime<Utc>>,
    ) -> LfResult<ReturnedItem> {
        let returned = {
            let mut state = self.inner.state.lock().await;
            let provider = state.provider_mut()?;
            let collection = item_type.collection();

            let source = provider
                .get_item(collection, item_id)
                .await?
                .ok_or_else(|| LfError::not_found(collection.name(), item_id))?;
            let previous_status = source.get("status").cloned().unwrap_or(Value::Null);
            let snapshot = snapshot_of(item_type, source)?;

            provider
                .update_item(collection, item_id, status_patch(Value::from("returned")))
                .await?;

            let returned = ReturnedItem {
                id: String::new(),
                original_item_id: item_id.to_string(),
                item_type,
                original_item: snapshot,
                recipient_name: recipient_name.to_string(),
                phone_number: phone_number.to_string(),
                returned_by: returned_by.to_string(),
                return_timestamp: return_timestamp.unwrap_or_else(Utc::now),
            };
            let stored = async {
                let id = unique_returned_id(&*provider).await?;
                let returned = ReturnedItem { id, ..returned };
                put_entity(&mut *provider, &returned).await?;
                Ok::<_, LfError>(returned)
            }
            .await;

            match stored {
                Ok(returned) => returned,
                Err(e) => {
                    compensate(provider, collection, item_id, status_patch(previous_status)).await;
                    return Err(e);
                }
            }
        };
        info!(
            "{} {} reunited with {}",
            item_type,
            returned.original_item.item_number(),
            returned.recipient_name
        );
        self.notify();
        Ok(returned)
    }

    /// Reverse a reunite: reopen the source entry and drop the history record.
    pub async fn undo_reunite(&self, returned_id: &str) -> LfResult<()> {
        {
            let mut state = self.inner.state.lock().await;
            let provider = state.provider_mut()?;

            let returned: ReturnedItem = get_entity(&*provider, returned_id)
                .await?
                .ok_or_else(|| LfError::not_found(ReturnedItem::COLLECTION.name(), returned_id))?;
            let collection = returned.item_type.collection();
            let open = Value::from(returned.item_type.open_status());

            provider
                .update_item(collection, &returned.original_item_id, status_patch(open))
                .await?;

            if let Err(e) = provider.delete_item(ReturnedItem::COLLECTION, returned_id).await {
                compensate(
                    provider,
                    collection,
                    &returned.original_item_id,
                    status_patch(Value::from("returned")),
                )
                .await;
                return Err(e);
            }
        }
        info!("undid reunite {returned_id}");
        self.notify();
        Ok(())
    }

    /// Replace a missing report with a new found entry.
    ///
    /// The new record gets a fresh id and item number and keeps the
    /// report's logger. The missing report is deleted.
    pub async fn mark_missing_item_as_found(
        &self,
        missing_id: &str,
        details: FoundDetails,
    ) -> LfResult<FoundRecord> {
        let (record, missing_number) = {
            let mut state = self.inner.state.lock().await;
            let provider = state.provider_mut()?;

            let missing: MissingItem = get_entity(&*provider, missing_id)
                .await?
                .ok_or_else(|| LfError::not_found(MissingItem::COLLECTION.name(), missing_id))?;

            let record = match details {
                FoundDetails::LapelBadge {
                    name,
                    congregation,
                    where_found,
                } => {
                    let badge = LapelBadge {
                        id: new_id(),
                        item_number: next_item_number(provider, ItemType::LapelBadge.prefix()).await?,
                        name,
                        congregation,
                        where_found,
                        logger: missing.logger.clone(),
                        timestamp: Utc::now(),
                        status: FoundStatus::Found,
                    };
                    put_entity(provider, &badge).await?;
                    FoundRecord::LapelBadge(badge)
                }
                FoundDetails::HighValue {
                    category,
                    where_found,
                    description,
                } => {
                    let item = HighValueItem {
                        id: new_id(),
                        item_number: next_item_number(provider, ItemType::HighValue.prefix()).await?,
                        category,
                        description: description.unwrap_or_else(|| missing.description.clone()),
                        where_found,
                        logger: missing.logger.clone(),
                        timestamp: Utc::now(),
                        status: FoundStatus::Found,
                    };
                    put_entity(provider, &item).await?;
                    FoundRecord::HighValue(item)
                }
            };

            if let Err(e) = provider.delete_item(MissingItem::COLLECTION, missing_id).await {
                if let Err(undo) = provider.delete_item(record.collection(), record.id()).await {
                    error!("could not remove {} after failed hand-in: {undo}", record.id());
                }
                return Err(e);
            }
            (record, missing.item_number)
        };
        info!("missing item {missing_number} handed in as {}", record.item_number());
        self.notify();
        Ok(record)
    }

    /// Empty every entry collection and reset the item number counters.
    ///
    /// Export settings are kept.
    pub async fn clear_all_data(&self) -> LfResult<()> {
        {
            let mut state = self.inner.state.lock().await;
            let provider = state.provider_mut()?;
            for collection in Collection::ENTITIES {
                provider.clear_store(collection).await?;
            }
            provider.clear_store(Counter::COLLECTION).await?;
        }
        warn!("all register data cleared");
        self.notify();
        Ok(())
    }

    // -- Whole-store transfer --

    pub async fn export_data(&self) -> LfResult<String> {
        let state = self.inner.state.lock().await;
        state.provider()?.export_data().await
    }

    /// Import a blob into the active provider, replacing each collection it names.
    pub async fn import_data(&self, blob: &str) -> LfResult<()> {
        {
            let mut state = self.inner.state.lock().await;
            state.provider_mut()?.import_data(blob).await?;
            reload_export_settings(&mut state).await;
        }
        self.setup_automatic_export().await;
        self.notify();
        Ok(())
    }

    /// Write the whole store to a document. Requires the file backend.
    pub async fn save_to_file(&self, path: &Path) -> LfResult<()> {
        let state = self.inner.state.lock().await;
        let portable = state
            .provider()?
            .as_portable()
            .ok_or_else(|| LfError::UnsupportedOperation("save to file needs the file backend".into()))?;
        portable.save_to_file(path).await
    }

    /// Load a document into the store. Requires the file backend.
    pub async fn load_from_file(&self, path: &Path) -> LfResult<()> {
        {
            let mut state = self.inner.state.lock().await;
            let portable = state.provider_mut()?.as_portable_mut().ok_or_else(|| {
                LfError::UnsupportedOperation("load from file needs the file backend".into())
            })?;
            portable.load_from_file(path).await?;
            reload_export_settings(&mut state).await;
        }
        self.setup_automatic_export().await;
        self.notify();
        Ok(())
    }

    // -- Export settings and reports --

    pub async fn export_settings(&self) -> ExportSettings {
        self.inner.state.lock().await.export_settings.clone()
    }

    /// Persist new export settings and reinstall the timer.
    ///
    /// The interval is clamped to between one minute and thirty days.
    pub async fn set_export_settings(&self, settings: ExportSettings) -> LfResult<()> {
        let settings = settings.clamped();
        {
            let mut state = self.inner.state.lock().await;
            state
                .provider_mut()?
                .set_item(Collection::Settings, settings.to_record()?)
                .await?;
            state.export_settings = settings;
        }
        self.setup_automatic_export().await;
        self.inner.event_bus.emit(AppEvent::SettingsUpdated);
        Ok(())
    }

    /// Render a report into the reports directory and record the export time.
    pub async fn export_report(&self, kind: ReportKind) -> LfResult<PathBuf> {
        let reports_dir = self.inner.config.read().await.effective_reports_dir()?;

        let path = {
            let mut state = self.inner.state.lock().await;
            let provider = state.provider()?;
            let data = ReportData {
                lapel_badges: all_entities(provider).await?,
                high_value_items: all_entities(provider).await?,
                missing_items: all_entities(provider).await?,
                returned_items: all_entities(provider).await?,
            };

            let now = Utc::now();
            let document = report::render(kind, &data, now);
            std::fs::create_dir_all(&reports_dir)?;
            let path = reports_dir.join(kind.file_name());
            std::fs::write(&path, document)?;

            let mut settings = state.export_settings.clone();
            settings.last_export = Some(now);
            state
                .provider_mut()?
                .set_item(Collection::Settings, settings.to_record()?)
                .await?;
            state.export_settings = settings;
            path
        };

        info!("exported {kind} report to {}", path.display());
        self.inner.event_bus.emit(AppEvent::SettingsUpdated);
        Ok(path)
    }

    /// Replace the automatic export timer according to the current settings.
    pub async fn setup_automatic_export(&self) {
        let settings = self.inner.state.lock().await.export_settings.clone();
        self.install_timer(&settings);
    }

    /// Whether an automatic export timer is installed.
    pub fn has_export_timer(&self) -> bool {
        self.inner
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    fn install_timer(&self, settings: &ExportSettings) {
        let mut slot = self.inner.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            previous.abort();
        }

        if !settings.enabled {
            debug!("automatic export disabled");
            return;
        }

        let period = settings.period();
        let weak = Arc::downgrade(&self.inner);
        *slot = Some(tokio::spawn(run_export_timer(weak, period)));
        debug!("automatic export every {} second(s)", period.as_secs());
    }

    fn cancel_timer(&self) {
        let mut slot = self.inner.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }

    fn notify(&self) {
        self.inner.event_bus.emit(AppEvent::StorageUpdated);
    }
}

async fn run_export_timer(weak: Weak<Inner>, period: Duration) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let Some(inner) = weak.upgrade() else {
            break;
        };
        let manager = StorageManager { inner };
        match manager.export_report(ReportKind::All).await {
            Ok(path) => debug!("automatic export written to {}", path.display()),
            Err(e) => warn!("automatic export failed: {e}"),
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn status_patch(status: Value) -> Record {
    let mut patch = Record::new();
    patch.insert("status".into(), status);
    patch
}

fn snapshot_of(item_type: ItemType, record: Record) -> LfResult<ItemSnapshot> {
    Ok(match item_type {
        ItemType::LapelBadge => ItemSnapshot::LapelBadge(from_record(record)?),
        ItemType::HighValue => ItemSnapshot::HighValue(from_record(record)?),
        ItemType::Missing => ItemSnapshot::Missing(from_record(record)?),
    })
}

async fn next_item_number(provider: &mut dyn StorageProvider, prefix: &str) -> LfResult<String> {
    let key = Counter::key(prefix);
    let mut counter = get_entity::<Counter>(&*provider, &key)
        .await?
        .unwrap_or_else(|| Counter::new(prefix));
    counter.value += 1;
    put_entity(provider, &counter).await?;
    Ok(format_item_number(prefix, counter.value))
}

/// Millisecond timestamp id, moved forward past any existing id.
async fn unique_returned_id(provider: &dyn StorageProvider) -> LfResult<String> {
    let mut millis = Utc::now().timestamp_millis();
    loop {
        let id = millis.to_string();
        if provider.get_item(ReturnedItem::COLLECTION, &id).await?.is_none() {
            return Ok(id);
        }
        millis += 1;
    }
}

async fn compensate(provider: &mut dyn StorageProvider, collection: Collection, id: &str, patch: Record) {
    match provider.update_item(collection, id, patch).await {
        Ok(_) => warn!("{collection}: rolled back status of {id}"),
        Err(e) => error!("{collection}: could not roll back status of {id}: {e}"),
    }
}

async fn load_export_settings(provider: &mut dyn StorageProvider) -> LfResult<ExportSettings> {
    if let Some(record) = provider.get_item(Collection::Settings, EXPORT_SETTINGS_ID).await? {
        match ExportSettings::from_record(record) {
            Ok(settings) if settings.interval_in_range() => return Ok(settings),
            Ok(settings) => {
                warn!("export interval {} out of range, clamping", settings.interval);
                let settings = settings.clamped();
                provider
                    .set_item(Collection::Settings, settings.to_record()?)
                    .await?;
                return Ok(settings);
            }
            Err(e) => warn!("replacing unreadable export settings: {e}"),
        }
    }

    let settings = ExportSettings::default();
    provider
        .set_item(Collection::Settings, settings.to_record()?)
        .await?;
    Ok(settings)
}

async fn reload_export_settings(state: &mut State) {
    let Ok(provider) = state.provider_mut() else {
        return;
    };
    let loaded = load_export_settings(provider).await;
    match loaded {
        Ok(settings) => state.export_settings = settings,
        Err(e) => warn!("keeping previous export settings: {e}"),
    }
}

async fn disconnect_quietly(provider: &mut dyn StorageProvider) {
    if let Err(e) = provider.disconnect().await {
        warn!("{} provider did not disconnect cleanly: {e}", provider.kind());
    }
}
