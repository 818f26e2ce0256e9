//! Lost & Found Services - Storage orchestration and reporting.
//!
//! This crate provides the layer between front ends and the storage
//! providers:
//! - `StorageManager`, the single owner of the active provider, carrying
//!   every domain operation (add, reunite, undo, found, clear, migrate)
//! - Report rendering for the register's printable exports
//! - The automatic export timer
//! - Event bus for change notification
//! - `AppState`, the process-wide owner with init and teardown

pub mod service;
pub mod event_bus;
pub mod report;
pub mod manager;
pub mod app_state;

pub use app_state::AppState;
pub use event_bus::{AppEvent, EventBus};
pub use manager::{FoundDetails, FoundRecord, StorageManager, StorageStats};
pub use report::ReportKind;
pub use service::ServiceState;
