//! Lost & Found Core - Foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by all other workspace crates:
//! - Application configuration (storage backend, database, logging)
//! - Global error type covering every storage and domain failure
//! - Structured logging with tracing
//! - Per-user directory resolution
//! - Common constants

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod constants;

// Re-export commonly used items at the crate root
pub use config::{AppConfig, ConfigHandle, StorageType};
pub use error::{LfError, LfResult};
pub use logging::init_logging;
