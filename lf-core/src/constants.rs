//! Application-wide constants.

/// Application name.
pub const APP_NAME: &str = "LostFound";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix of the daily rolling log file.
pub const LOG_FILE_PREFIX: &str = "lostfound.log";

/// Default SQLite database file name inside the data directory.
pub const DB_FILE_NAME: &str = "lostfound.db";

/// File name of the portable-file provider's transient cache snapshot.
pub const FILE_CACHE_NAME: &str = "file-provider-cache.json";

/// Default document name for save-to-file.
pub const DEFAULT_DATA_FILE_NAME: &str = "lost-and-found-data.json";

/// Record id of the export settings singleton in the settings collection.
pub const EXPORT_SETTINGS_ID: &str = "export-settings";

/// Default automatic export interval in minutes.
pub const DEFAULT_EXPORT_INTERVAL_MINUTES: u64 = 60;

/// Longest accepted automatic export interval in minutes (30 days).
pub const MAX_EXPORT_INTERVAL_MINUTES: u64 = 30 * 24 * 60;

/// Default event bus channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Number of digits in the numeric part of an item number.
pub const ITEM_NUMBER_WIDTH: usize = 4;

/// Item number prefixes, one counter per prefix.
pub mod prefixes {
    pub const LAPEL_BADGE: &str = "LP";
    pub const HIGH_VALUE: &str = "HV";
    pub const MISSING: &str = "MS";

    /// All prefixes in use.
    pub const ALL: &[&str] = &[LAPEL_BADGE, HIGH_VALUE, MISSING];
}
