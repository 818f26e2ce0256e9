//! Automatic export settings, a singleton in the settings collection.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lf_core::constants::{
    DEFAULT_EXPORT_INTERVAL_MINUTES, EXPORT_SETTINGS_ID, MAX_EXPORT_INTERVAL_MINUTES,
};
use lf_core::error::LfResult;

use crate::record::{from_record, to_record, Record};

/// Recurring report export preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub enabled: bool,
    /// Minutes between automatic exports.
    pub interval: u64,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_export: Option<DateTime<Utc>>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: DEFAULT_EXPORT_INTERVAL_MINUTES,
            last_export: None,
        }
    }
}

impl ExportSettings {
    /// Record stored under the singleton id.
    pub fn to_record(&self) -> LfResult<Record> {
        let mut record = to_record(self)?;
        record.insert("id".into(), EXPORT_SETTINGS_ID.into());
        Ok(record)
    }

    /// Parse the singleton record.
    pub fn from_record(record: Record) -> LfResult<Self> {
        from_record(record)
    }

    /// Whether the interval lies in `1..=MAX_EXPORT_INTERVAL_MINUTES`.
    pub fn interval_in_range(&self) -> bool {
        (1..=MAX_EXPORT_INTERVAL_MINUTES).contains(&self.interval)
    }

    /// Same settings with the interval pulled into the accepted range.
    pub fn clamped(mut self) -> Self {
        self.interval = self.interval.clamp(1, MAX_EXPORT_INTERVAL_MINUTES);
        self
    }

    /// Time between automatic exports.
    pub fn period(&self) -> Duration {
        let minutes = self.interval.clamp(1, MAX_EXPORT_INTERVAL_MINUTES);
        Duration::from_secs(minutes.saturating_mul(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults() {
        let s = ExportSettings::default();
        assert!(s.enabled);
        assert_eq!(s.interval, 60);
        assert!(s.last_export.is_none());
    }

    #[test]
    fn test_record_shape() {
        let s = ExportSettings {
            enabled: false,
            interval: 15,
            last_export: Some(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()),
        };
        let record = s.to_record().unwrap();
        assert_eq!(record["id"], "export-settings");
        assert_eq!(record["lastExport"], 1_700_000_000_000i64);
        assert_eq!(ExportSettings::from_record(record).unwrap(), s);
    }

    #[test]
    fn test_interval_bounds() {
        let huge = ExportSettings {
            interval: u64::MAX / 2,
            ..ExportSettings::default()
        };
        assert!(!huge.interval_in_range());
        assert_eq!(huge.period(), Duration::from_secs(MAX_EXPORT_INTERVAL_MINUTES * 60));
        assert_eq!(huge.clamped().interval, MAX_EXPORT_INTERVAL_MINUTES);

        let zero = ExportSettings {
            interval: 0,
            ..ExportSettings::default()
        };
        assert_eq!(zero.period(), Duration::from_secs(60));
        assert_eq!(zero.clamped().interval, 1);
        assert!(ExportSettings::default().interval_in_range());
    }
}
