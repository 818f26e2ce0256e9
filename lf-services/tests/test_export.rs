//! Reports, export settings, the export timer and portable files.

mod common;

use std::time::Duration;

use lf_core::config::StorageType;
use lf_core::constants::MAX_EXPORT_INTERVAL_MINUTES;
use lf_core::error::LfError;
use lf_models::ExportSettings;
use lf_services::event_bus::AppEvent;
use lf_services::{ReportKind, ServiceState, StorageManager};

#[tokio::test]
async fn init_creates_default_export_settings() {
    let (manager, _dir) = common::create_test_manager(StorageType::Database).await;
    let settings = manager.export_settings().await;
    assert!(settings.enabled);
    assert_eq!(settings.interval, 60);
    assert!(manager.has_export_timer());
    assert_eq!(manager.service_state().await, ServiceState::Running);
}

#[tokio::test]
async fn init_is_idempotent() {
    let (manager, _dir) = common::create_test_manager(StorageType::File).await;
    let mut rx = manager.event_bus().subscribe();

    manager.init(Some(StorageType::Database)).await.unwrap();

    assert_eq!(manager.storage_mode().await.unwrap(), StorageType::File);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn uninitialized_manager_degrades_reads_and_rejects_writes() {
    let dir = tempfile::TempDir::new().unwrap();
    let manager = StorageManager::new(
        common::create_test_config_handle(dir.path()),
        common::create_test_event_bus(),
    );

    assert!(!manager.is_initialized().await);
    assert!(manager.lapel_badges().await.is_empty());
    assert!(matches!(
        manager.load_lapel_badges().await,
        Err(LfError::NotInitialized)
    ));
    assert!(matches!(
        manager.add_lapel_badge(common::lapel_badge("J. Doe")).await,
        Err(LfError::NotInitialized)
    ));
}

#[tokio::test]
async fn report_is_written_and_export_time_recorded() {
    let (manager, dir) = common::create_test_manager(StorageType::Database).await;
    common::seed_test_data(&manager).await;
    let mut rx = manager.event_bus().subscribe();

    let path = manager.export_report(ReportKind::All).await.unwrap();

    assert_eq!(path, dir.path().join("reports").join("all-data.txt"));
    let document = std::fs::read_to_string(&path).unwrap();
    assert!(document.contains("Page 1 of 3"));
    assert!(document.contains("Lapel Badges"));
    assert!(document.contains("High-Value Items"));
    assert!(document.contains("Missing Items"));
    assert!(!document.contains("Reunited Items"));

    assert_eq!(rx.recv().await.unwrap(), AppEvent::SettingsUpdated);
    assert!(manager.export_settings().await.last_export.is_some());
}

#[tokio::test]
async fn report_does_not_touch_register_data() {
    let (manager, _dir) = common::create_test_manager(StorageType::File).await;
    common::seed_test_data(&manager).await;
    let before = manager.lapel_badges().await;

    manager.export_report(ReportKind::LapelBadge).await.unwrap();

    assert_eq!(manager.lapel_badges().await, before);
    assert_eq!(manager.stats().await.unwrap().total(), 6);
}

#[tokio::test]
async fn export_settings_are_persisted_and_clamped() {
    let (manager, _dir) = common::create_test_manager(StorageType::Database).await;
    let mut rx = manager.event_bus().subscribe();

    manager
        .set_export_settings(ExportSettings {
            enabled: true,
            interval: 0,
            last_export: None,
        })
        .await
        .unwrap();

    assert_eq!(rx.recv().await.unwrap(), AppEvent::SettingsUpdated);
    assert_eq!(manager.export_settings().await.interval, 1);

    let blob = manager.export_data().await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(value["settings"][0]["id"], "export-settings");
    assert_eq!(value["settings"][0]["interval"], 1);
}

#[tokio::test]
async fn oversized_interval_is_capped() {
    let (manager, _dir) = common::create_test_manager(StorageType::File).await;

    manager
        .set_export_settings(ExportSettings {
            enabled: true,
            interval: u64::MAX / 2,
            last_export: None,
        })
        .await
        .unwrap();

    assert_eq!(manager.export_settings().await.interval, MAX_EXPORT_INTERVAL_MINUTES);
    assert!(manager.has_export_timer());
}

#[tokio::test]
async fn imported_oversized_interval_is_capped() {
    let (manager, _dir) = common::create_test_manager(StorageType::Database).await;

    let blob = format!(
        r#"{{"settings":[{{"id":"export-settings","enabled":true,"interval":{}}}]}}"#,
        u64::MAX
    );
    manager.import_data(&blob).await.unwrap();

    assert_eq!(manager.export_settings().await.interval, MAX_EXPORT_INTERVAL_MINUTES);
    assert!(manager.has_export_timer());

    let exported: serde_json::Value =
        serde_json::from_str(&manager.export_data().await.unwrap()).unwrap();
    assert_eq!(exported["settings"][0]["interval"], MAX_EXPORT_INTERVAL_MINUTES);
}

#[tokio::test]
async fn disabling_export_removes_timer() {
    let (manager, _dir) = common::create_test_manager(StorageType::File).await;
    assert!(manager.has_export_timer());

    manager
        .set_export_settings(ExportSettings {
            enabled: false,
            ..ExportSettings::default()
        })
        .await
        .unwrap();
    assert!(!manager.has_export_timer());

    manager.shutdown().await.unwrap();
    assert_eq!(manager.service_state().await, ServiceState::Stopped);
    assert!(!manager.is_initialized().await);
}

#[tokio::test(start_paused = true)]
async fn timer_exports_all_on_interval() {
    let (manager, dir) = common::create_test_manager(StorageType::File).await;
    common::seed_test_data(&manager).await;
    manager
        .set_export_settings(ExportSettings {
            enabled: true,
            interval: 1,
            last_export: None,
        })
        .await
        .unwrap();

    let report = dir.path().join("reports").join("all-data.txt");
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(!report.exists());

    tokio::time::sleep(Duration::from_secs(31)).await;
    for _ in 0..100 {
        if report.exists() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(report.exists());
    assert!(manager.export_settings().await.last_export.is_some());
}

#[tokio::test]
async fn save_and_load_need_file_backend() {
    let (manager, dir) = common::create_test_manager(StorageType::Database).await;
    let path = dir.path().join("lost-and-found-data.json");

    assert!(matches!(
        manager.save_to_file(&path).await,
        Err(LfError::UnsupportedOperation(_))
    ));
    assert!(matches!(
        manager.load_from_file(&path).await,
        Err(LfError::UnsupportedOperation(_))
    ));
}

#[tokio::test]
async fn file_save_then_load_into_fresh_manager() {
    let (manager, dir) = common::create_test_manager(StorageType::File).await;
    common::seed_test_data(&manager).await;
    let path = dir.path().join("exports").join("lost-and-found-data.json");
    manager.save_to_file(&path).await.unwrap();

    let (fresh, _other) = common::create_test_manager(StorageType::File).await;
    let mut rx = fresh.event_bus().subscribe();
    fresh.load_from_file(&path).await.unwrap();

    assert_eq!(rx.recv().await.unwrap(), AppEvent::StorageUpdated);
    assert_eq!(fresh.lapel_badges().await, manager.lapel_badges().await);
    assert_eq!(fresh.missing_items().await.len(), 1);
}

#[tokio::test]
async fn loading_garbage_file_is_invalid_format() {
    let (manager, dir) = common::create_test_manager(StorageType::File).await;
    common::seed_test_data(&manager).await;
    let path = dir.path().join("garbage.json");
    std::fs::write(&path, "lapel badges: lots").unwrap();

    let err = manager.load_from_file(&path).await.unwrap_err();
    assert!(matches!(err, LfError::InvalidFormat(_)));
    assert_eq!(manager.lapel_badges().await.len(), 3);
}
