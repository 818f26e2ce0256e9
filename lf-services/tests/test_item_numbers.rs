//! Item number sequences and clearing the register.

mod common;

use lf_core::config::StorageType;
use lf_core::constants::prefixes;

#[tokio::test]
async fn sequences_are_strictly_increasing_per_prefix() {
    for backend in [StorageType::Database, StorageType::File] {
        let (manager, _dir) = common::create_test_manager(backend).await;

        for prefix in prefixes::ALL {
            let numbers: Vec<String> = {
                let mut out = Vec::new();
                for _ in 0..12 {
                    out.push(manager.generate_item_number(prefix).await.unwrap());
                }
                out
            };
            assert_eq!(numbers[0], format!("{prefix}0001"));
            assert_eq!(numbers[11], format!("{prefix}0012"));
            let mut sorted = numbers.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted, numbers, "{backend}: {prefix} numbers not strictly increasing");
        }
    }
}

#[tokio::test]
async fn prefixes_count_independently() {
    let (manager, _dir) = common::create_test_manager(StorageType::File).await;

    let badge = manager.add_lapel_badge(common::lapel_badge("J. Doe")).await.unwrap();
    let item = manager
        .add_high_value_item(common::high_value_item("Keys", "Car keys"))
        .await
        .unwrap();
    let second = manager.add_lapel_badge(common::lapel_badge("R. Roe")).await.unwrap();
    let missing = manager.add_missing_item(common::missing_item("Scarf")).await.unwrap();

    assert_eq!(badge.item_number, "LP0001");
    assert_eq!(item.item_number, "HV0001");
    assert_eq!(second.item_number, "LP0002");
    assert_eq!(missing.item_number, "MS0001");
}

#[tokio::test]
async fn numbers_are_not_reused_after_handing_in() {
    let (manager, _dir) = common::create_test_manager(StorageType::Database).await;

    let missing = manager.add_missing_item(common::missing_item("Glasses")).await.unwrap();
    manager
        .mark_missing_item_as_found(
            &missing.id,
            lf_services::FoundDetails::HighValue {
                category: "Glasses".into(),
                where_found: "Row 4".into(),
                description: None,
            },
        )
        .await
        .unwrap();

    let next = manager.add_missing_item(common::missing_item("Hat")).await.unwrap();
    assert_eq!(next.item_number, "MS0002");
}

#[tokio::test]
async fn clear_all_data_is_idempotent_and_resets_counters() {
    for backend in [StorageType::Database, StorageType::File] {
        let (manager, _dir) = common::create_test_manager(backend).await;
        common::seed_test_data(&manager).await;
        let badge = manager.lapel_badges().await.remove(0);
        manager
            .mark_item_reunited(&badge.id, lf_models::ItemType::LapelBadge, "A", "1", "B", None)
            .await
            .unwrap();

        for _ in 0..2 {
            manager.clear_all_data().await.unwrap();
            assert!(manager.lapel_badges().await.is_empty());
            assert!(manager.high_value_items().await.is_empty());
            assert!(manager.missing_items().await.is_empty());
            assert!(manager.reunited_items().await.is_empty());
        }

        assert_eq!(manager.generate_item_number("LP").await.unwrap(), "LP0001");
        assert!(manager.export_settings().await.enabled, "{backend}: settings kept");
    }
}

#[tokio::test]
async fn stats_count_each_collection() {
    let (manager, _dir) = common::create_test_manager(StorageType::Database).await;
    common::seed_test_data(&manager).await;

    let stats = manager.stats().await.unwrap();
    assert_eq!(stats.storage_type, StorageType::Database);
    assert_eq!(stats.lapel_badges, 3);
    assert_eq!(stats.high_value_items, 2);
    assert_eq!(stats.missing_items, 1);
    assert_eq!(stats.returned_items, 0);
    assert_eq!(stats.total(), 6);
}
