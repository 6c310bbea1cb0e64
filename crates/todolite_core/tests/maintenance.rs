use std::fs;
use todolite_core::maintenance::{
    estimate_storage, reset_storage, MaintenanceClock, ResetOutcome, ResetScope, StorageLayout,
    StorageStatus, BLOCKED_RELOAD_DELAY_MS, COUNT_REFRESH_INTERVAL_MS, STORAGE_CHECK_INTERVAL_MS,
};

fn layout_with_dirs(root: &std::path::Path) -> StorageLayout {
    let layout = StorageLayout::under(root);
    fs::create_dir_all(&layout.data_dir).unwrap();
    fs::create_dir_all(&layout.kv_dir).unwrap();
    fs::create_dir_all(&layout.cache_dir).unwrap();
    layout
}

#[test]
fn estimate_reports_usage_within_quota() {
    let dir = tempfile::tempdir().unwrap();
    let layout = layout_with_dirs(dir.path());
    fs::write(layout.data_dir.join("todolite.sqlite3"), vec![0u8; 40]).unwrap();
    fs::write(layout.kv_dir.join("prefs.json"), vec![0u8; 10]).unwrap();

    let status = estimate_storage(&layout, 1_000);
    assert_eq!(
        status,
        StorageStatus::Ok {
            usage_bytes: 50,
            quota_bytes: 1_000
        }
    );
}

#[test]
fn estimate_warns_only_above_eighty_percent() {
    let dir = tempfile::tempdir().unwrap();
    let layout = layout_with_dirs(dir.path());
    fs::write(layout.data_dir.join("todolite.sqlite3"), vec![0u8; 80]).unwrap();

    // Exactly 80% does not warn; the threshold is strictly greater-than.
    assert_eq!(
        estimate_storage(&layout, 100),
        StorageStatus::Ok {
            usage_bytes: 80,
            quota_bytes: 100
        }
    );

    fs::write(layout.data_dir.join("overflow"), vec![0u8; 1]).unwrap();
    assert_eq!(
        estimate_storage(&layout, 100),
        StorageStatus::NearCapacity {
            usage_bytes: 81,
            quota_bytes: 100
        }
    );
}

#[test]
fn estimate_degrades_to_unavailable_without_a_quota() {
    let dir = tempfile::tempdir().unwrap();
    let layout = layout_with_dirs(dir.path());

    assert_eq!(estimate_storage(&layout, 0), StorageStatus::Unavailable);
}

#[test]
fn estimate_ignores_missing_layout_directories() {
    let dir = tempfile::tempdir().unwrap();
    let layout = StorageLayout::under(dir.path());

    // Nothing exists yet; usage is simply zero.
    assert_eq!(
        estimate_storage(&layout, 100),
        StorageStatus::Ok {
            usage_bytes: 0,
            quota_bytes: 100
        }
    );
}

#[test]
fn clock_gates_count_and_storage_cadences() {
    let mut clock = MaintenanceClock::new();

    assert!(clock.count_due(1_000));
    assert!(!clock.count_due(1_000 + COUNT_REFRESH_INTERVAL_MS - 1));
    assert!(clock.count_due(1_000 + COUNT_REFRESH_INTERVAL_MS));

    // The storage check is due immediately at startup.
    assert!(clock.storage_due(0));
    assert!(!clock.storage_due(STORAGE_CHECK_INTERVAL_MS - 1));
    assert!(clock.storage_due(STORAGE_CHECK_INTERVAL_MS));
}

#[test]
fn declined_reset_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let layout = layout_with_dirs(dir.path());
    fs::write(&layout.db_path, b"db").unwrap();
    fs::write(layout.kv_dir.join("prefs.json"), b"{}").unwrap();

    let outcome = reset_storage(&layout, ResetScope::AllDatabases, false);
    assert_eq!(outcome, ResetOutcome::Declined);
    assert!(layout.db_path.exists());
    assert!(layout.kv_dir.join("prefs.json").exists());
}

#[test]
fn confirmed_reset_clears_caches_storages_and_the_named_database() {
    let dir = tempfile::tempdir().unwrap();
    let layout = layout_with_dirs(dir.path());
    fs::write(&layout.db_path, b"db").unwrap();
    fs::write(layout.kv_dir.join("prefs.json"), b"{}").unwrap();
    fs::write(layout.cache_dir.join("asset.bin"), b"cached").unwrap();
    fs::write(layout.data_dir.join("notes.txt"), b"unrelated").unwrap();

    let outcome = reset_storage(&layout, ResetScope::NamedDatabase, true);
    assert_eq!(outcome, ResetOutcome::ReloadNow);

    assert!(!layout.db_path.exists());
    assert!(!layout.kv_dir.join("prefs.json").exists());
    assert!(!layout.cache_dir.join("asset.bin").exists());
    // Non-database files in the data directory are not the reset's
    // business under the named scope.
    assert!(layout.data_dir.join("notes.txt").exists());
}

#[test]
fn broad_reset_deletes_every_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let layout = layout_with_dirs(dir.path());
    fs::write(&layout.db_path, b"db").unwrap();
    fs::write(layout.data_dir.join("legacy.sqlite3"), b"old").unwrap();
    fs::write(layout.data_dir.join("notes.txt"), b"unrelated").unwrap();

    let outcome = reset_storage(&layout, ResetScope::AllDatabases, true);
    assert_eq!(outcome, ResetOutcome::ReloadNow);

    assert!(!layout.db_path.exists());
    assert!(!layout.data_dir.join("legacy.sqlite3").exists());
    assert!(layout.data_dir.join("notes.txt").exists());
}

#[test]
fn broad_reset_falls_back_to_the_named_database() {
    let dir = tempfile::tempdir().unwrap();
    let mut layout = StorageLayout::under(dir.path());
    // Enumeration is impossible: the data directory does not exist. The
    // named database lives elsewhere and must still be removed.
    layout.db_path = dir.path().join("todolite.sqlite3");
    fs::write(&layout.db_path, b"db").unwrap();

    let outcome = reset_storage(&layout, ResetScope::AllDatabases, true);
    assert_eq!(outcome, ResetOutcome::ReloadNow);
    assert!(!layout.db_path.exists());
}

#[test]
fn blocked_database_deletion_forces_a_delayed_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut layout = layout_with_dirs(dir.path());
    // A directory in place of the database file makes the single-file
    // removal fail, standing in for a deletion blocked by another holder.
    layout.db_path = dir.path().join("blocked.sqlite3");
    fs::create_dir_all(&layout.db_path).unwrap();
    fs::write(layout.db_path.join("occupant"), b"x").unwrap();

    let outcome = reset_storage(&layout, ResetScope::NamedDatabase, true);
    assert_eq!(
        outcome,
        ResetOutcome::ForcedReloadAfterMs(BLOCKED_RELOAD_DELAY_MS)
    );
}
