//! Periodic housekeeping: count refresh, storage estimation, full reset.
//!
//! # Responsibility
//! - Gate the status-display refresh and storage check cadences.
//! - Estimate on-disk usage against the configured quota.
//! - Wipe all local persistent state on explicit confirmation.
//!
//! # Invariants
//! - Estimation failure is never fatal; it degrades to `Unavailable`.
//! - Reset without confirmation has no side effects at all.
//! - A blocked database deletion still ends in a forced reload, after a
//!   fixed delay.

use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Cadence of the task-count status refresh.
pub const COUNT_REFRESH_INTERVAL_MS: i64 = 1_000;
/// Cadence of the storage usage check (also runs once at startup).
pub const STORAGE_CHECK_INTERVAL_MS: i64 = 60_000;
/// Usage above this fraction of quota emits a reset recommendation.
pub const STORAGE_WARN_THRESHOLD: f64 = 0.80;
/// Delay before the forced reload when database deletion is blocked.
pub const BLOCKED_RELOAD_DELAY_MS: u64 = 1_000;

const DB_FILE_EXTENSION: &str = "sqlite3";

/// Where the application keeps its local persistent state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    /// Directory holding every database file.
    pub data_dir: PathBuf,
    /// The named application database.
    pub db_path: PathBuf,
    /// Key-value storage files.
    pub kv_dir: PathBuf,
    /// Cached assets.
    pub cache_dir: PathBuf,
}

impl StorageLayout {
    /// Standard layout under one root directory.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            data_dir: root.join("data"),
            db_path: root.join("data").join(crate::db::DB_FILE_NAME),
            kv_dir: root.join("kv"),
            cache_dir: root.join("cache"),
        }
    }
}

/// Result of one storage estimation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StorageStatus {
    /// Usage is within bounds.
    Ok { usage_bytes: u64, quota_bytes: u64 },
    /// Usage exceeds the warning threshold; recommend a reset.
    NearCapacity { usage_bytes: u64, quota_bytes: u64 },
    /// Estimation capability unavailable (no quota, unreadable layout).
    Unavailable,
}

/// Walks the storage layout and compares usage against the quota.
///
/// Individual unreadable entries are skipped; a quota of zero means the
/// estimator has nothing to compare against and reports `Unavailable`.
pub fn estimate_storage(layout: &StorageLayout, quota_bytes: u64) -> StorageStatus {
    if quota_bytes == 0 {
        return StorageStatus::Unavailable;
    }

    let usage_bytes = dir_size(&layout.data_dir) + dir_size(&layout.kv_dir) + dir_size(&layout.cache_dir);
    let ratio = usage_bytes as f64 / quota_bytes as f64;

    if ratio > STORAGE_WARN_THRESHOLD {
        warn!(
            "event=storage_check module=maintenance status=warn usage_bytes={usage_bytes} quota_bytes={quota_bytes} note=reset_recommended"
        );
        StorageStatus::NearCapacity {
            usage_bytes,
            quota_bytes,
        }
    } else {
        info!(
            "event=storage_check module=maintenance status=ok usage_bytes={usage_bytes} quota_bytes={quota_bytes}"
        );
        StorageStatus::Ok {
            usage_bytes,
            quota_bytes,
        }
    }
}

fn dir_size(dir: &Path) -> u64 {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };

    let mut total = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            total += dir_size(&path);
        } else if let Ok(metadata) = entry.metadata() {
            total += metadata.len();
        }
    }
    total
}

/// Interval gate for the periodic jobs, driven by a caller-provided
/// clock so cadence is testable without timers.
#[derive(Debug, Default)]
pub struct MaintenanceClock {
    last_count_at_ms: Option<i64>,
    last_storage_at_ms: Option<i64>,
}

impl MaintenanceClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the count display should refresh.
    pub fn count_due(&mut self, now_ms: i64) -> bool {
        due(&mut self.last_count_at_ms, now_ms, COUNT_REFRESH_INTERVAL_MS)
    }

    /// True when the storage check should run. Always true on the first
    /// call: the check runs once at startup.
    pub fn storage_due(&mut self, now_ms: i64) -> bool {
        due(
            &mut self.last_storage_at_ms,
            now_ms,
            STORAGE_CHECK_INTERVAL_MS,
        )
    }
}

fn due(last_at_ms: &mut Option<i64>, now_ms: i64, interval_ms: i64) -> bool {
    match *last_at_ms {
        Some(last) if now_ms - last < interval_ms => false,
        _ => {
            *last_at_ms = Some(now_ms);
            true
        }
    }
}

/// How much persistent state the reset removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    /// Delete only the named application database.
    NamedDatabase,
    /// Enumerate and delete every database file in the data directory,
    /// falling back to the named database when enumeration fails.
    AllDatabases,
}

/// Terminal state of a reset attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The user declined the confirmation; nothing was touched.
    Declined,
    /// All state cleared; reload immediately.
    ReloadNow,
    /// Database deletion was blocked; force-reload after the delay.
    ForcedReloadAfterMs(u64),
}

/// Clears caches and key-value storages, then deletes the database(s).
///
/// The caller must have closed its database connection first; an open
/// handle is one way deletion ends up blocked.
pub fn reset_storage(layout: &StorageLayout, scope: ResetScope, confirmed: bool) -> ResetOutcome {
    if !confirmed {
        info!("event=app_reset module=maintenance status=ok note=declined");
        return ResetOutcome::Declined;
    }

    clear_dir_contents(&layout.cache_dir);
    clear_dir_contents(&layout.kv_dir);

    let blocked = match scope {
        ResetScope::NamedDatabase => !delete_db_file(&layout.db_path),
        ResetScope::AllDatabases => !delete_all_db_files(layout),
    };

    if blocked {
        warn!(
            "event=app_reset module=maintenance status=warn note=deletion_blocked delay_ms={BLOCKED_RELOAD_DELAY_MS}"
        );
        return ResetOutcome::ForcedReloadAfterMs(BLOCKED_RELOAD_DELAY_MS);
    }

    info!("event=app_reset module=maintenance status=ok");
    ResetOutcome::ReloadNow
}

fn clear_dir_contents(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let _ = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
    }
}

/// Returns false when an existing file could not be removed.
fn delete_db_file(path: &Path) -> bool {
    if !path.exists() {
        return true;
    }
    fs::remove_file(path).is_ok()
}

/// Returns false when any existing database file could not be removed.
fn delete_all_db_files(layout: &StorageLayout) -> bool {
    let Ok(entries) = fs::read_dir(&layout.data_dir) else {
        // Enumeration unsupported here; fall back to the named database.
        return delete_db_file(&layout.db_path);
    };

    let mut all_ok = true;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_db = path
            .extension()
            .map(|ext| ext == DB_FILE_EXTENSION)
            .unwrap_or(false);
        if is_db && !delete_db_file(&path) {
            all_ok = false;
        }
    }
    all_ok
}
