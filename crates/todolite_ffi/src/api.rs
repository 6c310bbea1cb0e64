//! FFI use-case API for UI-facing calls.
//!
//! # Responsibility
//! - Expose stable, gesture-level functions to the embedding UI via FRB.
//! - Own the process-wide session object and its lifetime.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The session is created lazily on first use and replaced wholesale
//!   by `reload_session` (the page-reload analog).
//! - Mutation responses carry `ok` + message; the UI clears its input
//!   field only when the add response says so.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};
use todolite_core::maintenance::{ResetOutcome, ResetScope, StorageStatus};
use todolite_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AddOutcome, DragEnd, EditEnd, RowEvent, RowResponse, Session, SessionConfig,
};

static SESSION: OnceLock<Mutex<Option<Session>>> = OnceLock::new();
static STORE_ROOT: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One visible row as the UI renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiTaskRow {
    /// Store key carried on the row for event dispatch.
    pub id: i64,
    /// Label text.
    pub text: String,
    /// Checkbox state.
    pub done: bool,
    /// Whether the label renders struck through.
    pub struck: bool,
}

/// Generic action response envelope for command flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiActionResponse {
    /// Whether the operation committed.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl UiActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Response to submitting the new-task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiSubmitResponse {
    /// Whether the add transaction committed.
    pub ok: bool,
    /// The UI clears its input field iff this is set.
    pub clear_input: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Response to a label activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiClickResponse {
    /// True when the double activation fired and an editor should open.
    pub entered_edit: bool,
    /// Editor prefill; set iff `entered_edit`.
    pub original_text: Option<String>,
}

/// One storage estimation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiStorageReport {
    /// False when the estimation capability is unavailable.
    pub available: bool,
    /// True when usage exceeds the warning share of quota.
    pub near_capacity: bool,
    pub usage_bytes: u64,
    pub quota_bytes: u64,
    /// Recommendation text for the warning banner, empty otherwise.
    pub message: String,
}

/// Terminal state of a reset request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiResetResponse {
    /// False when the confirmation was declined.
    pub performed: bool,
    /// Set when database deletion was blocked: reload after this delay.
    pub forced_reload_delay_ms: Option<u64>,
    pub message: String,
}

/// Returns the visible rows in display order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Empty while the store is unavailable.
#[flutter_rust_bridge::frb(sync)]
pub fn list_rows() -> Vec<UiTaskRow> {
    with_session(|session| {
        session
            .view()
            .rows()
            .iter()
            .map(|row| UiTaskRow {
                id: row.id(),
                text: row.label().to_string(),
                done: row.done(),
                struck: row.struck(),
            })
            .collect()
    })
}

/// Submits the new-task input field.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - `clear_input` is set only when the add transaction committed;
///   whitespace-only input is ignored without clearing.
#[flutter_rust_bridge::frb(sync)]
pub fn submit_task(text: String, now_ms: i64) -> UiSubmitResponse {
    with_session(|session| match session.submit_new_task(&text, now_ms) {
        Ok(AddOutcome::Added(id)) => UiSubmitResponse {
            ok: true,
            clear_input: true,
            message: format!("Task {id} created."),
        },
        Ok(AddOutcome::EmptyInput) => UiSubmitResponse {
            ok: true,
            clear_input: false,
            message: String::new(),
        },
        Err(err) => UiSubmitResponse {
            ok: false,
            clear_input: false,
            message: format!("submit_task failed: {err}"),
        },
    })
}

/// Row checkbox hook: toggles completion.
///
/// # FFI contract
/// - Sync call, DB-backed execution; never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn checkbox_clicked(id: i64) -> UiActionResponse {
    with_session(
        |session| match session.handle_row_event(id, RowEvent::CheckboxClicked, 0) {
            Ok(RowResponse::Toggled) => UiActionResponse::success("Task toggled."),
            Ok(_) => UiActionResponse::success("Row no longer present."),
            Err(err) => UiActionResponse::failure(format!("checkbox_clicked failed: {err}")),
        },
    )
}

/// Row delete hook: removes the task.
///
/// # FFI contract
/// - Sync call, DB-backed execution; never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_clicked(id: i64) -> UiActionResponse {
    with_session(
        |session| match session.handle_row_event(id, RowEvent::DeleteClicked, 0) {
            Ok(RowResponse::Deleted) => UiActionResponse::success("Task deleted."),
            Ok(_) => UiActionResponse::success("Row no longer present."),
            Err(err) => UiActionResponse::failure(format!("delete_clicked failed: {err}")),
        },
    )
}

/// Row label hook: feeds the double-activation gesture detector.
///
/// `now_ms` is the UI's activation timestamp in epoch milliseconds; the
/// 500 ms window is evaluated against it.
///
/// # FFI contract
/// - Sync call; never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn label_clicked(id: i64, now_ms: i64) -> UiClickResponse {
    with_session(
        |session| match session.handle_row_event(id, RowEvent::LabelClicked, now_ms) {
            Ok(RowResponse::EditStarted { original_text }) => UiClickResponse {
                entered_edit: true,
                original_text: Some(original_text),
            },
            _ => UiClickResponse {
                entered_edit: false,
                original_text: None,
            },
        },
    )
}

/// Ends the open editor via commit key or focus loss.
///
/// # FFI contract
/// - Sync call, DB-backed execution; never panics.
/// - Unchanged or empty input discards without writing; the view is
///   reloaded either way.
#[flutter_rust_bridge::frb(sync)]
pub fn commit_edit(text: String) -> UiActionResponse {
    with_session(|session| match session.commit_active_edit(&text) {
        Ok(EditEnd::Saved) => UiActionResponse::success("Task updated."),
        Ok(EditEnd::Discarded) => UiActionResponse::success("Edit discarded."),
        Err(err) => UiActionResponse::failure(format!("commit_edit failed: {err}")),
    })
}

/// Ends the open editor via the cancel key; never writes.
///
/// # FFI contract
/// - Sync call; never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn cancel_edit() -> UiActionResponse {
    with_session(|session| {
        session.cancel_active_edit();
        UiActionResponse::success("Edit discarded.")
    })
}

/// End-of-drag notification from the UI's drag-and-drop collaborator.
///
/// The indices describe the collaborator's container mutation, which is
/// mirrored into the session view first; the persisted order is then
/// derived from the view's row identity order, not from the indices.
///
/// # FFI contract
/// - Sync call, DB-backed execution; never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn drag_ended(old_index: u32, new_index: u32) -> UiActionResponse {
    with_session(|session| {
        session.apply_visual_move(old_index as usize, new_index as usize);
        match session.drag_ended(DragEnd {
            old_index: old_index as usize,
            new_index: new_index as usize,
        }) {
            Ok(report) => {
                UiActionResponse::success(format!("Order saved for {} task(s).", report.updated))
            }
            Err(err) => UiActionResponse::failure(format!("drag_ended failed: {err}")),
        }
    })
}

/// Interval-gated refresh of the task-count status display.
///
/// Returns the new label when the cadence elapsed and the count is
/// readable, `None` otherwise (the display keeps its content).
///
/// # FFI contract
/// - Sync call, DB-backed execution; never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn refresh_count_display(now_ms: i64) -> Option<String> {
    with_session(|session| session.maybe_refresh_count(now_ms))
}

/// Interval-gated storage estimation (also fires once at startup).
///
/// # FFI contract
/// - Sync call; never panics. Estimation failure degrades to
///   `available = false`, never an error.
#[flutter_rust_bridge::frb(sync)]
pub fn check_storage(now_ms: i64) -> Option<UiStorageReport> {
    with_session(|session| {
        session.maybe_check_storage(now_ms).map(|status| match status {
            StorageStatus::Ok {
                usage_bytes,
                quota_bytes,
            } => UiStorageReport {
                available: true,
                near_capacity: false,
                usage_bytes,
                quota_bytes,
                message: String::new(),
            },
            StorageStatus::NearCapacity {
                usage_bytes,
                quota_bytes,
            } => UiStorageReport {
                available: true,
                near_capacity: true,
                usage_bytes,
                quota_bytes,
                message: "Storage is over 80% full; consider resetting the app.".to_string(),
            },
            StorageStatus::Unavailable => UiStorageReport {
                available: false,
                near_capacity: false,
                usage_bytes: 0,
                quota_bytes: 0,
                message: String::new(),
            },
        })
    })
}

/// Confirmation-gated full reset of all local persistent state.
///
/// `everything` widens the scope to every database file in the data
/// directory (with a named-database fallback).
///
/// # FFI contract
/// - Sync call; never panics.
/// - After a performed reset the UI must reload (`reload_session`),
///   immediately or after the returned delay.
#[flutter_rust_bridge::frb(sync)]
pub fn reset_app(confirmed: bool, everything: bool) -> UiResetResponse {
    let scope = if everything {
        ResetScope::AllDatabases
    } else {
        ResetScope::NamedDatabase
    };
    with_session(|session| match session.reset(scope, confirmed) {
        ResetOutcome::Declined => UiResetResponse {
            performed: false,
            forced_reload_delay_ms: None,
            message: "Reset declined.".to_string(),
        },
        ResetOutcome::ReloadNow => UiResetResponse {
            performed: true,
            forced_reload_delay_ms: None,
            message: "All local data cleared.".to_string(),
        },
        ResetOutcome::ForcedReloadAfterMs(delay_ms) => UiResetResponse {
            performed: true,
            forced_reload_delay_ms: Some(delay_ms),
            message: "Database deletion was blocked; reloading shortly.".to_string(),
        },
    })
}

/// Replaces the process-wide session with a freshly opened one.
///
/// This is the page-reload analog: called after a reset or when the UI
/// wants to retry a failed store open. Returns whether the new store is
/// ready.
///
/// # FFI contract
/// - Sync call, DB-backed execution; never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn reload_session() -> bool {
    let mut guard = session_guard();
    let session = Session::open(SessionConfig::file_under(resolve_store_root()));
    let ready = session.is_store_ready();
    *guard = Some(session);
    log::info!("event=session_reload module=ffi status=ok ready={ready}");
    ready
}

fn resolve_store_root() -> PathBuf {
    STORE_ROOT
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("TODOLITE_DATA_DIR") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join("todolite")
        })
        .clone()
}

fn session_guard() -> MutexGuard<'static, Option<Session>> {
    let mutex = SESSION.get_or_init(|| Mutex::new(None));
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn with_session<T>(f: impl FnOnce(&mut Session) -> T) -> T {
    let mut guard = session_guard();
    let session = guard
        .get_or_insert_with(|| Session::open(SessionConfig::file_under(resolve_store_root())));
    f(session)
}

#[cfg(test)]
mod tests {
    use super::{
        cancel_edit, checkbox_clicked, core_version, delete_clicked, init_logging, label_clicked,
        list_rows, ping, refresh_count_display, reset_app, submit_task,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    fn now_ms() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_millis() as i64
    }

    fn unique_token(prefix: &str) -> String {
        format!("{prefix}-{}", now_ms())
    }

    fn row_id_by_text(text: &str) -> i64 {
        list_rows()
            .into_iter()
            .find(|row| row.text == text)
            .expect("submitted row should be listed")
            .id
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn submit_lists_and_clear_input_flag_roundtrip() {
        let token = unique_token("ffi-submit");
        let response = submit_task(token.clone(), now_ms());
        assert!(response.ok, "{}", response.message);
        assert!(response.clear_input);

        let row_id = row_id_by_text(&token);
        assert!(row_id > 0);
    }

    #[test]
    fn blank_submit_keeps_input() {
        let response = submit_task("   ".to_string(), now_ms());
        assert!(response.ok);
        assert!(!response.clear_input);
    }

    #[test]
    fn checkbox_toggles_row_state() {
        let token = unique_token("ffi-toggle");
        submit_task(token.clone(), now_ms());
        let id = row_id_by_text(&token);

        let response = checkbox_clicked(id);
        assert!(response.ok, "{}", response.message);

        let row = list_rows()
            .into_iter()
            .find(|row| row.id == id)
            .expect("toggled row should still be listed");
        assert!(row.done);
        assert!(row.struck);
    }

    #[test]
    fn delete_removes_row() {
        let token = unique_token("ffi-delete");
        submit_task(token.clone(), now_ms());
        let id = row_id_by_text(&token);

        let response = delete_clicked(id);
        assert!(response.ok, "{}", response.message);
        assert!(list_rows().into_iter().all(|row| row.id != id));
    }

    #[test]
    fn double_label_click_opens_and_cancel_discards() {
        let token = unique_token("ffi-edit");
        submit_task(token.clone(), now_ms());
        let id = row_id_by_text(&token);

        let base = now_ms();
        let first = label_clicked(id, base);
        assert!(!first.entered_edit);

        let second = label_clicked(id, base + 100);
        assert!(second.entered_edit);
        assert_eq!(second.original_text.as_deref(), Some(token.as_str()));

        let response = cancel_edit();
        assert!(response.ok);
        assert_eq!(row_id_by_text(&token), id);
    }

    #[test]
    fn count_display_refresh_is_interval_gated() {
        submit_task(unique_token("ffi-count"), now_ms());

        let base = now_ms();
        let first = refresh_count_display(base);
        if let Some(label) = first {
            assert!(label.ends_with("task") || label.ends_with("tasks"));
        }
        // Immediately asking again is always inside the cadence.
        assert!(refresh_count_display(base).is_none());
    }

    #[test]
    fn declined_reset_performs_nothing() {
        let token = unique_token("ffi-reset");
        submit_task(token.clone(), now_ms());

        let response = reset_app(false, true);
        assert!(!response.performed);
        assert!(response.forced_reload_delay_ms.is_none());

        // The store and its rows are untouched.
        assert!(list_rows().into_iter().any(|row| row.text == token));
    }
}
