//! Session controller: one object owning all per-page interaction state.
//!
//! # Responsibility
//! - Hold the live store handle, the id watermark, the edit-mode
//!   controller and the visible list view for one application session.
//! - Dispatch the per-row interaction hooks to repository operations and
//!   re-pull the snapshot after every committed mutation.
//!
//! # Invariants
//! - The repository is the single source of truth; the view is rebuilt
//!   from a fresh snapshot after each commit and never patched.
//! - Store-open failure disables every write path until a reopen; reads
//!   against an unavailable store yield an empty snapshot silently.
//! - Minted task ids are clock-derived and strictly increasing within
//!   the session.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::db::{open_db, open_db_in_memory};
use crate::maintenance::{
    estimate_storage, reset_storage, MaintenanceClock, ResetOutcome, ResetScope, StorageLayout,
    StorageStatus,
};
use crate::model::task::TaskId;
use crate::repo::task_repo::{ReorderReport, RepoError, SqliteTaskRepository};
use crate::service::edit_mode::{ClickOutcome, EditModeController, EditOutcome, EditSession};
use crate::service::task_service::TaskService;
use crate::view::list_view::{format_task_count, ListView, RowEvent};
use crate::view::reorder::{persist_visual_order, DragEnd};
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Default storage quota compared against on-disk usage: 512 MiB.
pub const DEFAULT_QUOTA_BYTES: u64 = 512 * 1024 * 1024;

/// Where the session's database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Durable file database under the storage layout.
    File(PathBuf),
    /// In-memory database for tests and probes.
    InMemory,
}

/// Startup configuration for one session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub location: StoreLocation,
    pub layout: StorageLayout,
    pub quota_bytes: u64,
}

impl SessionConfig {
    /// File-backed session with the standard layout under `root`.
    pub fn file_under(root: impl Into<PathBuf>) -> Self {
        let layout = StorageLayout::under(root.into());
        Self {
            location: StoreLocation::File(layout.db_path.clone()),
            layout,
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }

    /// In-memory session; maintenance paths still use `root`.
    pub fn in_memory_under(root: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::InMemory,
            layout: StorageLayout::under(root.into()),
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Errors surfaced to the UI surface by session operations.
#[derive(Debug)]
pub enum SessionError {
    /// The store failed to open or was torn down by a reset; the user
    /// must reload to retry.
    StoreUnavailable,
    /// A transaction failed; the view still shows the pre-transaction
    /// state and no retry is attempted.
    Repo(RepoError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreUnavailable => write!(
                f,
                "the task store is still loading or failed to open; reload and try again"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreUnavailable => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for SessionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Result of submitting the new-task input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The add transaction committed; the UI may clear its input field.
    Added(TaskId),
    /// Whitespace-only input; nothing was written and the input field
    /// keeps its content.
    EmptyInput,
}

/// Result of dispatching one row interaction hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowResponse {
    Toggled,
    Deleted,
    /// Label activation armed (or re-armed) the gesture detector.
    EditArmed,
    /// Double activation detected; the UI should swap the label for an
    /// inline editor pre-filled with `original_text`.
    EditStarted { original_text: String },
    /// The event referenced a row no longer in the view.
    Ignored,
}

/// Terminal state of an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEnd {
    Saved,
    Discarded,
}

enum StoreState {
    Ready(Connection),
    Unavailable,
}

/// One application session, created at startup and torn down on reload.
pub struct Session {
    config: SessionConfig,
    store: StoreState,
    last_issued_id: TaskId,
    edit: EditModeController,
    active_edit: Option<EditSession>,
    view: ListView,
    clock: MaintenanceClock,
}

impl Session {
    /// Opens the store and performs the initial snapshot load.
    ///
    /// Open failure does not abort the session: it comes up with an
    /// unavailable store, empty reads and erroring writes, exactly until
    /// the user reloads.
    pub fn open(config: SessionConfig) -> Self {
        let store = match &config.location {
            StoreLocation::File(path) => {
                if let Some(parent) = path.parent() {
                    let _ = std::fs::create_dir_all(parent);
                }
                open_db(path)
            }
            StoreLocation::InMemory => open_db_in_memory(),
        };

        let store = match store {
            Ok(conn) => StoreState::Ready(conn),
            Err(err) => {
                error!("event=session_open module=session status=error error={err}");
                StoreState::Unavailable
            }
        };

        let mut session = Self {
            config,
            store,
            last_issued_id: 0,
            edit: EditModeController::new(),
            active_edit: None,
            view: ListView::new(),
            clock: MaintenanceClock::new(),
        };

        if session.is_store_ready() {
            info!("event=session_open module=session status=ok");
            session.reload();
        }
        session
    }

    /// Whether the store opened successfully and has not been torn down.
    pub fn is_store_ready(&self) -> bool {
        matches!(self.store, StoreState::Ready(_))
    }

    /// The visible list. Empty while the store is unavailable.
    pub fn view(&self) -> &ListView {
        &self.view
    }

    /// Models the drag collaborator rearranging the visible container.
    pub fn apply_visual_move(&mut self, from: usize, to: usize) {
        self.view.apply_visual_move(from, to);
    }

    /// Re-pulls the full snapshot and rebuilds the view from scratch.
    ///
    /// Read failures keep the previous view (stale but intact); an
    /// unavailable store is silently rendered as empty.
    pub fn reload(&mut self) {
        let StoreState::Ready(conn) = &self.store else {
            self.view.clear();
            return;
        };

        let service = TaskService::new(SqliteTaskRepository::new(conn));
        match service.ordered_tasks() {
            Ok(snapshot) => self.view.rebuild(&snapshot),
            Err(err) => {
                error!("event=view_reload module=session status=error error={err}");
            }
        }
    }

    /// Submits the new-task input field.
    ///
    /// The input is cleared by the caller only on `Ok(Added)`: a failed
    /// add transaction must leave the field untouched.
    pub fn submit_new_task(&mut self, input: &str, now_ms: i64) -> SessionResult<AddOutcome> {
        let StoreState::Ready(conn) = &self.store else {
            return Err(SessionError::StoreUnavailable);
        };

        if input.trim().is_empty() {
            return Ok(AddOutcome::EmptyInput);
        }

        let id = next_task_id(&mut self.last_issued_id, now_ms);
        let service = TaskService::new(SqliteTaskRepository::new(conn));
        let task = service.add_task(input, id).map_err(|err| {
            error!("event=task_add module=session status=error id={id} error={err}");
            SessionError::Repo(err)
        })?;

        self.reload();
        Ok(AddOutcome::Added(task.id))
    }

    /// Dispatches one of the three per-row interaction hooks.
    pub fn handle_row_event(
        &mut self,
        id: TaskId,
        event: RowEvent,
        now_ms: i64,
    ) -> SessionResult<RowResponse> {
        match event {
            RowEvent::CheckboxClicked => self.toggle_row(id),
            RowEvent::DeleteClicked => self.delete_row(id),
            RowEvent::LabelClicked => Ok(self.arm_or_edit(id, now_ms)),
        }
    }

    /// Ends the active edit via the commit key or focus loss.
    ///
    /// Persists only when the trimmed input is non-empty and differs from
    /// the original, then forces a full view reload either way.
    pub fn commit_active_edit(&mut self, input: &str) -> SessionResult<EditEnd> {
        let Some(edit) = self.active_edit.take() else {
            return Ok(EditEnd::Discarded);
        };
        self.edit.disarm();

        let task_id = edit.task_id();
        match edit.commit(input) {
            EditOutcome::Save(new_text) => {
                let result = self.persist_edit(task_id, &new_text);
                // The original view is stale either way; reload even when
                // the write failed.
                self.reload();
                result.map(|()| EditEnd::Saved)
            }
            EditOutcome::Discard => {
                self.reload();
                Ok(EditEnd::Discarded)
            }
        }
    }

    /// Ends the active edit via the cancel key; never writes.
    pub fn cancel_active_edit(&mut self) -> EditEnd {
        if let Some(edit) = self.active_edit.take() {
            let _ = edit.cancel();
        }
        self.edit.disarm();
        self.reload();
        EditEnd::Discarded
    }

    /// Whether an inline editor is currently open.
    pub fn has_active_edit(&self) -> bool {
        self.active_edit.is_some()
    }

    /// Reorder bridge entry point: persists the view's current row
    /// identity order, then re-renders.
    pub fn drag_ended(&mut self, event: DragEnd) -> SessionResult<ReorderReport> {
        let StoreState::Ready(conn) = &self.store else {
            return Err(SessionError::StoreUnavailable);
        };

        let service = TaskService::new(SqliteTaskRepository::new(conn));
        let report = persist_visual_order(&service, &self.view, event).map_err(|err| {
            error!("event=task_reorder module=session status=error error={err}");
            SessionError::Repo(err)
        })?;

        self.reload();
        Ok(report)
    }

    /// Status display label from a fresh count read.
    ///
    /// `None` while the store is unavailable or the read fails; the
    /// display keeps its previous content.
    pub fn task_count_label(&self) -> Option<String> {
        let StoreState::Ready(conn) = &self.store else {
            return None;
        };
        let service = TaskService::new(SqliteTaskRepository::new(conn));
        match service.task_count() {
            Ok(count) => Some(format_task_count(count.max(0) as usize)),
            Err(err) => {
                error!("event=task_count module=session status=error error={err}");
                None
            }
        }
    }

    /// Interval-gated count refresh. `None` when the cadence has not
    /// elapsed or the count is unavailable.
    pub fn maybe_refresh_count(&mut self, now_ms: i64) -> Option<String> {
        if !self.clock.count_due(now_ms) {
            return None;
        }
        self.task_count_label()
    }

    /// Interval-gated storage check; also fires on the first call after
    /// startup.
    pub fn maybe_check_storage(&mut self, now_ms: i64) -> Option<StorageStatus> {
        if !self.clock.storage_due(now_ms) {
            return None;
        }
        Some(estimate_storage(&self.config.layout, self.config.quota_bytes))
    }

    /// Confirmation-gated full reset.
    ///
    /// Closes the store handle first so the file deletion is not blocked
    /// by this session itself, then wipes caches, key-value storages and
    /// the database(s). The session is unusable afterwards; the caller
    /// reloads (reopens) regardless of the outcome.
    pub fn reset(&mut self, scope: ResetScope, confirmed: bool) -> ResetOutcome {
        if !confirmed {
            return ResetOutcome::Declined;
        }

        self.store = StoreState::Unavailable;
        self.active_edit = None;
        self.edit.disarm();
        self.view.clear();

        reset_storage(&self.config.layout, scope, true)
    }

    fn toggle_row(&mut self, id: TaskId) -> SessionResult<RowResponse> {
        let StoreState::Ready(conn) = &self.store else {
            return Err(SessionError::StoreUnavailable);
        };
        let Some(row) = self.view.row_by_id(id) else {
            return Ok(RowResponse::Ignored);
        };

        let service = TaskService::new(SqliteTaskRepository::new(conn));
        service.toggle_task(row.task()).map_err(|err| {
            error!("event=task_toggle module=session status=error id={id} error={err}");
            SessionError::Repo(err)
        })?;

        self.reload();
        Ok(RowResponse::Toggled)
    }

    fn delete_row(&mut self, id: TaskId) -> SessionResult<RowResponse> {
        let StoreState::Ready(conn) = &self.store else {
            return Err(SessionError::StoreUnavailable);
        };

        let service = TaskService::new(SqliteTaskRepository::new(conn));
        service.delete_task(id).map_err(|err| {
            error!("event=task_delete module=session status=error id={id} error={err}");
            SessionError::Repo(err)
        })?;

        self.reload();
        Ok(RowResponse::Deleted)
    }

    fn arm_or_edit(&mut self, id: TaskId, now_ms: i64) -> RowResponse {
        let Some(row) = self.view.row_by_id(id) else {
            return RowResponse::Ignored;
        };

        match self.edit.label_clicked(id, now_ms) {
            ClickOutcome::Armed => RowResponse::EditArmed,
            ClickOutcome::EditRequested => {
                let original_text = row.label().to_string();
                self.active_edit = Some(EditSession::new(id, original_text.clone()));
                RowResponse::EditStarted { original_text }
            }
        }
    }

    fn persist_edit(&self, task_id: TaskId, new_text: &str) -> SessionResult<()> {
        let StoreState::Ready(conn) = &self.store else {
            return Err(SessionError::StoreUnavailable);
        };
        let Some(row) = self.view.row_by_id(task_id) else {
            // The row vanished while the editor was open; nothing to
            // write against.
            return Ok(());
        };

        let service = TaskService::new(SqliteTaskRepository::new(conn));
        service.update_task_text(row.task(), new_text).map_err(|err| {
            error!("event=task_edit module=session status=error id={task_id} error={err}");
            SessionError::Repo(err)
        })?;
        Ok(())
    }
}

/// Clock-derived id, nudged forward so ids stay strictly increasing even
/// under same-millisecond adds.
fn next_task_id(last_issued: &mut TaskId, now_ms: i64) -> TaskId {
    let id = now_ms.max(*last_issued + 1);
    *last_issued = id;
    id
}
