//! Core domain logic for the todolite to-do list.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod maintenance;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use maintenance::{ResetOutcome, ResetScope, StorageLayout, StorageStatus};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use repo::task_repo::{
    ReorderReport, RepoError, RepoResult, SqliteTaskRepository, TaskRepository,
};
pub use service::edit_mode::{
    ClickOutcome, EditModeController, EditOutcome, EditSession, DOUBLE_ACTIVATION_WINDOW_MS,
};
pub use service::session::{
    AddOutcome, EditEnd, RowResponse, Session, SessionConfig, SessionError, StoreLocation,
};
pub use service::task_service::TaskService;
pub use view::list_view::{format_task_count, ListRenderer, ListView, RowEvent, TaskRow};
pub use view::reorder::DragEnd;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
