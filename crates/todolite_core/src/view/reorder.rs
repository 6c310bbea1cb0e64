//! Bridge from the external drag-and-drop collaborator to persistence.
//!
//! # Responsibility
//! - Convert an end-of-drag notification into a persisted order update.
//!
//! # Invariants
//! - The event's indices are informational only; the id sequence is
//!   derived from the live view's row order, never from the indices.
//! - This is the one place row identity order flows from the view into
//!   the repository instead of the other way around: during a drag the
//!   visual arrangement is the source of truth.

use crate::model::task::TaskId;
use crate::repo::task_repo::{ReorderReport, RepoResult, TaskRepository};
use crate::service::task_service::TaskService;
use crate::view::list_view::ListView;
use log::debug;

/// End-of-drag notification from the drag-and-drop collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEnd {
    /// Index the row was picked up from. Informational.
    pub old_index: usize,
    /// Index the row was dropped at. Informational.
    pub new_index: usize,
}

/// Reads the current visual row order and persists it.
///
/// The whole update shares one transaction; the caller re-renders only
/// after it commits.
pub fn persist_visual_order<R: TaskRepository>(
    service: &TaskService<R>,
    view: &ListView,
    event: DragEnd,
) -> RepoResult<ReorderReport> {
    debug!(
        "event=drag_end module=view status=start old_index={} new_index={}",
        event.old_index, event.new_index
    );
    let ids: Vec<TaskId> = view.row_ids();
    service.reorder_tasks(&ids)
}
