//! Task use-case service.
//!
//! # Responsibility
//! - Provide the five list operations (list, add, toggle, edit, delete,
//!   reorder) on top of the repository contract.
//! - Enforce input trimming and ordering assignment at the service
//!   boundary.
//!
//! # Invariants
//! - Add reads the current count strictly before the dependent insert;
//!   the new record's position is that count.
//! - Toggle and edit write the full record back (overwrite, not patch).
//! - Service APIs never bypass repository validation.

use crate::model::task::{sort_for_display, Task, TaskId, TaskValidationError};
use crate::repo::task_repo::{ReorderReport, RepoError, RepoResult, TaskRepository};
use log::info;

/// Use-case service wrapper for task operations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the full snapshot sorted for display: `sort_order`
    /// ascending, missing values last, ties in store key order.
    pub fn ordered_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut tasks = self.repo.list_tasks()?;
        sort_for_display(&mut tasks);
        Ok(tasks)
    }

    /// Current number of stored tasks.
    pub fn task_count(&self) -> RepoResult<i64> {
        self.repo.count_tasks()
    }

    /// Adds a new task with the given pre-minted id.
    ///
    /// # Contract
    /// - Rejects text that trims to empty (`Validation(EmptyText)`).
    /// - Reads the current count in its own transaction, then inserts the
    ///   record with `sort_order = count` in a second transaction; the
    ///   count read strictly precedes the insert.
    pub fn add_task(&self, text: &str, id: TaskId) -> RepoResult<Task> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RepoError::Validation(TaskValidationError::EmptyText));
        }

        let count = self.repo.count_tasks()?;
        let task = Task::new(id, trimmed, count);
        self.repo.insert_task(&task)?;
        info!("event=task_add module=service status=ok id={id} order={count}");
        Ok(task)
    }

    /// Flips `done` on the given snapshot record and writes the full
    /// record back.
    pub fn toggle_task(&self, task: &Task) -> RepoResult<Task> {
        let mut updated = task.clone();
        updated.toggle();
        self.repo.put_task(&updated)?;
        info!(
            "event=task_toggle module=service status=ok id={} done={}",
            updated.id, updated.done
        );
        Ok(updated)
    }

    /// Replaces the label text of the given snapshot record in place.
    ///
    /// Callers decide whether the edit is worth persisting; this method
    /// always writes.
    pub fn update_task_text(&self, task: &Task, new_text: &str) -> RepoResult<Task> {
        let mut updated = task.clone();
        updated.set_text(new_text);
        self.repo.put_task(&updated)?;
        info!("event=task_edit module=service status=ok id={}", updated.id);
        Ok(updated)
    }

    /// Removes a task by key. Missing ids are a store-level no-op.
    pub fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        self.repo.delete_task(id)?;
        info!("event=task_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Persists the given visual id sequence as the new display order.
    pub fn reorder_tasks(&self, ids: &[TaskId]) -> RepoResult<ReorderReport> {
        let report = self.repo.reorder_tasks(ids)?;
        info!(
            "event=task_reorder module=service status=ok updated={} skipped={}",
            report.updated, report.skipped
        );
        Ok(report)
    }
}
