//! Task domain model.
//!
//! # Responsibility
//! - Define the single persisted record of the application.
//! - Provide lifecycle helpers for completion and in-place edits.
//!
//! # Invariants
//! - `id` is unique, clock-derived and never reused for another task.
//! - `text` is never persisted empty after trimming (checked via `validate`).
//! - `sort_order` only carries relative meaning; gaps are allowed and a
//!   missing value sorts after every present value.
//!
//! # See also
//! - docs/architecture/data-model.md

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for one task.
///
/// Epoch milliseconds at creation time, nudged forward on same-millisecond
/// collisions so ids stay strictly increasing within a session.
pub type TaskId = i64;

/// Validation failures for task records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// `text` is empty after trimming.
    EmptyText,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text must not be blank"),
        }
    }
}

impl Error for TaskValidationError {}

/// The sole persisted entity: one to-do item.
///
/// Field names on the wire match the persisted schema (`sort_order` is
/// serialized as `order`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store primary key.
    pub id: TaskId,
    /// User-visible label.
    pub text: String,
    /// Completion flag. Toggled, never inferred.
    pub done: bool,
    /// Display position. `None` is treated as "sort last".
    #[serde(rename = "order")]
    pub sort_order: Option<i64>,
}

impl Task {
    /// Creates a new open task at the given display position.
    pub fn new(id: TaskId, text: impl Into<String>, sort_order: i64) -> Self {
        Self {
            id,
            text: text.into(),
            done: false,
            sort_order: Some(sort_order),
        }
    }

    /// Rejects records whose text trims to empty.
    ///
    /// Runs on every write path; the store itself does not enforce this.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(())
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.done = !self.done;
    }

    /// Replaces the label text in place.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Sort key used for display ordering: `sort_order` ascending with
    /// missing values last.
    pub fn order_key(&self) -> i64 {
        self.sort_order.unwrap_or(i64::MAX)
    }
}

/// Sorts a snapshot into display order.
///
/// Stable sort: tasks sharing an order value (or both missing one) keep
/// their store key order.
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by_key(Task::order_key);
}
