//! Full-rebuild list view and its text rendering.
//!
//! # Responsibility
//! - Materialize one row per task from the order-sorted snapshot.
//! - Expose the three per-row interaction hooks as typed events.
//!
//! # Invariants
//! - `rebuild` replaces the entire row list; stale rows never survive a
//!   mutation. Task counts are small, so the wholesale rebuild is a
//!   deliberate simplicity-over-efficiency tradeoff.
//! - Row order is exactly the order of the snapshot handed in.

use crate::model::task::{Task, TaskId};

/// Glyph rendered for the reorder-drag affordance.
pub const DRAG_HANDLE: &str = "≡";
/// Glyph rendered for the delete affordance.
pub const DELETE_MARK: &str = "✕";

/// The three interaction hooks bound to every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEvent {
    /// Checkbox click: toggle completion.
    CheckboxClicked,
    /// Delete affordance click: remove the task.
    DeleteClicked,
    /// Label click: feed the edit-mode gesture detector.
    LabelClicked,
}

/// One visible row, carrying the snapshot record it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    task: Task,
}

impl TaskRow {
    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn id(&self) -> TaskId {
        self.task.id
    }

    pub fn label(&self) -> &str {
        &self.task.text
    }

    pub fn done(&self) -> bool {
        self.task.done
    }

    /// Strikethrough styling applies iff the task is done.
    pub fn struck(&self) -> bool {
        self.task.done
    }
}

/// The visible list container.
#[derive(Debug, Default)]
pub struct ListView {
    rows: Vec<TaskRow>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards all rows and rebuilds them from the ordered snapshot.
    pub fn rebuild(&mut self, snapshot: &[Task]) {
        self.rows.clear();
        self.rows.extend(
            snapshot
                .iter()
                .map(|task| TaskRow { task: task.clone() }),
        );
    }

    /// Drops every row (used when the store becomes unavailable).
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_by_id(&self, id: TaskId) -> Option<&TaskRow> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Row identity order as currently displayed.
    pub fn row_ids(&self) -> Vec<TaskId> {
        self.rows.iter().map(TaskRow::id).collect()
    }

    /// Models the drag collaborator rearranging the container: the row at
    /// `from` is re-inserted at `to`. Out-of-range indices are clamped.
    pub fn apply_visual_move(&mut self, from: usize, to: usize) {
        if self.rows.is_empty() || from >= self.rows.len() {
            return;
        }
        let row = self.rows.remove(from);
        let to = to.min(self.rows.len());
        self.rows.insert(to, row);
    }
}

/// Renders rows to terminal lines.
///
/// `decorate` gates ANSI styling, mirroring a color on/off switch; with
/// decoration off the output is plain text for logs and tests.
#[derive(Debug, Clone, Copy)]
pub struct ListRenderer {
    decorate: bool,
}

impl ListRenderer {
    pub fn new(decorate: bool) -> Self {
        Self { decorate }
    }

    /// One line per row: drag handle, checkbox, label, delete mark.
    pub fn render_lines(&self, view: &ListView) -> Vec<String> {
        view.rows()
            .iter()
            .map(|row| {
                let checkbox = if row.done() { "[x]" } else { "[ ]" };
                let label = if row.struck() && self.decorate {
                    format!("\x1b[9m{}\x1b[0m", row.label())
                } else {
                    row.label().to_string()
                };
                format!("{DRAG_HANDLE} {checkbox} {label} {DELETE_MARK}")
            })
            .collect()
    }
}

/// Status display label: pluralizes the unit iff the count is not 1.
pub fn format_task_count(count: usize) -> String {
    if count == 1 {
        "1 task".to_string()
    } else {
        format!("{count} tasks")
    }
}
