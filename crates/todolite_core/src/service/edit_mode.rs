//! Double-activation gesture detection and inline edit sessions.
//!
//! # Responsibility
//! - Detect two activations of the same label within the fixed window.
//! - Decide, at edit end, whether the new text is worth persisting.
//!
//! # Invariants
//! - Activations on different labels never combine into an edit trigger.
//! - The armed state is cleared on every terminal transition.
//! - Commit writes only when the trimmed text is non-empty and differs
//!   from the original.

use crate::model::task::TaskId;

/// Two activations of the same label within this window enter edit mode.
pub const DOUBLE_ACTIVATION_WINDOW_MS: i64 = 500;

/// Transient record of "which label was activated once, and when".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ArmedClick {
    label: TaskId,
    at_ms: i64,
}

/// Result of feeding one label activation into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// First activation, or re-arm on a different label / elapsed window.
    Armed,
    /// Second activation of the same label inside the window.
    EditRequested,
}

/// Gesture detector owning the armed-click state.
///
/// One controller exists per session; it replaces the ambient
/// last-clicked-element globals of a naive implementation.
#[derive(Debug, Default)]
pub struct EditModeController {
    armed: Option<ArmedClick>,
}

impl EditModeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one label activation into the state machine.
    ///
    /// Timestamps are caller-provided epoch milliseconds so the window
    /// logic stays deterministic under test.
    pub fn label_clicked(&mut self, label: TaskId, now_ms: i64) -> ClickOutcome {
        if let Some(armed) = self.armed.take() {
            if armed.label == label && now_ms - armed.at_ms < DOUBLE_ACTIVATION_WINDOW_MS {
                // `take` above already cleared the armed state.
                return ClickOutcome::EditRequested;
            }
        }

        self.armed = Some(ArmedClick {
            label,
            at_ms: now_ms,
        });
        ClickOutcome::Armed
    }

    /// Clears any armed state. Called on every terminal transition.
    pub fn disarm(&mut self) {
        self.armed = None;
    }

    /// Whether a first activation is currently armed on some label.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

/// Decision taken when an edit session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Persist the new text, then reload the view.
    Save(String),
    /// Reload the view without writing.
    Discard,
}

/// One in-progress inline edit (the `Editing` state).
///
/// Created when the double-activation fires; consumed by `commit` or
/// `cancel`, both of which are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    task_id: TaskId,
    original_text: String,
}

impl EditSession {
    pub fn new(task_id: TaskId, original_text: impl Into<String>) -> Self {
        Self {
            task_id,
            original_text: original_text.into(),
        }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// The label text as it was when the editor opened.
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    /// Ends the edit via the commit key or focus loss.
    ///
    /// Unchanged or empty input discards the edit.
    pub fn commit(self, input: &str) -> EditOutcome {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == self.original_text {
            return EditOutcome::Discard;
        }
        EditOutcome::Save(trimmed.to_string())
    }

    /// Ends the edit via the cancel key.
    pub fn cancel(self) -> EditOutcome {
        EditOutcome::Discard
    }
}
