//! View building for the visible task list.
//!
//! # Responsibility
//! - Rebuild the full row list from the ordered snapshot.
//! - Render rows to terminal text for the CLI probe and diagnostics.
//! - Bridge end-of-drag notifications into persisted order updates.
//!
//! # Invariants
//! - Every rebuild discards the previous rows wholesale; there is no
//!   incremental patching.
//! - Displayed order equals persisted order after any committed mutation.

pub mod list_view;
pub mod reorder;
