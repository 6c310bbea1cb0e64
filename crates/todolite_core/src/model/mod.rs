//! Domain model for the to-do list.
//!
//! # Responsibility
//! - Define the canonical task record used by all core layers.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId` primary key.
//! - Deletion is a hard single-key removal; there are no tombstones.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod task;
