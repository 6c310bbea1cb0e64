//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define typed data access contracts for the task table.
//! - Isolate SQL details from service/controller orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Task::validate()` before persistence.
//! - Every repository operation is one atomic transaction.

pub mod task_repo;
