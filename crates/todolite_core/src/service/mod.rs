//! Use-case services and the session controller.
//!
//! # Responsibility
//! - Orchestrate repository operations for every user-visible action.
//! - Own the transient interaction state (armed click, active edit).
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - A mutation's successful return is the sole trigger for re-rendering.

pub mod edit_mode;
pub mod session;
pub mod task_service;
