//! UI-facing bridge crate for the todolite core.
//!
//! The embedding UI calls into [`api`] for every user gesture; no other
//! surface of this crate is stable.

pub mod api;
