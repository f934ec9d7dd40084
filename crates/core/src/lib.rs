//! Atelier domain logic.
//!
//! This crate has zero internal dependencies so the same rules can be used
//! by the repository layer, the API handlers, and any future CLI tooling.

pub mod credits;
pub mod error;
pub mod roles;
pub mod types;
pub mod workflow;
pub mod workload;
