//! Entity models and DTOs.
//!
//! Each submodule defines the `FromRow` struct for one table plus the
//! Create/Update DTOs the repositories accept.

pub mod assignment;
pub mod designer;
pub mod notification;
pub mod project;
pub mod subscription;
