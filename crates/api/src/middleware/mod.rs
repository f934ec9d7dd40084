//! Request extractors for authentication and role checks.

pub mod auth;
pub mod rbac;

pub use auth::AuthUser;
pub use rbac::{RequireAdmin, RequireClient, RequireDesigner};
