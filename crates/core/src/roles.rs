//! Well-known role name constants.
//!
//! These must match the role strings embedded in JWT claims.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CLIENT: &str = "client";
pub const ROLE_DESIGNER: &str = "designer";
