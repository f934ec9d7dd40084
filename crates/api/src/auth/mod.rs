//! JWT token handling.
//!
//! Token issuance (login/refresh) is outside this service; the identity
//! collaborator mints tokens with the shared secret and this crate only
//! validates them and extracts `(caller id, caller role)`.

pub mod jwt;
