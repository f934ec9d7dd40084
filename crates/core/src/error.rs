use crate::types::DbId;

/// Domain-level error type shared by the repository and API layers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A business-rule rejection (capacity exceeded, illegal status
    /// transition, quota exhausted, ...). Carries a machine-readable code
    /// so clients can branch on it without parsing the message.
    #[error("{message}")]
    BusinessRule {
        code: &'static str,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand constructor for [`CoreError::BusinessRule`].
    pub fn business_rule(code: &'static str, message: impl Into<String>) -> Self {
        CoreError::BusinessRule {
            code,
            message: message.into(),
        }
    }
}

// Machine-readable business-rule codes surfaced in 422 responses.
pub const CODE_DESIGNER_AT_CAPACITY: &str = "DESIGNER_AT_CAPACITY";
pub const CODE_DESIGNER_ON_LEAVE: &str = "DESIGNER_ON_LEAVE";
pub const CODE_DESIGNER_INACTIVE: &str = "DESIGNER_INACTIVE";
pub const CODE_PROJECT_ALREADY_ASSIGNED: &str = "PROJECT_ALREADY_ASSIGNED";
pub const CODE_PROJECT_NOT_ASSIGNED_TO_DESIGNER: &str = "PROJECT_NOT_ASSIGNED_TO_DESIGNER";
pub const CODE_INVALID_STATUS_TRANSITION: &str = "INVALID_STATUS_TRANSITION";
pub const CODE_NO_ACTIVE_SUBSCRIPTION: &str = "NO_ACTIVE_SUBSCRIPTION";
pub const CODE_INSUFFICIENT_CREDITS: &str = "INSUFFICIENT_CREDITS";
pub const CODE_NO_DELIVERY: &str = "NO_DELIVERY";
