//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

#[derive(Debug)]
pub enum DomainError {
    /// Credential missing, malformed, expired, or signed with an unknown key
    Unauthenticated,
    /// Credential valid but its subject no longer resolves to a user
    UnknownPrincipal,
    /// Target entity absent
    NotFound,
    /// Malformed input with message
    Validation(String),
    /// Persistence layer unreachable or erroring
    Store(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::Unauthenticated => write!(f, "Authentication required"),
            DomainError::UnknownPrincipal => write!(f, "Unknown principal"),
            DomainError::NotFound => write!(f, "Resource not found"),
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Store(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used at the persistence boundary)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Store(e.to_string())
    }
}
