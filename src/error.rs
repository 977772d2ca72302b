//! Error type shared by every domain operation.
//!
//! Each variant maps to one recoverable failure class. A failed operation
//! never leaves a partial mutation behind, so callers can correct the input
//! and retry the same call.

use crate::policy::Operation;
use crate::types::Role;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, AuditError>;

/// Errors returned by catalog, audit, plan and session operations.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The acting user's role may not perform the requested operation.
    #[error("permission denied: {role} may not {operation}")]
    Permission {
        /// Operation that was attempted.
        operation: Operation,
        /// Role of the acting user.
        role: Role,
    },

    /// A referenced entity id does not exist in the current collection.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind ("audit", "item", "plan", "user").
        kind: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// Required input is missing, empty or malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The persistence gateway failed to read or write a snapshot.
    #[error("storage error for '{key}': {reason}")]
    Storage {
        /// Snapshot key involved.
        key: String,
        /// Underlying failure description.
        reason: String,
    },
}

impl AuditError {
    /// Shorthand for a [`AuditError::NotFound`] with an owned id.
    pub fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_owned(),
        }
    }

    /// Whether this is a role denial.
    pub fn is_permission(&self) -> bool {
        matches!(self, Self::Permission { .. })
    }

    /// Whether this is an unknown-id failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
