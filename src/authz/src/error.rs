//! Error types for the authorization core

use crate::guard::Requirement;
use thiserror::Error;

/// Authorization failures
///
/// `SessionLookup` is deliberately distinct from `Unauthorized`: an
/// identity-source outage must surface as a 5xx upstream, never as a
/// misleading 401/403.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// No session/identity present
    #[error("authentication required")]
    Unauthorized,

    /// Session present but the requirement is not satisfied
    #[error("forbidden: missing {0}")]
    Forbidden(Requirement),

    /// The identity source itself failed
    #[error("session lookup failed: {0}")]
    SessionLookup(String),
}

impl AuthzError {
    /// The missing requirement, when this is a `Forbidden` failure.
    pub fn missing_requirement(&self) -> Option<&Requirement> {
        match self {
            AuthzError::Forbidden(requirement) => Some(requirement),
            _ => None,
        }
    }
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
