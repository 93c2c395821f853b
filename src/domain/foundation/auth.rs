//! Authentication types for the domain layer.
//!
//! An authenticated caller is reduced to a single opaque `UserId` before it
//! reaches the conversation store. Whichever identity provider issued the
//! token, its subject claim becomes the owner id; provider-specific field
//! names never leak past the `SessionValidator` adapter.

use super::UserId;
use thiserror::Error;

/// Caller identity extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Owner id for every conversation the caller touches.
    pub id: UserId,
}

impl AuthenticatedUser {
    pub fn new(id: UserId) -> Self {
        Self { id }
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// The identity provider could not be reached or answered garbage.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}
