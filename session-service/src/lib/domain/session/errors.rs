use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;

use crate::domain::errors::StorageError;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Error for login, logout and bearer token authentication.
///
/// Variants stay distinct for logging and tests; the HTTP layer collapses
/// every credential and token failure into one generic response.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No user registered with email: {0}")]
    UnknownEmail(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User account is inactive: {0}")]
    InactiveAccount(UserId),

    #[error("Malformed authorization header")]
    MalformedHeader,

    #[error("Malformed token: expected {expected} characters, got {actual}")]
    MalformedToken { expected: usize, actual: usize },

    #[error("Token not found")]
    TokenNotFound,

    #[error("Token expired at {0}")]
    TokenExpired(DateTime<Utc>),

    #[error("Token owner not found: {0}")]
    OwnerNotFound(UserId),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] auth::TokenError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SessionError {
    /// Whether this is a credential or token rejection rather than a fault.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            SessionError::UnknownEmail(_)
                | SessionError::InvalidCredentials
                | SessionError::InactiveAccount(_)
                | SessionError::MalformedHeader
                | SessionError::MalformedToken { .. }
                | SessionError::TokenNotFound
                | SessionError::TokenExpired(_)
                | SessionError::OwnerNotFound(_)
        )
    }
}

impl From<UserError> for SessionError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Storage(e) => SessionError::Storage(e),
            UserError::Password(e) => SessionError::Password(e),
            other => SessionError::Internal(other.to_string()),
        }
    }
}
