use thiserror::Error;

/// Error type for session token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Secure random source unavailable: {0}")]
    RandomSource(String),

    #[error("Token lifetime out of range: {0}")]
    InvalidTtl(String),

    #[error("Invalid token digest: {0}")]
    InvalidDigest(String),
}
