use std::fmt;

use auth::OpaqueToken;
use auth::TokenDigest;
use auth::TOKEN_LENGTH;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::session::errors::SessionError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

const BEARER_SCHEME: &str = "Bearer";

/// Token unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(pub i64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Persisted session token.
///
/// Carries only the digest of the bearer value. `email` is the owner's
/// address at issuance time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: TokenId,
    pub user_id: UserId,
    pub email: EmailAddress,
    pub digest: TokenDigest,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expiry: DateTime<Utc>,
}

impl Token {
    /// A token stops being accepted at the instant of its expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiry
    }
}

/// Token row ready to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewToken {
    pub user_id: UserId,
    pub digest: TokenDigest,
    pub created_at: DateTime<Utc>,
    pub expiry: DateTime<Utc>,
}

impl NewToken {
    pub fn for_user(user_id: UserId, token: &OpaqueToken) -> Self {
        Self {
            user_id,
            digest: token.digest,
            created_at: token.issued_at,
            expiry: token.expiry,
        }
    }
}

/// Token handed back at login: the only place the bearer value appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub value: String,
    pub token: Token,
}

/// Successful login result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: IssuedToken,
    pub user: User,
}

/// Extract the token from an `Authorization` header value.
///
/// Accepts exactly `Bearer <token>` with a single space and a token of
/// `TOKEN_LENGTH` characters.
///
/// # Errors
/// * `MalformedHeader` - Header is not of the form `Bearer <token>`
/// * `MalformedToken` - Token segment has the wrong length
pub fn parse_bearer(header: &str) -> Result<&str, SessionError> {
    let mut parts = header.split(' ');

    let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => return Err(SessionError::MalformedHeader),
    };

    if scheme != BEARER_SCHEME {
        return Err(SessionError::MalformedHeader);
    }

    check_token_length(token)?;
    Ok(token)
}

/// # Errors
/// * `MalformedToken` - Value is not `TOKEN_LENGTH` characters long
pub fn check_token_length(token: &str) -> Result<(), SessionError> {
    let actual = token.chars().count();
    if actual != TOKEN_LENGTH {
        return Err(SessionError::MalformedToken {
            expected: TOKEN_LENGTH,
            actual,
        });
    }
    Ok(())
}
