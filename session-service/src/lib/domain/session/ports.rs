use async_trait::async_trait;
use auth::TokenDigest;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::LoginOutcome;
use crate::domain::session::models::NewToken;
use crate::domain::session::models::Token;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PlaintextPassword;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for session operations.
#[async_trait]
pub trait AuthenticationPort: Send + Sync + 'static {
    /// Verify credentials and issue a new session token.
    ///
    /// Earlier tokens of the same user stay valid; a user may hold several
    /// concurrent sessions.
    ///
    /// # Errors
    /// * `UnknownEmail` - No user with this email
    /// * `InvalidCredentials` - Password does not match
    /// * `InactiveAccount` - User is deactivated
    /// * `Password` - Stored digest is malformed
    /// * `Token` - Random source failed
    /// * `Storage` - Database operation failed or timed out
    async fn login(
        &self,
        email: &EmailAddress,
        password: &PlaintextPassword,
    ) -> Result<LoginOutcome, SessionError>;

    /// Delete the session of a token. Absent tokens are not an error.
    ///
    /// # Errors
    /// * `InvalidInput` - Token is empty
    /// * `Storage` - Database operation failed or timed out
    async fn logout(&self, token: &str) -> Result<(), SessionError>;

    /// Resolve an `Authorization` header value to the active user it names.
    ///
    /// # Errors
    /// * `MalformedHeader` - Header is not `Bearer <token>`
    /// * `MalformedToken` - Token has the wrong length
    /// * `TokenNotFound` - No session for this token
    /// * `TokenExpired` - Session expired
    /// * `OwnerNotFound` - Token references a missing user
    /// * `InactiveAccount` - User is deactivated
    /// * `Storage` - Database operation failed or timed out
    async fn authenticate(&self, authorization: &str) -> Result<User, SessionError>;

    /// Yes/no validity of a bearer token value, without side effects.
    ///
    /// # Errors
    /// * `Storage` - Database operation failed or timed out
    async fn validate_token(&self, token: &str) -> Result<bool, SessionError>;

    /// Delete every session of a user.
    ///
    /// # Returns
    /// Number of sessions removed
    async fn revoke_all_sessions(&self, user_id: &UserId) -> Result<u64, SessionError>;
}

/// Persistence operations for session tokens.
///
/// Tokens are addressed by the digest of their bearer value.
#[async_trait]
pub trait TokenRepository: Send + Sync + 'static {
    /// Persist a token for its owner.
    ///
    /// # Errors
    /// * `Storage` - Constraint violation, failure or timeout
    async fn insert(&self, token: NewToken, owner_email: &EmailAddress)
        -> Result<Token, SessionError>;

    /// Retrieve a token regardless of its expiry.
    ///
    /// # Errors
    /// * `TokenNotFound` - No token with this digest
    /// * `Storage` - Database operation failed or timed out
    async fn get_by_token(&self, digest: &TokenDigest) -> Result<Token, SessionError>;

    /// Delete one token; deleting an absent token succeeds.
    async fn delete_by_token(&self, digest: &TokenDigest) -> Result<(), SessionError>;

    /// Delete all tokens of a user, returning how many were removed.
    async fn delete_all_for_user(&self, user_id: &UserId) -> Result<u64, SessionError>;

    /// Whether the token exists, is unexpired at `now` and has an active owner.
    async fn valid_token(
        &self,
        digest: &TokenDigest,
        now: DateTime<Utc>,
    ) -> Result<bool, SessionError>;
}
