use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenDigest;
use auth::TokenGenerator;
use chrono::Duration;
use chrono::Utc;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::check_token_length;
use crate::domain::session::models::parse_bearer;
use crate::domain::session::models::IssuedToken;
use crate::domain::session::models::LoginOutcome;
use crate::domain::session::models::NewToken;
use crate::domain::session::ports::AuthenticationPort;
use crate::domain::session::ports::TokenRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PlaintextPassword;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::ports::UserRepository;

/// Session lifetime for interactive logins.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Domain service for login, logout and bearer token authentication.
///
/// Every lookup goes to the repositories; nothing is cached between calls.
pub struct AuthenticationService<UR, TR>
where
    UR: UserRepository,
    TR: TokenRepository,
{
    users: Arc<UR>,
    tokens: Arc<TR>,
    password_hasher: PasswordHasher,
    token_generator: TokenGenerator,
    token_ttl: Duration,
}

impl<UR, TR> AuthenticationService<UR, TR>
where
    UR: UserRepository,
    TR: TokenRepository,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `tokens` - Token persistence implementation
    /// * `password_hasher` - Verifier for stored digests
    /// * `token_ttl` - Lifetime of issued tokens
    pub fn new(
        users: Arc<UR>,
        tokens: Arc<TR>,
        password_hasher: PasswordHasher,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            tokens,
            password_hasher,
            token_generator: TokenGenerator::new(),
            token_ttl,
        }
    }

    /// Verification runs on the blocking pool.
    async fn verify_password(
        &self,
        password: &PlaintextPassword,
        user: &User,
    ) -> Result<bool, SessionError> {
        let password_hasher = self.password_hasher.clone();
        let plaintext = password.expose().to_owned();
        let digest = user.password_digest.as_str().to_owned();

        let verified =
            tokio::task::spawn_blocking(move || password_hasher.verify(&plaintext, &digest))
                .await
                .map_err(|e| SessionError::Internal(e.to_string()))??;

        Ok(verified)
    }

    async fn try_login(
        &self,
        email: &EmailAddress,
        password: &PlaintextPassword,
    ) -> Result<LoginOutcome, SessionError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| SessionError::UnknownEmail(email.to_string()))?;

        if !self.verify_password(password, &user).await? {
            return Err(SessionError::InvalidCredentials);
        }

        if !user.active {
            return Err(SessionError::InactiveAccount(user.id));
        }

        let generated = self.token_generator.generate(self.token_ttl)?;
        let token = self
            .tokens
            .insert(NewToken::for_user(user.id, &generated), &user.email)
            .await?;

        Ok(LoginOutcome {
            token: IssuedToken {
                value: generated.value,
                token,
            },
            user,
        })
    }

    async fn try_authenticate(&self, authorization: &str) -> Result<User, SessionError> {
        let value = parse_bearer(authorization)?;

        let token = self.tokens.get_by_token(&TokenDigest::of(value)).await?;

        if token.is_expired_at(Utc::now()) {
            return Err(SessionError::TokenExpired(token.expiry));
        }

        let user = self
            .users
            .find_by_id(&token.user_id)
            .await?
            .ok_or(SessionError::OwnerNotFound(token.user_id))?;

        if !user.active {
            return Err(SessionError::InactiveAccount(user.id));
        }

        Ok(user)
    }
}

#[async_trait]
impl<UR, TR> AuthenticationPort for AuthenticationService<UR, TR>
where
    UR: UserRepository,
    TR: TokenRepository,
{
    async fn login(
        &self,
        email: &EmailAddress,
        password: &PlaintextPassword,
    ) -> Result<LoginOutcome, SessionError> {
        let outcome = self.try_login(email, password).await;

        match &outcome {
            Ok(login) => tracing::info!(
                user_id = %login.user.id,
                token_id = %login.token.token.id,
                expiry = %login.token.token.expiry,
                "Session issued"
            ),
            Err(e) if e.is_authentication_failure() => {
                tracing::warn!(email = %email, reason = %e, "Login rejected")
            }
            Err(e) => tracing::error!(email = %email, error = %e, "Login failed"),
        }

        outcome
    }

    async fn logout(&self, token: &str) -> Result<(), SessionError> {
        if token.is_empty() {
            return Err(SessionError::InvalidInput("token must not be empty".to_string()));
        }

        self.tokens.delete_by_token(&TokenDigest::of(token)).await?;
        tracing::debug!("Session deleted");
        Ok(())
    }

    async fn authenticate(&self, authorization: &str) -> Result<User, SessionError> {
        let result = self.try_authenticate(authorization).await;

        match &result {
            Ok(user) => tracing::debug!(user_id = %user.id, "Request authenticated"),
            Err(e) if e.is_authentication_failure() => {
                tracing::warn!(reason = %e, "Bearer token rejected")
            }
            Err(e) => tracing::error!(error = %e, "Bearer token authentication failed"),
        }

        result
    }

    async fn validate_token(&self, token: &str) -> Result<bool, SessionError> {
        if check_token_length(token).is_err() {
            return Ok(false);
        }

        self.tokens
            .valid_token(&TokenDigest::of(token), Utc::now())
            .await
    }

    async fn revoke_all_sessions(&self, user_id: &UserId) -> Result<u64, SessionError> {
        let revoked = self.tokens.delete_all_for_user(user_id).await?;
        tracing::info!(user_id = %user_id, revoked_sessions = revoked, "Sessions revoked");
        Ok(revoked)
    }
}
