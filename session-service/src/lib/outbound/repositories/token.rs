use std::time::Duration;

use async_trait::async_trait;
use auth::TokenDigest;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use super::support::bounded;
use super::support::DEFAULT_QUERY_TIMEOUT;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::NewToken;
use crate::domain::session::models::Token;
use crate::domain::session::models::TokenId;
use crate::domain::session::ports::TokenRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UserId;

pub struct PostgresTokenRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }
}

#[derive(sqlx::FromRow)]
struct TokenRow {
    id: i64,
    user_id: i64,
    email: String,
    token_digest: Vec<u8>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expiry: DateTime<Utc>,
}

impl TryFrom<TokenRow> for Token {
    type Error = SessionError;

    fn try_from(row: TokenRow) -> Result<Self, Self::Error> {
        Ok(Token {
            id: TokenId(row.id),
            user_id: UserId(row.user_id),
            email: EmailAddress::new(row.email)
                .map_err(|e| SessionError::Internal(e.to_string()))?,
            digest: TokenDigest::from_bytes(&row.token_digest)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            expiry: row.expiry,
        })
    }
}

#[async_trait]
impl TokenRepository for PostgresTokenRepository {
    async fn insert(
        &self,
        token: NewToken,
        owner_email: &EmailAddress,
    ) -> Result<Token, SessionError> {
        let row = bounded(
            self.query_timeout,
            sqlx::query_as::<_, TokenRow>(
                r#"
                INSERT INTO tokens (user_id, email, token_digest, created_at, updated_at, expiry)
                VALUES ($1, $2, $3, $4, $4, $5)
                RETURNING id, user_id, email, token_digest, created_at, updated_at, expiry
                "#,
            )
            .bind(token.user_id.0)
            .bind(owner_email.as_str())
            .bind(token.digest.as_bytes())
            .bind(token.created_at)
            .bind(token.expiry)
            .fetch_one(&self.pool),
        )
        .await?;

        Token::try_from(row)
    }

    async fn get_by_token(&self, digest: &TokenDigest) -> Result<Token, SessionError> {
        let row = bounded(
            self.query_timeout,
            sqlx::query_as::<_, TokenRow>(
                r#"
                SELECT id, user_id, email, token_digest, created_at, updated_at, expiry
                FROM tokens
                WHERE token_digest = $1
                "#,
            )
            .bind(digest.as_bytes())
            .fetch_optional(&self.pool),
        )
        .await?;

        row.ok_or(SessionError::TokenNotFound)
            .and_then(Token::try_from)
    }

    async fn delete_by_token(&self, digest: &TokenDigest) -> Result<(), SessionError> {
        bounded(
            self.query_timeout,
            sqlx::query("DELETE FROM tokens WHERE token_digest = $1")
                .bind(digest.as_bytes())
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: &UserId) -> Result<u64, SessionError> {
        let result = bounded(
            self.query_timeout,
            sqlx::query("DELETE FROM tokens WHERE user_id = $1")
                .bind(user_id.0)
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected())
    }

    async fn valid_token(
        &self,
        digest: &TokenDigest,
        now: DateTime<Utc>,
    ) -> Result<bool, SessionError> {
        let valid = bounded(
            self.query_timeout,
            sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS (
                    SELECT 1
                    FROM tokens t
                    JOIN users u ON u.id = t.user_id
                    WHERE t.token_digest = $1 AND t.expiry > $2 AND u.active
                )
                "#,
            )
            .bind(digest.as_bytes())
            .bind(now)
            .fetch_one(&self.pool),
        )
        .await?;

        Ok(valid)
    }
}
