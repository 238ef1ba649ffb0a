use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use super::support::bounded;
use super::support::DEFAULT_QUERY_TIMEOUT;
use crate::domain::errors::ConstraintKind;
use crate::domain::errors::StorageError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PasswordDigest;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserListing;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

pub struct PostgresUserRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresUserRepository {
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
struct UserRow {
    id: i64,
    email: String,
    first_name: String,
    last_name: String,
    password_digest: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserListingRow {
    #[sqlx(flatten)]
    user: UserRow,
    has_active_token: bool,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            email: EmailAddress::new(row.email)?,
            first_name: row.first_name,
            last_name: row.last_name,
            password_digest: PasswordDigest::new(row.password_digest),
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Duplicate emails become a domain error; everything else stays a storage error.
fn write_error(err: StorageError, email: &EmailAddress) -> UserError {
    match &err {
        StorageError::Constraint {
            kind: ConstraintKind::Duplicate,
            constraint,
            ..
        } if constraint.as_deref() == Some(EMAIL_UNIQUE_CONSTRAINT) => {
            UserError::EmailAlreadyExists(email.to_string())
        }
        _ => UserError::Storage(err),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let row = bounded(
            self.query_timeout,
            sqlx::query_as::<_, UserRow>(
                r#"
                INSERT INTO users (email, first_name, last_name, password_digest, active, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $6)
                RETURNING id, email, first_name, last_name, password_digest, active, created_at, updated_at
                "#,
            )
            .bind(user.email.as_str())
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.password_digest.as_str())
            .bind(user.active)
            .bind(user.created_at)
            .fetch_one(&self.pool),
        )
        .await
        .map_err(|e| write_error(e, &user.email))?;

        User::try_from(row)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = bounded(
            self.query_timeout,
            sqlx::query_as::<_, UserRow>(
                r#"
                SELECT id, email, first_name, last_name, password_digest, active, created_at, updated_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(id.0)
            .fetch_optional(&self.pool),
        )
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let row = bounded(
            self.query_timeout,
            sqlx::query_as::<_, UserRow>(
                r#"
                SELECT id, email, first_name, last_name, password_digest, active, created_at, updated_at
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email.as_str())
            .fetch_optional(&self.pool),
        )
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<UserListing>, UserError> {
        let rows = bounded(
            self.query_timeout,
            sqlx::query_as::<_, UserListingRow>(
                r#"
                SELECT u.id, u.email, u.first_name, u.last_name, u.password_digest, u.active,
                       u.created_at, u.updated_at,
                       EXISTS (
                           SELECT 1 FROM tokens t WHERE t.user_id = u.id AND t.expiry > NOW()
                       ) AS has_active_token
                FROM users u
                ORDER BY u.last_name, u.id
                "#,
            )
            .fetch_all(&self.pool),
        )
        .await?;

        rows.into_iter()
            .map(|r| {
                Ok(UserListing {
                    user: User::try_from(r.user)?,
                    has_active_token: r.has_active_token,
                })
            })
            .collect()
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let row = bounded(
            self.query_timeout,
            sqlx::query_as::<_, UserRow>(
                r#"
                UPDATE users
                SET email = $2, first_name = $3, last_name = $4, active = $5, updated_at = $6
                WHERE id = $1
                RETURNING id, email, first_name, last_name, password_digest, active, created_at, updated_at
                "#,
            )
            .bind(user.id.0)
            .bind(user.email.as_str())
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.active)
            .bind(user.updated_at)
            .fetch_optional(&self.pool),
        )
        .await
        .map_err(|e| write_error(e, &user.email))?;

        match row {
            Some(row) => User::try_from(row),
            None => Err(UserError::NotFound(user.id.to_string())),
        }
    }

    async fn replace_password(
        &self,
        id: &UserId,
        digest: &PasswordDigest,
    ) -> Result<u64, UserError> {
        let revoked = bounded(self.query_timeout, async {
            let mut tx = self.pool.begin().await?;

            let updated = sqlx::query(
                r#"
                UPDATE users
                SET password_digest = $2, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(id.0)
            .bind(digest.as_str())
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Ok(None);
            }

            let deleted = sqlx::query("DELETE FROM tokens WHERE user_id = $1")
                .bind(id.0)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(Some(deleted.rows_affected()))
        })
        .await?;

        revoked.ok_or(UserError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let result = bounded(
            self.query_timeout,
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id.0)
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
