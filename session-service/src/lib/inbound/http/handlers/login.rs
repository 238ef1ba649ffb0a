use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use super::AUTHENTICATION_FAILED;
use crate::domain::session::models::IssuedToken;
use crate::domain::session::models::LoginOutcome;
use crate::domain::session::ports::AuthenticationPort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PlaintextPassword;
use crate::inbound::http::router::AppState;

/// Exchange email and password for a session token.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = body?;
    let (email, password) = body.try_into_credentials()?;

    state
        .auth_service
        .login(&email, &password)
        .await
        .map_err(ApiError::from)
        .map(|ref outcome| ApiSuccess::new(StatusCode::OK, "logged in", outcome.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl LoginRequest {
    /// Unparseable credentials are rejected like wrong ones.
    fn try_into_credentials(self) -> Result<(EmailAddress, PlaintextPassword), ApiError> {
        let email = EmailAddress::new(self.email);
        let password = PlaintextPassword::new(self.password);

        match (email, password) {
            (Ok(email), Ok(password)) => Ok((email, password)),
            (email, password) => {
                tracing::warn!(
                    email_valid = email.is_ok(),
                    password_present = password.is_ok(),
                    "Login rejected before lookup"
                );
                Err(ApiError::Unauthorized(AUTHENTICATION_FAILED.to_string()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: TokenResponseData,
    pub user: UserResponseData,
}

impl From<&LoginOutcome> for LoginResponseData {
    fn from(outcome: &LoginOutcome) -> Self {
        Self {
            token: (&outcome.token).into(),
            user: (&outcome.user).into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub id: i64,
    pub user_id: i64,
    pub email: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expiry: DateTime<Utc>,
}

impl From<&IssuedToken> for TokenResponseData {
    fn from(issued: &IssuedToken) -> Self {
        Self {
            id: issued.token.id.0,
            user_id: issued.token.user_id.0,
            email: issued.token.email.as_str().to_string(),
            token: issued.value.clone(),
            created_at: issued.token.created_at,
            updated_at: issued.token.updated_at,
            expiry: issued.token.expiry,
        }
    }
}
