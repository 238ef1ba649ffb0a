use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::classifier::classify;
use super::classifier::ErrorKind;
use crate::domain::errors::StorageError;
use crate::domain::session::errors::SessionError;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

pub mod create_user;
pub mod delete_user;
pub mod get_user;
pub mod list_users;
pub mod login;
pub mod logout;
pub mod reset_password;
pub mod revoke_sessions;
pub mod update_user;
pub mod validate_token;

/// Message every credential and token rejection shares.
pub const AUTHENTICATION_FAILED: &str = "authentication failed";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(message, Some(data))))
    }
}

impl ApiSuccess<()> {
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(message, None)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    PayloadTooLarge(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
        };

        (status, Json(ApiResponseBody::<()>::error(message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge("request body too large".to_string());
        }
        ApiError::BadRequest("invalid json supplied".to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        let classification = classify(&err);
        let message = classification.kind.public_message().to_string();

        match classification.kind {
            ErrorKind::Internal => {
                tracing::error!(error = %classification.source, "Storage failure");
                ApiError::InternalServerError(message)
            }
            ErrorKind::BadRequest => {
                tracing::warn!(error = %classification.source, "Storage rejected input");
                ApiError::BadRequest(message)
            }
            ErrorKind::Duplicate | ErrorKind::ValueTooLong | ErrorKind::ForeignKey => {
                tracing::warn!(error = %classification.source, "Constraint violation");
                ApiError::Conflict(message)
            }
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        if err.is_authentication_failure() {
            tracing::warn!(reason = %err, "Authentication rejected");
            return ApiError::Unauthorized(AUTHENTICATION_FAILED.to_string());
        }

        match err {
            SessionError::InvalidInput(msg) => ApiError::BadRequest(msg),
            SessionError::Storage(e) => e.into(),
            other => {
                tracing::error!(error = %other, "Session operation failed");
                ApiError::InternalServerError("internal server error".to_string())
            }
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidEmail(_)
            | UserError::InvalidUserId(_)
            | UserError::InvalidPassword(_) => ApiError::UnprocessableEntity(err.to_string()),
            UserError::Storage(e) => e.into(),
            UserError::Password(_) => {
                tracing::error!(error = %err, "User operation failed");
                ApiError::InternalServerError("internal server error".to_string())
            }
        }
    }
}

/// JSON envelope shared by every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    error: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            error: false,
            message: message.into(),
            data,
        }
    }
}

impl ApiResponseBody<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            data: None,
        }
    }
}

/// User as rendered to clients; the password digest never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponseData {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            email: user.email.as_str().to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::errors::ConstraintKind;
    use crate::domain::user::models::UserId;

    #[test]
    fn test_authentication_failures_share_one_message() {
        for err in [
            SessionError::UnknownEmail("a@b.com".to_string()),
            SessionError::InvalidCredentials,
            SessionError::InactiveAccount(UserId(1)),
            SessionError::MalformedHeader,
            SessionError::MalformedToken {
                expected: 26,
                actual: 5,
            },
            SessionError::TokenNotFound,
            SessionError::TokenExpired(Utc::now()),
            SessionError::OwnerNotFound(UserId(1)),
        ] {
            assert_eq!(
                ApiError::from(err),
                ApiError::Unauthorized(AUTHENTICATION_FAILED.to_string())
            );
        }
    }

    #[test]
    fn test_storage_errors_do_not_leak_details() {
        let err = SessionError::Storage(StorageError::Database("relation tokens".to_string()));
        assert_eq!(
            ApiError::from(err),
            ApiError::InternalServerError("internal server error".to_string())
        );

        let err = SessionError::Storage(StorageError::Timeout(Duration::from_secs(3)));
        assert!(matches!(ApiError::from(err), ApiError::InternalServerError(_)));
    }

    #[test]
    fn test_constraint_violation_is_conflict() {
        let err = UserError::Storage(StorageError::Constraint {
            kind: ConstraintKind::ForeignKey,
            constraint: Some("tokens_user_id_fkey".to_string()),
            detail: "insert or update violates foreign key".to_string(),
        });
        assert_eq!(
            ApiError::from(err),
            ApiError::Conflict("foreign key violation".to_string())
        );
    }

    #[test]
    fn test_user_errors() {
        assert!(matches!(
            ApiError::from(UserError::NotFound("7".to_string())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(UserError::EmailAlreadyExists("a@b.com".to_string())),
            ApiError::Conflict(_)
        ));
    }

    #[test]
    fn test_envelope_shape() {
        let body = serde_json::to_value(ApiResponseBody::<()>::error("boom")).unwrap();
        assert_eq!(body, serde_json::json!({"error": true, "message": "boom"}));

        let body = serde_json::to_value(ApiResponseBody::new("", Some(true))).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"error": false, "message": "", "data": true})
        );
    }
}
