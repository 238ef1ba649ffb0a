use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::PlaintextPassword;
use crate::domain::user::models::UserId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevokedSessionsData {
    pub revoked_sessions: u64,
}

/// Replace a user's password and end all of their sessions.
pub async fn reset_password(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(actor)): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    body: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<ApiSuccess<RevokedSessionsData>, ApiError> {
    let user_id = UserId::from_string(&id).map_err(UserError::from)?;
    tracing::info!(actor_id = %actor.id, user_id = %user_id, "Reset password requested");
    let Json(req) = body?;
    let password = PlaintextPassword::new(req.password).map_err(UserError::from)?;

    state
        .user_service
        .reset_password(&user_id, password)
        .await
        .map_err(ApiError::from)
        .map(|revoked_sessions| {
            ApiSuccess::new(
                StatusCode::OK,
                "password changed",
                RevokedSessionsData { revoked_sessions },
            )
        })
}
