use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::reset_password::RevokedSessionsData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::ports::AuthenticationPort;
use crate::domain::user::models::UserId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn revoke_sessions(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(actor)): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<RevokedSessionsData>, ApiError> {
    let user_id = UserId::from_string(&id).map_err(UserError::from)?;
    tracing::info!(actor_id = %actor.id, user_id = %user_id, "Revoke sessions requested");

    state
        .auth_service
        .revoke_all_sessions(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|revoked_sessions| {
            ApiSuccess::new(
                StatusCode::OK,
                "logged out",
                RevokedSessionsData { revoked_sessions },
            )
        })
}
