use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::logout::TokenRequest;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::ports::AuthenticationPort;
use crate::inbound::http::router::AppState;

pub async fn validate_token(
    State(state): State<AppState>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<ApiSuccess<bool>, ApiError> {
    let Json(body) = body?;

    state
        .auth_service
        .validate_token(&body.token)
        .await
        .map_err(ApiError::from)
        .map(|valid| ApiSuccess::new(StatusCode::OK, "", valid))
}
