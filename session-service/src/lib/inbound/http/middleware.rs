use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::session::errors::SessionError;
use crate::domain::session::ports::AuthenticationPort;
use crate::domain::user::models::User;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated user in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Middleware that resolves the bearer token to an active user.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    // Owned so that no borrow of the request is held across the await.
    let header = authorization_header(&req)
        .map(str::to_owned)
        .map_err(|e| ApiError::from(e).into_response())?;

    let user = state
        .auth_service
        .authenticate(&header)
        .await
        .map_err(|e| ApiError::from(e).into_response())?;

    req.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(req).await)
}

fn authorization_header(req: &Request) -> Result<&str, SessionError> {
    req.headers()
        .get(http::header::AUTHORIZATION)
        .ok_or(SessionError::MalformedHeader)?
        .to_str()
        .map_err(|_| SessionError::MalformedHeader)
}
