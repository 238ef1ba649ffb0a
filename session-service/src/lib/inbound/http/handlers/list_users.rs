use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::domain::user::models::UserListing;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<UserListingResponseData>>, ApiError> {
    state
        .user_service
        .list_users()
        .await
        .map_err(ApiError::from)
        .map(|listings| {
            let users = listings.iter().map(UserListingResponseData::from).collect();
            ApiSuccess::new(StatusCode::OK, "", users)
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserListingResponseData {
    #[serde(flatten)]
    pub user: UserResponseData,
    pub has_active_token: bool,
}

impl From<&UserListing> for UserListingResponseData {
    fn from(listing: &UserListing) -> Self {
        Self {
            user: (&listing.user).into(),
            has_active_token: listing.has_active_token,
        }
    }
}
