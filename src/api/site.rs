//! Home and profile views

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::Profile, AppState};

use super::{AuthenticatedUser, MaybeUser};

#[derive(Serialize, ToSchema)]
pub struct HomeResponse {
    pub name: String,
    pub version: String,
    pub is_authenticated: bool,
}

/// Landing view
#[utoipa::path(
    get,
    path = "/",
    tag = "site",
    responses(
        (status = 200, description = "Service summary", body = HomeResponse)
    )
)]
pub async fn home(MaybeUser(user): MaybeUser) -> Json<HomeResponse> {
    Json(HomeResponse {
        name: "Bookshelf".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        is_authenticated: user.is_some_and(|u| u.is_authenticated()),
    })
}

/// The caller's own account and books
#[utoipa::path(
    get,
    path = "/profile",
    tag = "site",
    security(("bearer_auth" = []), ("access_token" = [])),
    responses(
        (status = 200, description = "Own profile", body = Profile),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn profile(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
) -> AppResult<Json<Profile>> {
    let user = state.services.users.load_by_id(caller.id).await?;
    let books = state.services.books.list_by_owner(caller.id).await?;
    Ok(Json(Profile::new(user, books)))
}
