//! Sign-up and sign-in endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{RegisterUser, SignIn, User},
    AppState,
};

use super::ApiJson;

#[derive(Serialize, ToSchema)]
pub struct SignUpResponse {
    pub message: String,
    pub user: User,
    /// Bearer token for the `x-access-token` header
    pub token: String,
}

#[derive(Serialize, ToSchema)]
pub struct SignInResponse {
    /// Session JWT for the `Authorization: Bearer` header
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: User,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/signup",
    tag = "auth",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "Account created", body = SignUpResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterUser>,
) -> AppResult<(StatusCode, Json<SignUpResponse>)> {
    let user = state.services.users.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            message: format!("User {} has been created", user.email),
            token: user.token.clone(),
            user,
        }),
    ))
}

/// Sign in with username and password
#[utoipa::path(
    post,
    path = "/signin",
    tag = "auth",
    request_body = SignIn,
    responses(
        (status = 200, description = "Signed in", body = SignInResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignIn>,
) -> AppResult<Json<SignInResponse>> {
    request.validate()?;

    let users = &state.services.users;
    let user = users.authenticate(&request.username, &request.password).await?;
    let token = users.issue_session(&user)?;

    tracing::info!("User {} signed in", user.id);

    Ok(Json(SignInResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: users.session_lifetime_seconds(),
        user,
    }))
}
