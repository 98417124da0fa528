//! API handlers for Bookshelf endpoints

pub mod auth;
pub mod books;
pub mod health;
pub mod openapi;
pub mod site;

use std::{any::Any as PanicPayload, convert::Infallible};

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{error::AppError, models::CurrentUser, AppState};

/// Header carrying a user's opaque bearer token
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Extractor for the caller, from a session JWT (`Authorization: Bearer`)
/// or from the user's bearer token (`x-access-token`)
pub struct AuthenticatedUser(pub CurrentUser);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(value) = parts.headers.get(AUTHORIZATION) {
            let auth_header = value
                .to_str()
                .map_err(|_| AppError::Authentication("Invalid authorization header".to_string()))?;

            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                AppError::Authentication("Invalid authorization header format".to_string())
            })?;

            let user = state.services.users.resolve_session(token).await?;
            return Ok(AuthenticatedUser(user));
        }

        if let Some(value) = parts.headers.get(ACCESS_TOKEN_HEADER) {
            let token = value
                .to_str()
                .map_err(|_| AppError::Authentication("Invalid access token".to_string()))?;
            let user = state.services.users.load_by_token(token).await?;
            return Ok(AuthenticatedUser(user.identity()));
        }

        Err(AppError::Authentication("Missing authorization header".to_string()))
    }
}

/// Like [`AuthenticatedUser`] but anonymous callers are let through
pub struct MaybeUser(pub Option<CurrentUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state)
            .await
            .ok()
            .map(|AuthenticatedUser(user)| user);
        Ok(MaybeUser(user))
    }
}

/// JSON body whose decoding failures are reported as `AppError::Validation`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Url-encoded form whose decoding failures are reported as `AppError::Validation`
#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct ApiForm<T>(pub T);

/// Plain acknowledgement
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn panic_response(_: Box<dyn PanicPayload + Send + 'static>) -> Response {
    AppError::Internal("request handler panicked".to_string()).into_response()
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(site::home))
        .route("/profile", get(site::profile))
        // Accounts
        .route("/signup", post(auth::signup))
        .route("/signin", post(auth::signin))
        // Books
        .route("/books", get(books::list_books))
        .route("/add", post(books::add_book))
        .route(
            "/books/:isbn",
            get(books::delete_book)
                .post(books::delete_book)
                .delete(books::delete_book),
        )
        .route("/search", get(books::search))
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state);

    app.merge(openapi::create_openapi_router())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
