//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, site, ACCESS_TOKEN_HEADER};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "0.1.0",
        description = "Personal book tracking backed by Open Library",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Site
        site::home,
        site::profile,
        // Auth
        auth::signup,
        auth::signin,
        // Books
        books::list_books,
        books::add_book,
        books::delete_book,
        books::search,
        // Health
        health::health_check,
        health::readiness_check,
    ),
    components(
        schemas(
            // Site
            site::HomeResponse,
            crate::models::user::Profile,
            // Auth
            auth::SignUpResponse,
            auth::SignInResponse,
            crate::models::user::User,
            crate::models::user::RegisterUser,
            crate::models::user::SignIn,
            // Books
            books::BooksResponse,
            books::AddBookResponse,
            books::SearchResponse,
            crate::models::book::Book,
            crate::models::book::AddBookForm,
            crate::models::book::SearchHit,
            crate::api::MessageResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "site", description = "Home and profile"),
        (name = "auth", description = "Account creation and sign-in"),
        (name = "books", description = "Personal library and catalog search"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "access_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ACCESS_TOKEN_HEADER))),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
