//! Authentication and user management service

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CurrentUser, RegisterUser, SessionClaims, User},
    repository::UsersStore,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Clone)]
pub struct UsersService {
    store: Arc<dyn UsersStore>,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(store: Arc<dyn UsersStore>, config: AuthConfig) -> Self {
        Self { store, config }
    }

    /// Create an account. Id, password hash and bearer token are generated here.
    pub async fn register(&self, request: RegisterUser) -> AppResult<User> {
        if request.email.trim().is_empty() {
            return Err(AppError::Validation("Email is required".to_string()));
        }
        request.validate()?;

        if self.store.users_username_exists(&request.username).await? {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let password_hash = self.hash_password(&request.password)?;
        let user = User::new(
            request.first,
            request.last,
            request.username,
            request.email.trim().to_string(),
            password_hash,
        );

        self.store.users_create(&user).await?;
        tracing::info!("Registered user {} ({})", user.username, user.id);

        Ok(user)
    }

    /// Check a username/password pair
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self
            .store
            .users_get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !self.verify_password(&user, password)? {
            tracing::debug!("Password mismatch for user {}", user.id);
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        Ok(user)
    }

    /// Get user by ID
    pub async fn load_by_id(&self, id: Uuid) -> AppResult<User> {
        self.store
            .users_get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Resolve the owner of an opaque bearer token
    pub async fn load_by_token(&self, token: &str) -> AppResult<User> {
        self.store
            .users_get_by_token(token)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid access token".to_string()))
    }

    /// Sign a session JWT for a user that just authenticated
    pub fn issue_session(&self, user: &User) -> AppResult<String> {
        SessionClaims::new(user.id, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Resolve the caller behind a session JWT. The account must still exist.
    pub async fn resolve_session(&self, token: &str) -> AppResult<CurrentUser> {
        let claims = SessionClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        match self.store.users_get_by_id(claims.sub).await? {
            Some(user) => Ok(user.identity()),
            None => Err(AppError::Authentication("Unknown session user".to_string())),
        }
    }

    /// Session length advertised to clients, in seconds
    pub fn session_lifetime_seconds(&self) -> u64 {
        self.config.jwt_expiration_hours * 3600
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
