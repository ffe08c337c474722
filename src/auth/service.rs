use std::sync::Arc;

use chrono::Duration;
use validator::Validate;

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::{
    normalize_email, AuthError, AuthResponse, JwtService, LoginRequest, RegisterRequest,
    TokenResponse, UserSession,
};
use crate::error::AppError;
use crate::models::NewUser;
use crate::store::{Store, StoreError};

/// Settings the auth gate needs at construction.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

#[derive(Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    bcrypt_cost: u32,
    store: Arc<dyn Store>,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, config: &AuthConfig) -> Self {
        Self {
            jwt_service: JwtService::new(&config.jwt_secret, config.token_ttl),
            bcrypt_cost: config.bcrypt_cost,
            store,
        }
    }

    /// Register a new user
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;
        let email = normalize_email(&request.email);

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = hash_password_blocking(request.password, self.bcrypt_cost)
            .await
            .map_err(AuthError::from)?;

        let user = self
            .store
            .create_user(NewUser {
                email,
                password_hash,
                full_name: Some(request.full_name),
            })
            .await
            .map_err(|err| match err {
                // Lost a race with a concurrent registration.
                StoreError::Conflict(_) => AppError::Conflict("Email already exists".to_string()),
                other => other.into(),
            })?;

        let token = self.jwt_service.create_access_token(user.id, &user.email)?;
        tracing::info!(user_id = user.id, "user registered");

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    /// Login user
    pub async fn login(&self, request: LoginRequest) -> Result<TokenResponse, AppError> {
        request.validate()?;
        let email = normalize_email(&request.email);

        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = verify_password_blocking(request.password, user.password_hash.clone())
            .await
            .map_err(AuthError::from)?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.jwt_service.create_access_token(user.id, &user.email)?;
        tracing::info!(user_id = user.id, "user logged in");

        Ok(TokenResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.access_token_expires_in_seconds(),
        })
    }

    /// Resolve a bearer token to the caller's identity
    pub fn verify(&self, token: &str) -> Result<UserSession, AuthError> {
        self.jwt_service.extract_user_session(token)
    }
}
