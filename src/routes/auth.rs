// ABOUTME: User authentication route handlers for registration and login
// ABOUTME: Provides REST endpoints for account creation and token issuance
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 FitCoach Contributors

//! Authentication routes for user management
//!
//! Registration and login issue HS256 bearer tokens; `/auth/me` resolves
//! the caller from a token. Duplicate email or username registrations are
//! rejected before any write.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::authenticate;
use crate::errors::AppError;
use crate::models::User;
use crate::server::ServerResources;

/// User registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token response shared by register and login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub jwt_token: String,
    pub expires_at: String,
    pub user: User,
}

/// Response for `/auth/me`
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/auth/register", post(Self::register))
            .route("/auth/login", post(Self::login))
            .route("/auth/me", get(Self::me))
            .with_state(resources)
    }

    /// Validate email format
    #[must_use]
    pub fn is_valid_email(email: &str) -> bool {
        if email.len() <= 5 {
            return false;
        }
        let Some(at_pos) = email.find('@') else {
            return false;
        };
        if at_pos == 0 || at_pos == email.len() - 1 {
            return false;
        }
        let domain_part = &email[at_pos + 1..];
        domain_part.contains('.')
    }

    /// Validate password strength
    #[must_use]
    pub const fn is_valid_password(password: &str) -> bool {
        password.len() >= 8
    }

    /// Issue a token plus serialized user for a successful auth flow
    fn token_response(
        resources: &Arc<ServerResources>,
        user: &User,
    ) -> Result<TokenResponse, AppError> {
        let jwt_token = resources
            .auth_manager
            .generate_token(user)
            .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;
        let expires_at = chrono::Utc::now()
            + chrono::Duration::hours(resources.auth_manager.token_expiry_hours());

        Ok(TokenResponse {
            jwt_token,
            expires_at: expires_at.to_rfc3339(),
            user: user.clone(),
        })
    }

    /// Handle user registration
    async fn register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
        info!("User registration attempt for email: {}", request.email);

        if !Self::is_valid_email(&request.email) {
            return Err(AppError::invalid_input("Invalid email format"));
        }
        if request.username.trim().len() < 3 {
            return Err(AppError::invalid_input(
                "Username must be at least 3 characters",
            ));
        }
        if !Self::is_valid_password(&request.password) {
            return Err(AppError::invalid_input(
                "Password must be at least 8 characters",
            ));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        let user = User::new(
            request.email.clone(),
            request.username.trim().to_owned(),
            password_hash,
        );

        // create_user rejects duplicate email/username with 400
        resources.database.create_user(&user).await?;

        info!("User registered successfully: {} ({})", user.email, user.id);

        let response = Self::token_response(&resources, &user)?;
        Ok((StatusCode::CREATED, Json(response)))
    }

    /// Handle user login
    async fn login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Json<TokenResponse>, AppError> {
        info!("User login attempt for email: {}", request.email);

        let user = resources
            .database
            .get_user_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid email or password"))?;

        // Verify password on a blocking thread; bcrypt is CPU-bound
        let password = request.password.clone();
        let password_hash = user.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
                .await
                .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password verification error: {e}")))?;

        if !is_valid {
            return Err(AppError::auth_invalid("Invalid email or password"));
        }

        resources.database.update_last_active(user.id).await?;

        info!("User logged in successfully: {} ({})", user.email, user.id);

        let response = Self::token_response(&resources, &user)?;
        Ok(Json(response))
    }

    /// Return the caller's user record
    async fn me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Json<MeResponse>, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let user = resources
            .database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        Ok(Json(MeResponse { user }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(AuthRoutes::is_valid_email("user@example.com"));
        assert!(!AuthRoutes::is_valid_email("short"));
        assert!(!AuthRoutes::is_valid_email("@example.com"));
        assert!(!AuthRoutes::is_valid_email("user@nodomain"));
    }

    #[test]
    fn test_password_validation() {
        assert!(AuthRoutes::is_valid_password("longenough"));
        assert!(!AuthRoutes::is_valid_password("short"));
    }
}
