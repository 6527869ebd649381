// ABOUTME: JWT-based user authentication and authorization system
// ABOUTME: Handles token generation, validation, and bearer header extraction
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 FitCoach Contributors

//! # Authentication and Session Management
//!
//! This module provides JWT-based authentication for the FitCoach server.
//! Tokens are HS256-signed with the configured secret and carry the user ID
//! as subject. Every protected route resolves the caller through
//! [`AuthManager::validate_token`].

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::User;

/// `JWT` validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Token signature is invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl std::fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenExpired { expired_at } => {
                write!(
                    f,
                    "JWT token expired at {}",
                    expired_at.format("%Y-%m-%d %H:%M:%S UTC")
                )
            }
            Self::TokenInvalid { reason } => {
                write!(f, "JWT token signature is invalid: {reason}")
            }
            Self::TokenMalformed { details } => {
                write!(f, "JWT token is malformed: {details}")
            }
        }
    }
}

impl std::error::Error for JwtValidationError {}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        match error {
            JwtValidationError::TokenExpired { .. } => Self::auth_expired(),
            JwtValidationError::TokenInvalid { reason } => Self::auth_invalid(reason),
            JwtValidationError::TokenMalformed { details } => Self::auth_invalid(details),
        }
    }
}

/// `JWT` claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Authentication manager for `JWT` tokens
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl AuthManager {
    /// Create a new authentication manager from the shared HS256 secret
    #[must_use]
    pub fn new(jwt_secret: &[u8], token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret),
            decoding_key: DecodingKey::from_secret(jwt_secret),
            token_expiry_hours,
        }
    }

    /// Token lifetime in hours
    #[must_use]
    pub const fn token_expiry_hours(&self) -> i64 {
        self.token_expiry_hours
    }

    /// Generate a `JWT` token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails.
    pub fn generate_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] distinguishing expiry, bad
    /// signatures, and malformed tokens.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    // Re-decode without expiry validation to recover the claim
                    let mut lenient = Validation::new(Algorithm::HS256);
                    lenient.validate_exp = false;
                    let expired_at = decode::<Claims>(token, &self.decoding_key, &lenient)
                        .map(|data| {
                            DateTime::<Utc>::from_timestamp(data.claims.exp, 0)
                                .unwrap_or_else(Utc::now)
                        })
                        .unwrap_or_else(|_| Utc::now());
                    Err(JwtValidationError::TokenExpired { expired_at })
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    Err(JwtValidationError::TokenInvalid {
                        reason: "signature verification failed".into(),
                    })
                }
                other => Err(JwtValidationError::TokenMalformed {
                    details: format!("{other:?}"),
                }),
            },
        }
    }

    /// Validate a token and resolve the user ID it carries
    ///
    /// # Errors
    ///
    /// Returns an error if the token fails validation or the subject is not
    /// a UUID.
    pub fn resolve_user_id(&self, token: &str) -> Result<Uuid, AppError> {
        let claims = self.validate_token(token)?;
        Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::auth_invalid("Token subject is not a valid user ID"))
    }
}

/// Extract the bearer token from an `Authorization` header value
///
/// # Errors
///
/// Returns an error if the header does not carry a `Bearer` scheme.
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AppError> {
    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::auth_invalid("Authorization header must use Bearer scheme"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_manager(expiry_hours: i64) -> AuthManager {
        AuthManager::new(b"test-secret-key", expiry_hours)
    }

    fn test_user() -> User {
        User::new(
            "athlete@example.com".into(),
            "athlete".into(),
            "hash".into(),
        )
    }

    #[test]
    fn test_generate_and_validate_token() {
        let manager = test_manager(24);
        let user = test_user();

        let token = manager.generate_token(&user).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let manager = test_manager(-1);
        let token = manager.generate_token(&test_user()).unwrap();

        match manager.validate_token(&token) {
            Err(JwtValidationError::TokenExpired { .. }) => {}
            other => panic!("expected TokenExpired, got {other:?}"),
        }
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let manager = test_manager(24);
        let foreign = AuthManager::new(b"other-secret", 24);
        let token = foreign.generate_token(&test_user()).unwrap();

        assert!(manager.validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let manager = test_manager(24);
        match manager.validate_token("not-a-jwt") {
            Err(JwtValidationError::TokenMalformed { .. }) => {}
            other => panic!("expected TokenMalformed, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc").unwrap(), "abc");
        assert!(extract_bearer_token("Basic abc").is_err());
    }
}
