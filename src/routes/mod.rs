// ABOUTME: HTTP route handler modules for the FitCoach API
// ABOUTME: Shared helpers for bearer authentication and partial-update bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Contributors

//! HTTP route handlers
//!
//! Each submodule exposes a `XxxRoutes::routes(resources)` constructor
//! returning an `axum::Router`. All business routes authenticate through
//! [`authenticate`]; the health endpoint is the only open route.

pub mod auth;
pub mod chat;
pub mod health;
pub mod profile;
pub mod workouts;

use std::sync::Arc;

use axum::http::HeaderMap;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::auth::extract_bearer_token;
use crate::errors::AppError;
use crate::server::ServerResources;

/// Extract and validate the bearer token, resolving the caller's user ID
///
/// Unknown-but-valid user IDs are NOT rejected here; handlers that load the
/// user decide between 404 and success.
///
/// # Errors
///
/// Returns an error when the header is missing or the token fails
/// validation.
pub fn authenticate(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> Result<Uuid, AppError> {
    let auth_header = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(AppError::auth_required)?;

    let token = extract_bearer_token(auth_header)?;
    resources.auth_manager.resolve_user_id(token)
}

/// Deserialize helper distinguishing an absent field from an explicit null
///
/// Wrap the target in `Option<Option<T>>` and mark the field
/// `#[serde(default, deserialize_with = "double_option")]`: outer `None`
/// means the key was absent, `Some(None)` means it was sent as null.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
