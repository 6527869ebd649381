// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, auth, and user creation helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 FitCoach Contributors
#![allow(dead_code, clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Shared test utilities for `fitcoach_server`
//!
//! Common setup functions to reduce duplication across integration tests.
//! Each test gets a file-backed SQLite database in its own temp directory;
//! the returned guard must stay alive for the duration of the test.

use std::sync::{Arc, Once};

use anyhow::Result;
use fitcoach_server::{
    auth::AuthManager,
    coach::{CoachService, KeywordCoach},
    config::{AuthConfig, DatabaseConfig, Environment, LogLevel, ServerConfig},
    database::Database,
    models::User,
    server::ServerResources,
};
use tempfile::TempDir;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Test password used by every seeded user
pub const TEST_PASSWORD: &str = "password123";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Configuration for tests; the database URL only documents the temp path
fn test_config(database_url: &str) -> ServerConfig {
    ServerConfig {
        http_port: 0,
        environment: Environment::Testing,
        log_level: LogLevel::Warn,
        database: DatabaseConfig {
            url: database_url.to_owned(),
        },
        auth: AuthConfig {
            jwt_secret: "test-jwt-secret".into(),
            jwt_expiry_hours: 24,
        },
        cors_origins: vec!["*".into()],
    }
}

/// Standard test resources with the default keyword coach
pub async fn create_test_resources() -> Result<(Arc<ServerResources>, TempDir)> {
    create_test_resources_with_coach(Arc::new(KeywordCoach::new())).await
}

/// Test resources with a custom coach collaborator
pub async fn create_test_resources_with_coach(
    coach: Arc<dyn CoachService>,
) -> Result<(Arc<ServerResources>, TempDir)> {
    init_test_logging();

    let dir = tempfile::tempdir()?;
    let database_url = format!("sqlite:{}", dir.path().join("fitcoach-test.db").display());
    let database = Database::new(&database_url).await?;

    let auth_manager = AuthManager::new(b"test-jwt-secret", 24);
    let config = test_config(&database_url);

    let resources = Arc::new(ServerResources::new(database, auth_manager, coach, config));
    Ok((resources, dir))
}

/// Create a stored user with a known password and a ready-to-use bearer
/// header value
pub async fn create_test_user(resources: &Arc<ServerResources>) -> Result<(User, String)> {
    let suffix = Uuid::new_v4().simple().to_string();
    // Minimum bcrypt cost keeps the test suite fast
    let password_hash = bcrypt::hash(TEST_PASSWORD, 4)?;

    let user = User::new(
        format!("athlete-{suffix}@example.com"),
        format!("athlete_{suffix}"),
        password_hash,
    );
    resources.database.create_user(&user).await?;

    let token = resources.auth_manager.generate_token(&user)?;
    Ok((user, format!("Bearer {token}")))
}
