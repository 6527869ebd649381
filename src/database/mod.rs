// ABOUTME: Database management for user, workout, chat, and progress storage
// ABOUTME: Owns the SQLite pool, runs migrations, and groups per-domain operations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Contributors

//! # Database Management
//!
//! This module provides persistence for the FitCoach server. Domain
//! operations live in focused submodules (`users`, `workouts`, `progress`,
//! `chat`) that all hang off the [`Database`] struct.

mod chat;
mod progress;
mod users;
mod workouts;

pub use chat::NewChatMessage;
pub use progress::NewProgressLog;
pub use workouts::{NewWorkout, WorkoutStats};

use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

/// Database manager for all persistent state
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails, or a
    /// migration statement fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        // foreign_keys must be enabled per connection for ON DELETE CASCADE
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index creation fails.
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_users().await?;
        self.migrate_workouts().await?;
        self.migrate_progress().await?;
        self.migrate_chat().await?;
        Ok(())
    }
}
