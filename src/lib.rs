// ABOUTME: Main library entry point for the FitCoach API backend
// ABOUTME: Provides REST routes, JWT auth, SQLite persistence, and the coach collaborator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Contributors

#![deny(unsafe_code)]

//! # FitCoach Server
//!
//! A REST backend for a fitness-coaching application: user accounts,
//! workout logging, progress tracking, and a chat endpoint backed by a
//! response-generation collaborator (the "AI coach").
//!
//! ## Architecture
//!
//! - **Models**: record types for users, workouts, chat exchanges, and
//!   progress logs
//! - **Database**: SQLite persistence through `sqlx` with per-domain
//!   operation modules
//! - **Auth**: HS256 JWT issuance and validation guarding all business
//!   routes
//! - **Coach**: the collaborator trait plus the default keyword responder
//! - **Routes**: axum handlers translating HTTP into schema reads/writes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fitcoach_server::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("FitCoach server configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Authentication and session management
pub mod auth;

/// Coach collaborator contract and the keyword responder
pub mod coach;

/// Configuration management
pub mod config;

/// Database management
pub mod database;

/// Unified error handling system
pub mod errors;

/// Logging configuration
pub mod logging;

/// Core data models
pub mod models;

/// HTTP route handlers
pub mod routes;

/// Server resource wiring and application assembly
pub mod server;
