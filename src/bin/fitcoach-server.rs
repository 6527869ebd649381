// ABOUTME: Server binary serving the FitCoach REST API
// ABOUTME: Loads configuration, runs migrations, and serves until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Contributors

//! # FitCoach API Server Binary
//!
//! Starts the fitness-coaching backend with JWT authentication, SQLite
//! persistence, and the keyword coach collaborator.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use fitcoach_server::{
    auth::AuthManager,
    coach::KeywordCoach,
    config::ServerConfig,
    database::Database,
    logging,
    server::{run_server, ServerResources},
};
use tracing::info;

#[derive(Parser)]
#[command(name = "fitcoach-server")]
#[command(about = "FitCoach API - fitness coaching backend")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    info!("Starting FitCoach API");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url).await?;
    info!("Database initialized: {}", config.database.url);

    let auth_manager = AuthManager::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.jwt_expiry_hours,
    );
    info!("Authentication manager initialized");

    let coach = Arc::new(KeywordCoach::new());
    info!("Coach collaborator initialized");

    let resources = Arc::new(ServerResources::new(database, auth_manager, coach, config));

    run_server(resources).await
}
