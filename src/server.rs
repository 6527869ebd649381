// ABOUTME: Server resource wiring and HTTP application assembly
// ABOUTME: Builds the router with CORS and tracing layers and runs it to completion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Contributors

//! # Application Assembly
//!
//! [`ServerResources`] owns the shared collaborators (database, auth
//! manager, coach) behind `Arc`s and is threaded into every route handler
//! as axum state. [`run_server`] assembles the router and serves it.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::AuthManager;
use crate::coach::CoachService;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::routes;

/// Shared server resources, constructed once at startup
pub struct ServerResources {
    /// Database manager
    pub database: Arc<Database>,
    /// JWT authentication manager
    pub auth_manager: Arc<AuthManager>,
    /// Response-generation collaborator
    pub coach: Arc<dyn CoachService>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources with proper Arc sharing
    #[must_use]
    pub fn new(
        database: Database,
        auth_manager: AuthManager,
        coach: Arc<dyn CoachService>,
        config: ServerConfig,
    ) -> Self {
        Self {
            database: Arc::new(database),
            auth_manager: Arc::new(auth_manager),
            coach,
            config: Arc::new(config),
        }
    }
}

/// Build the CORS layer from configured origins; a literal `*` origin opens
/// the API up entirely
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if config.cors_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    layer.allow_origin(origins)
}

/// Build the full application router
#[must_use]
pub fn app_router(resources: Arc<ServerResources>) -> axum::Router {
    let cors = cors_layer(&resources.config);

    routes::health::HealthRoutes::routes()
        .merge(routes::auth::AuthRoutes::routes(resources.clone()))
        .merge(routes::profile::ProfileRoutes::routes(resources.clone()))
        .merge(routes::workouts::WorkoutRoutes::routes(resources.clone()))
        .merge(routes::chat::ChatRoutes::routes(resources))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured port and serve until shutdown
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails.
pub async fn run_server(resources: Arc<ServerResources>) -> Result<()> {
    let port = resources.config.http_port;
    let app = app_router(resources);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("FitCoach API listening on http://0.0.0.0:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Resolve when the process receives a shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutdown signal received, draining connections");
}
