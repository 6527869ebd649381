// ABOUTME: Health check route handler for service monitoring
// ABOUTME: Provides the liveness endpoint for load balancers and deploys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Contributors

//! Health check route for service monitoring

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes() -> axum::Router {
        use axum::{routing::get, Json, Router};

        async fn health_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "healthy",
                "service": "fitness-api"
            }))
        }

        Router::new().route("/health", get(health_handler))
    }
}
