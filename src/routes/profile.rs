// ABOUTME: Profile route handlers for user profile, progress logs, and statistics
// ABOUTME: Applies field-presence partial updates and weekly aggregate queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Contributors

//! Profile routes
//!
//! Profile updates apply only the fields present in the request body: an
//! absent key keeps the stored value, an explicit `null` clears it. The
//! statistics endpoint aggregates over the caller's workouts with the week
//! starting Monday 00:00 server-local time.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Datelike, Duration, Local, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{authenticate, double_option};
use crate::database::NewProgressLog;
use crate::errors::AppError;
use crate::models::{ProgressLog, User};
use crate::server::ServerResources;

/// Partial profile update; absent keys keep prior values, explicit nulls
/// clear them
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub full_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub age: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub weight: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub height: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub fitness_level: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub fitness_goal: Option<Option<String>>,
}

/// New progress measurement
#[derive(Debug, Deserialize)]
pub struct LogProgressRequest {
    pub weight: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub notes: Option<String>,
    pub mood: Option<String>,
    pub energy_level: Option<i64>,
}

/// Query parameters for listing progress logs
#[derive(Debug, Deserialize, Default)]
pub struct ListProgressQuery {
    /// Maximum number of logs to return
    #[serde(default = "default_progress_limit")]
    pub limit: i64,
}

const fn default_progress_limit() -> i64 {
    30
}

/// Response wrapping the caller's profile
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: User,
}

/// Response for a profile update
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileUpdatedResponse {
    pub message: String,
    pub user: User,
}

/// Response for a logged measurement
#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressLoggedResponse {
    pub message: String,
    pub log: ProgressLog,
}

/// Response for listing progress logs
#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressListResponse {
    pub progress_logs: Vec<ProgressLog>,
    pub total: i64,
}

/// Aggregate statistics for the caller
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileStatisticsResponse {
    /// All workouts regardless of status
    pub total_workouts: i64,
    /// Workouts created since Monday 00:00 server-local time
    pub workouts_this_week: i64,
    /// Minutes summed over completed workouts
    pub total_minutes_exercised: i64,
    /// Calories summed over completed workouts
    pub total_calories_burned: i64,
}

/// Start of the current calendar week (Monday 00:00 server-local), in UTC
fn start_of_week() -> DateTime<Utc> {
    let today = Local::now().date_naive();
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    monday
        .and_time(NaiveTime::MIN)
        .and_local_timezone(Local)
        .earliest()
        .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc))
}

/// Profile routes handler
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/profile",
                get(Self::get_profile)
                    .put(Self::update_profile)
                    .post(Self::update_profile),
            )
            .route(
                "/profile/progress",
                get(Self::list_progress).post(Self::log_progress),
            )
            // Trailing slash tolerated on the collection route
            .route(
                "/profile/progress/",
                get(Self::list_progress).post(Self::log_progress),
            )
            .route("/profile/statistics", get(Self::statistics))
            .with_state(resources)
    }

    /// Load the caller's user record or 404
    async fn require_user(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<User, AppError> {
        let user_id = authenticate(headers, resources)?;
        resources
            .database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// Get the caller's profile
    async fn get_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Json<ProfileResponse>, AppError> {
        let user = Self::require_user(&headers, &resources).await?;
        Ok(Json(ProfileResponse { user }))
    }

    /// Apply a field-presence partial update to the caller's profile
    async fn update_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<UpdateProfileRequest>,
    ) -> Result<Json<ProfileUpdatedResponse>, AppError> {
        let mut user = Self::require_user(&headers, &resources).await?;

        if let Some(full_name) = request.full_name {
            user.full_name = full_name;
        }
        if let Some(age) = request.age {
            user.age = age;
        }
        if let Some(weight) = request.weight {
            user.weight = weight;
        }
        if let Some(height) = request.height {
            user.height = height;
        }
        if let Some(gender) = request.gender {
            user.gender = gender;
        }
        if let Some(fitness_level) = request.fitness_level {
            user.fitness_level = fitness_level;
        }
        if let Some(fitness_goal) = request.fitness_goal {
            user.fitness_goal = fitness_goal;
        }
        user.updated_at = Utc::now();

        // Single-statement write: either all supplied fields land or none do
        resources.database.update_profile(&user).await?;

        Ok(Json(ProfileUpdatedResponse {
            message: "Profile updated".into(),
            user,
        }))
    }

    /// Record a progress measurement for the caller
    async fn log_progress(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<LogProgressRequest>,
    ) -> Result<(StatusCode, Json<ProgressLoggedResponse>), AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let log = resources
            .database
            .create_progress_log(&NewProgressLog {
                user_id,
                weight: request.weight,
                body_fat_percentage: request.body_fat_percentage,
                muscle_mass: request.muscle_mass,
                notes: request.notes,
                mood: request.mood,
                energy_level: request.energy_level,
            })
            .await?;

        Ok((
            StatusCode::CREATED,
            Json(ProgressLoggedResponse {
                message: "Progress logged".into(),
                log,
            }),
        ))
    }

    /// List the caller's progress logs, most recent first
    async fn list_progress(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListProgressQuery>,
    ) -> Result<Json<ProgressListResponse>, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let progress_logs = resources
            .database
            .list_progress_logs(user_id, query.limit)
            .await?;
        let total = resources.database.count_progress_logs(user_id).await?;

        Ok(Json(ProgressListResponse {
            progress_logs,
            total,
        }))
    }

    /// Aggregate workout statistics for the caller
    async fn statistics(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Json<ProfileStatisticsResponse>, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let stats = resources.database.workout_stats(user_id).await?;
        let workouts_this_week = resources
            .database
            .count_workouts_since(user_id, start_of_week())
            .await?;

        Ok(Json(ProfileStatisticsResponse {
            total_workouts: stats.total_workouts,
            workouts_this_week,
            total_minutes_exercised: stats.total_minutes_exercised,
            total_calories_burned: stats.total_calories_burned,
        }))
    }
}
