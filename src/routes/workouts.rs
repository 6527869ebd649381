// ABOUTME: Workout route handlers for CRUD and statistics
// ABOUTME: Enforces per-user ownership and idempotent completion timestamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Contributors

//! Workout routes
//!
//! All operations are scoped to the authenticated caller; a workout owned
//! by someone else is indistinguishable from a missing one (404). Setting a
//! workout to "completed" stamps `completed_at` exactly once.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{authenticate, double_option};
use crate::database::{NewWorkout, WorkoutStats};
use crate::errors::AppError;
use crate::models::{Workout, WorkoutStatus};
use crate::server::ServerResources;

/// Query parameters for listing workouts
#[derive(Debug, Deserialize, Default)]
pub struct ListWorkoutsQuery {
    /// Optional status filter: planned, completed, skipped
    pub status: Option<String>,
    /// Maximum number of workouts to return
    #[serde(default = "default_workout_limit")]
    pub limit: i64,
}

const fn default_workout_limit() -> i64 {
    50
}

/// Request to create a workout; every field is optional with server-side
/// defaults
#[derive(Debug, Deserialize)]
pub struct CreateWorkoutRequest {
    pub workout_type: Option<String>,
    pub duration_minutes: Option<i64>,
    pub calories_burned: Option<i64>,
    pub intensity: Option<String>,
    pub recommended_by_ai: Option<bool>,
    pub ai_confidence: Option<f64>,
    pub status: Option<String>,
    pub notes: Option<String>,
    /// ISO-8601 schedule timestamp
    pub scheduled_for: Option<String>,
}

/// Presence-driven partial update; absent keys keep stored values
#[derive(Debug, Default, Deserialize)]
pub struct UpdateWorkoutRequest {
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub duration_minutes: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub calories_burned: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    pub intensity: Option<String>,
}

/// Response for listing workouts
#[derive(Debug, Serialize, Deserialize)]
pub struct WorkoutListResponse {
    pub workouts: Vec<Workout>,
    pub total: i64,
}

/// Response carrying one workout plus an action message
#[derive(Debug, Serialize, Deserialize)]
pub struct WorkoutResponse {
    pub message: String,
    pub workout: Workout,
}

/// Response for a deletion
#[derive(Debug, Serialize, Deserialize)]
pub struct WorkoutDeletedResponse {
    pub message: String,
}

/// Parse an ISO-8601 timestamp, accepting RFC 3339 or a naive local form
/// interpreted as UTC
fn parse_schedule_timestamp(value: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| AppError::invalid_input(format!("Invalid scheduled_for timestamp: {value}")))
}

fn parse_status(value: &str) -> Result<WorkoutStatus, AppError> {
    value.parse()
}

/// Workout routes handler
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create all workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/workouts",
                get(Self::list_workouts).post(Self::create_workout),
            )
            // Trailing slash tolerated on the collection route
            .route(
                "/workouts/",
                get(Self::list_workouts).post(Self::create_workout),
            )
            .route("/workouts/stats", get(Self::workout_stats))
            .route(
                "/workouts/:workout_id",
                axum::routing::put(Self::update_workout).delete(Self::delete_workout),
            )
            .with_state(resources)
    }

    /// List the caller's workouts with an optional status filter
    async fn list_workouts(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListWorkoutsQuery>,
    ) -> Result<Json<WorkoutListResponse>, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let status = query
            .status
            .as_deref()
            .map(parse_status)
            .transpose()?;

        let workouts = resources
            .database
            .list_workouts(user_id, status, query.limit)
            .await?;
        // Total reflects the same filter, not the page size
        let total = resources.database.count_workouts(user_id, status).await?;

        Ok(Json(WorkoutListResponse { workouts, total }))
    }

    /// Create a workout owned by the caller
    async fn create_workout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateWorkoutRequest>,
    ) -> Result<(StatusCode, Json<WorkoutResponse>), AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let status = request
            .status
            .as_deref()
            .map(parse_status)
            .transpose()?
            .unwrap_or(WorkoutStatus::Planned);

        let scheduled_for = request
            .scheduled_for
            .as_deref()
            .map(parse_schedule_timestamp)
            .transpose()?;

        let workout = resources
            .database
            .create_workout(&NewWorkout {
                user_id,
                workout_type: request.workout_type.unwrap_or_else(|| "general".into()),
                duration_minutes: request.duration_minutes,
                calories_burned: request.calories_burned,
                intensity: request.intensity.unwrap_or_else(|| "medium".into()),
                recommended_by_ai: request.recommended_by_ai.unwrap_or(false),
                ai_confidence: request.ai_confidence,
                status,
                notes: request.notes,
                scheduled_for,
            })
            .await?;

        Ok((
            StatusCode::CREATED,
            Json(WorkoutResponse {
                message: "Workout created".into(),
                workout,
            }),
        ))
    }

    /// Apply a presence-driven partial update to one workout
    async fn update_workout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(workout_id): Path<i64>,
        Json(request): Json<UpdateWorkoutRequest>,
    ) -> Result<Json<WorkoutResponse>, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let mut workout = resources
            .database
            .get_workout(workout_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Workout"))?;

        if let Some(status) = request.status.as_deref() {
            workout.status = parse_status(status)?;
            // completed_at is stamped once; repeating "completed" keeps the
            // first value
            if workout.status == WorkoutStatus::Completed && workout.completed_at.is_none() {
                workout.completed_at = Some(Utc::now());
            }
        }
        if let Some(duration_minutes) = request.duration_minutes {
            workout.duration_minutes = duration_minutes;
        }
        if let Some(calories_burned) = request.calories_burned {
            workout.calories_burned = calories_burned;
        }
        if let Some(notes) = request.notes {
            workout.notes = notes;
        }
        if let Some(intensity) = request.intensity {
            workout.intensity = intensity;
        }

        resources.database.update_workout(&workout).await?;

        Ok(Json(WorkoutResponse {
            message: "Workout updated".into(),
            workout,
        }))
    }

    /// Delete one of the caller's workouts
    async fn delete_workout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(workout_id): Path<i64>,
    ) -> Result<Json<WorkoutDeletedResponse>, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let deleted = resources
            .database
            .delete_workout(workout_id, user_id)
            .await?;
        if !deleted {
            return Err(AppError::not_found("Workout"));
        }

        Ok(Json(WorkoutDeletedResponse {
            message: "Workout deleted".into(),
        }))
    }

    /// Aggregate statistics over the caller's workouts
    async fn workout_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Json<WorkoutStats>, AppError> {
        let user_id = authenticate(&headers, &resources)?;
        let stats = resources.database.workout_stats(user_id).await?;
        Ok(Json(stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schedule_timestamp_accepts_rfc3339() {
        let dt = parse_schedule_timestamp("2025-06-01T07:30:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-06-01T07:30:00+00:00");
    }

    #[test]
    fn test_parse_schedule_timestamp_accepts_naive() {
        assert!(parse_schedule_timestamp("2025-06-01T07:30:00").is_ok());
    }

    #[test]
    fn test_parse_schedule_timestamp_rejects_garbage() {
        assert!(parse_schedule_timestamp("tomorrow morning").is_err());
    }

    #[test]
    fn test_update_request_distinguishes_absent_from_null() {
        let absent: UpdateWorkoutRequest = serde_json::from_str("{}").unwrap();
        assert!(absent.notes.is_none());

        let cleared: UpdateWorkoutRequest = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        assert_eq!(cleared.notes, Some(None));
    }
}
