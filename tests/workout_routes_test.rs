// ABOUTME: Integration tests for the workout route handlers
// ABOUTME: Covers CRUD defaults, completion idempotency, ownership, and stats
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{create_test_resources, create_test_user};
use fitcoach_server::database::WorkoutStats;
use fitcoach_server::routes::workouts::{WorkoutListResponse, WorkoutResponse};
use fitcoach_server::server::app_router;
use helpers::axum_test::AxumTestRequest;
use serde_json::json;

#[tokio::test]
async fn test_create_workout_applies_defaults() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (_user, auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    let response = AxumTestRequest::post("/workouts")
        .header("authorization", &auth)
        .json(&json!({}))
        .send(app)
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: WorkoutResponse = response.json();
    assert_eq!(created.workout.workout_type, "general");
    assert_eq!(created.workout.intensity, "medium");
    assert_eq!(created.workout.status.as_str(), "planned");
    assert!(!created.workout.recommended_by_ai);
    assert!(created.workout.completed_at.is_none());
    assert!(created.workout.calories_burned.is_none());
}

#[tokio::test]
async fn test_create_completed_workout_reflected_in_stats() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (_user, auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    let response = AxumTestRequest::post("/workouts")
        .header("authorization", &auth)
        .json(&json!({
            "workout_type": "cardio",
            "duration_minutes": 30,
            "status": "completed"
        }))
        .send(app.clone())
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: WorkoutResponse = response.json();
    assert!(created.workout.completed_at.is_some());
    assert!(created.workout.calories_burned.is_none());

    let stats = AxumTestRequest::get("/workouts/stats")
        .header("authorization", &auth)
        .send(app)
        .await;
    assert_eq!(stats.status_code(), StatusCode::OK);
    let stats: WorkoutStats = stats.json();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.total_minutes_exercised, 30);
    assert_eq!(stats.total_calories_burned, 0);
}

#[tokio::test]
async fn test_create_workout_parses_schedule_timestamp() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (_user, auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    let ok = AxumTestRequest::post("/workouts")
        .header("authorization", &auth)
        .json(&json!({ "scheduled_for": "2025-09-01T06:30:00Z" }))
        .send(app.clone())
        .await;
    assert_eq!(ok.status_code(), StatusCode::CREATED);
    let created: WorkoutResponse = ok.json();
    assert!(created.workout.scheduled_for.is_some());

    let bad = AxumTestRequest::post("/workouts")
        .header("authorization", &auth)
        .json(&json!({ "scheduled_for": "next tuesday" }))
        .send(app)
        .await;
    assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_workouts_filters_by_status_with_matching_total() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (_user, auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    for status in ["planned", "planned", "completed"] {
        let response = AxumTestRequest::post("/workouts")
            .header("authorization", &auth)
            .json(&json!({ "status": status }))
            .send(app.clone())
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    let all = AxumTestRequest::get("/workouts")
        .header("authorization", &auth)
        .send(app.clone())
        .await;
    let all: WorkoutListResponse = all.json();
    assert_eq!(all.total, 3);
    assert_eq!(all.workouts.len(), 3);

    let planned = AxumTestRequest::get("/workouts?status=planned")
        .header("authorization", &auth)
        .send(app.clone())
        .await;
    let planned: WorkoutListResponse = planned.json();
    assert_eq!(planned.total, 2);
    assert!(planned
        .workouts
        .iter()
        .all(|w| w.status.as_str() == "planned"));

    let invalid = AxumTestRequest::get("/workouts?status=paused")
        .header("authorization", &auth)
        .send(app)
        .await;
    assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_workouts_tolerates_trailing_slash() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (_user, auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    let response = AxumTestRequest::get("/workouts/")
        .header("authorization", &auth)
        .send(app)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_completing_twice_keeps_first_completion_time() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (_user, auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    let created = AxumTestRequest::post("/workouts")
        .header("authorization", &auth)
        .json(&json!({ "workout_type": "legs" }))
        .send(app.clone())
        .await;
    let created: WorkoutResponse = created.json();
    let id = created.workout.id;

    let first = AxumTestRequest::put(&format!("/workouts/{id}"))
        .header("authorization", &auth)
        .json(&json!({ "status": "completed" }))
        .send(app.clone())
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let first: WorkoutResponse = first.json();
    let first_completed_at = first.workout.completed_at.unwrap();

    let second = AxumTestRequest::put(&format!("/workouts/{id}"))
        .header("authorization", &auth)
        .json(&json!({ "status": "completed", "notes": "again" }))
        .send(app)
        .await;
    assert_eq!(second.status_code(), StatusCode::OK);
    let second: WorkoutResponse = second.json();

    assert_eq!(second.workout.completed_at.unwrap(), first_completed_at);
    assert_eq!(second.workout.notes.as_deref(), Some("again"));
}

#[tokio::test]
async fn test_update_applies_only_present_fields() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (_user, auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    let created = AxumTestRequest::post("/workouts")
        .header("authorization", &auth)
        .json(&json!({
            "workout_type": "chest",
            "duration_minutes": 45,
            "notes": "heavy day"
        }))
        .send(app.clone())
        .await;
    let created: WorkoutResponse = created.json();

    let updated = AxumTestRequest::put(&format!("/workouts/{}", created.workout.id))
        .header("authorization", &auth)
        .json(&json!({ "calories_burned": 350 }))
        .send(app)
        .await;
    let updated: WorkoutResponse = updated.json();

    assert_eq!(updated.workout.calories_burned, Some(350));
    assert_eq!(updated.workout.duration_minutes, Some(45));
    assert_eq!(updated.workout.notes.as_deref(), Some("heavy day"));
}

#[tokio::test]
async fn test_delete_other_users_workout_is_not_found() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (_owner, owner_auth) = create_test_user(&resources).await.unwrap();
    let (_other, other_auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    let created = AxumTestRequest::post("/workouts")
        .header("authorization", &owner_auth)
        .json(&json!({ "workout_type": "cardio" }))
        .send(app.clone())
        .await;
    let created: WorkoutResponse = created.json();
    let id = created.workout.id;

    let delete = AxumTestRequest::delete(&format!("/workouts/{id}"))
        .header("authorization", &other_auth)
        .send(app.clone())
        .await;
    assert_eq!(delete.status_code(), StatusCode::NOT_FOUND);

    // The record is intact for its owner
    let list = AxumTestRequest::get("/workouts")
        .header("authorization", &owner_auth)
        .send(app)
        .await;
    let list: WorkoutListResponse = list.json();
    assert_eq!(list.total, 1);
}

#[tokio::test]
async fn test_delete_own_workout() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (_user, auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    let created = AxumTestRequest::post("/workouts")
        .header("authorization", &auth)
        .json(&json!({}))
        .send(app.clone())
        .await;
    let created: WorkoutResponse = created.json();

    let delete = AxumTestRequest::delete(&format!("/workouts/{}", created.workout.id))
        .header("authorization", &auth)
        .send(app.clone())
        .await;
    assert_eq!(delete.status_code(), StatusCode::OK);

    let again = AxumTestRequest::delete(&format!("/workouts/{}", created.workout.id))
        .header("authorization", &auth)
        .send(app)
        .await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_with_no_completed_workouts_are_zero() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (_user, auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    let response = AxumTestRequest::post("/workouts")
        .header("authorization", &auth)
        .json(&json!({ "status": "planned", "duration_minutes": 60 }))
        .send(app.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let stats = AxumTestRequest::get("/workouts/stats")
        .header("authorization", &auth)
        .send(app)
        .await;
    let stats: WorkoutStats = stats.json();

    assert_eq!(stats.total_workouts, 1);
    assert_eq!(stats.planned, 1);
    assert_eq!(stats.completed, 0);
    assert_eq!(stats.total_calories_burned, 0);
    assert_eq!(stats.total_minutes_exercised, 0);
}
