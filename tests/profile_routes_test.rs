// ABOUTME: Integration tests for profile, progress, and statistics routes
// ABOUTME: Covers field-presence updates, explicit nulls, and weekly aggregates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{create_test_resources, create_test_user};
use fitcoach_server::routes::profile::{
    ProfileResponse, ProfileStatisticsResponse, ProfileUpdatedResponse, ProgressListResponse,
    ProgressLoggedResponse,
};
use fitcoach_server::server::app_router;
use helpers::axum_test::AxumTestRequest;
use serde_json::json;

#[tokio::test]
async fn test_get_profile_returns_caller() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (user, auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    let response = AxumTestRequest::get("/profile")
        .header("authorization", &auth)
        .send(app)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let profile: ProfileResponse = response.json();
    assert_eq!(profile.user.id, user.id);
    assert!(!response.body().contains("password_hash"));
}

#[tokio::test]
async fn test_get_profile_for_deleted_user_is_not_found() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (user, auth) = create_test_user(&resources).await.unwrap();
    resources.database.delete_user(user.id).await.unwrap();
    let app = app_router(resources);

    let response = AxumTestRequest::get("/profile")
        .header("authorization", &auth)
        .send(app)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_profile_applies_only_present_fields() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (_user, auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    let first = AxumTestRequest::put("/profile")
        .header("authorization", &auth)
        .json(&json!({
            "full_name": "Alex Doe",
            "age": 31,
            "fitness_level": "intermediate"
        }))
        .send(app.clone())
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);

    // A second partial update must not clobber fields it does not mention
    let second = AxumTestRequest::put("/profile")
        .header("authorization", &auth)
        .json(&json!({ "weight": 74.5 }))
        .send(app)
        .await;
    assert_eq!(second.status_code(), StatusCode::OK);
    let updated: ProfileUpdatedResponse = second.json();

    assert_eq!(updated.user.full_name.as_deref(), Some("Alex Doe"));
    assert_eq!(updated.user.age, Some(31));
    assert_eq!(updated.user.fitness_level.as_deref(), Some("intermediate"));
    assert_eq!(updated.user.weight, Some(74.5));
}

#[tokio::test]
async fn test_update_profile_empty_body_only_bumps_updated_at() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (user, auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    let response = AxumTestRequest::put("/profile")
        .header("authorization", &auth)
        .json(&json!({}))
        .send(app)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: ProfileUpdatedResponse = response.json();

    assert_eq!(updated.user.email, user.email);
    assert_eq!(updated.user.full_name, user.full_name);
    assert_eq!(updated.user.age, user.age);
    assert!(updated.user.updated_at > user.updated_at);
}

#[tokio::test]
async fn test_update_profile_explicit_null_clears_field() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (_user, auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    AxumTestRequest::put("/profile")
        .header("authorization", &auth)
        .json(&json!({ "full_name": "Alex Doe" }))
        .send(app.clone())
        .await;

    let cleared = AxumTestRequest::put("/profile")
        .header("authorization", &auth)
        .json(&json!({ "full_name": null }))
        .send(app)
        .await;
    assert_eq!(cleared.status_code(), StatusCode::OK);
    let cleared: ProfileUpdatedResponse = cleared.json();

    assert_eq!(cleared.user.full_name, None);
}

#[tokio::test]
async fn test_progress_log_and_list_most_recent_first() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (_user, auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    for weight in [80.0, 79.2, 78.8] {
        let response = AxumTestRequest::post("/profile/progress")
            .header("authorization", &auth)
            .json(&json!({ "weight": weight, "mood": "good", "energy_level": 70 }))
            .send(app.clone())
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let logged: ProgressLoggedResponse = response.json();
        assert_eq!(logged.log.weight, Some(weight));
    }

    let list = AxumTestRequest::get("/profile/progress?limit=2")
        .header("authorization", &auth)
        .send(app)
        .await;
    assert_eq!(list.status_code(), StatusCode::OK);
    let list: ProgressListResponse = list.json();

    assert_eq!(list.total, 3);
    assert_eq!(list.progress_logs.len(), 2);
    // Most recent entry first
    assert_eq!(list.progress_logs[0].weight, Some(78.8));
    assert_eq!(list.progress_logs[1].weight, Some(79.2));
}

#[tokio::test]
async fn test_statistics_aggregate_completed_workouts() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (_user, auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    for (status, minutes, calories) in [
        ("completed", 30, 250),
        ("completed", 45, 400),
        ("planned", 60, 500),
    ] {
        let response = AxumTestRequest::post("/workouts")
            .header("authorization", &auth)
            .json(&json!({
                "status": status,
                "duration_minutes": minutes,
                "calories_burned": calories
            }))
            .send(app.clone())
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    let stats = AxumTestRequest::get("/profile/statistics")
        .header("authorization", &auth)
        .send(app)
        .await;
    assert_eq!(stats.status_code(), StatusCode::OK);
    let stats: ProfileStatisticsResponse = stats.json();

    assert_eq!(stats.total_workouts, 3);
    // Everything was created just now, within the current week
    assert_eq!(stats.workouts_this_week, 3);
    assert_eq!(stats.total_minutes_exercised, 75);
    assert_eq!(stats.total_calories_burned, 650);
}

#[tokio::test]
async fn test_statistics_with_no_workouts_are_zero() {
    let (resources, _guard) = create_test_resources().await.unwrap();
    let (_user, auth) = create_test_user(&resources).await.unwrap();
    let app = app_router(resources);

    let stats = AxumTestRequest::get("/profile/statistics")
        .header("authorization", &auth)
        .send(app)
        .await;
    let stats: ProfileStatisticsResponse = stats.json();

    assert_eq!(stats.total_workouts, 0);
    assert_eq!(stats.workouts_this_week, 0);
    assert_eq!(stats.total_minutes_exercised, 0);
    assert_eq!(stats.total_calories_burned, 0);
}
