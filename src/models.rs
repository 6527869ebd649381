// ABOUTME: Core data models for the FitCoach API
// ABOUTME: Defines User, Workout, ChatMessage and ProgressLog record types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Contributors

//! # Data Models
//!
//! Core data structures used throughout the FitCoach server. All records
//! serialize to flat JSON objects for API responses; the password hash is
//! never serialized.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// A registered user with optional profile fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,
    /// Email address (unique)
    pub email: String,
    /// Display handle (unique)
    pub username: String,
    /// Bcrypt hash of the password, never exposed through the API
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Full display name
    pub full_name: Option<String>,
    /// Age in years
    pub age: Option<i64>,
    /// Body weight in kilograms
    pub weight: Option<f64>,
    /// Height in centimeters
    pub height: Option<f64>,
    /// Self-reported gender
    pub gender: Option<String>,
    /// Self-assessed level: beginner, intermediate, advanced
    pub fitness_level: Option<String>,
    /// Stated goal: weight_loss, muscle_gain, general_fitness
    pub fitness_goal: Option<String>,
    /// Account creation time
    pub created_at: DateTime<Utc>,
    /// Last profile modification time
    pub updated_at: DateTime<Utc>,
    /// Last authenticated interaction time
    pub last_active: DateTime<Utc>,
}

impl User {
    /// Create a new user with a freshly generated ID
    #[must_use]
    pub fn new(email: String, username: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            password_hash,
            full_name: None,
            age: None,
            weight: None,
            height: None,
            gender: None,
            fitness_level: None,
            fitness_goal: None,
            created_at: now,
            updated_at: now,
            last_active: now,
        }
    }
}

/// Lifecycle status of a workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutStatus {
    /// Scheduled but not yet performed
    Planned,
    /// Performed; `completed_at` records the first completion
    Completed,
    /// Deliberately not performed
    Skipped,
}

impl WorkoutStatus {
    /// Stable string form used in the database
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
        }
    }
}

impl Display for WorkoutStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutStatus {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s {
            "planned" => Ok(Self::Planned),
            "completed" => Ok(Self::Completed),
            "skipped" => Ok(Self::Skipped),
            other => Err(AppError::invalid_input(format!(
                "Invalid workout status: {other}"
            ))),
        }
    }
}

/// A single logged or planned workout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    /// Unique workout ID
    pub id: i64,
    /// Owning user
    pub user_id: Uuid,
    /// Free-form type: chest, legs, cardio, general, ...
    pub workout_type: String,
    /// Session length in minutes
    pub duration_minutes: Option<i64>,
    /// Estimated energy expenditure
    pub calories_burned: Option<i64>,
    /// Free-form intensity: low, medium, high (unvalidated)
    pub intensity: String,
    /// Whether the AI coach suggested this workout
    pub recommended_by_ai: bool,
    /// Coach confidence for AI-recommended workouts
    pub ai_confidence: Option<f64>,
    /// Lifecycle status
    pub status: WorkoutStatus,
    /// Free-form notes
    pub notes: Option<String>,
    /// When the workout is scheduled
    pub scheduled_for: Option<DateTime<Utc>>,
    /// Set once, on the first transition to completed
    pub completed_at: Option<DateTime<Utc>>,
    /// Record creation time
    pub created_at: DateTime<Utc>,
}

/// One chat exchange with the AI coach: the user message and the reply,
/// plus the collaborator's metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message ID
    pub id: i64,
    /// Owning user
    pub user_id: Uuid,
    /// User's message text
    pub message: String,
    /// Coach's reply text (always present)
    pub response: String,
    /// Emotion detected by the collaborator
    pub emotion_detected: Option<String>,
    /// Intent detected by the collaborator
    pub intent_detected: Option<String>,
    /// Estimated user energy level
    pub energy_level: Option<i64>,
    /// Collaborator confidence in [0, 1]
    pub confidence_score: Option<f64>,
    /// Contributing subsystems, serialized as a flat JSON array string
    pub brains_used: Option<String>,
    /// Collaborator processing latency in milliseconds
    pub processing_time_ms: Option<f64>,
    /// Exchange time
    pub created_at: DateTime<Utc>,
}

/// A timestamped body measurement entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressLog {
    /// Unique log ID
    pub id: i64,
    /// Owning user
    pub user_id: Uuid,
    /// Body weight in kilograms
    pub weight: Option<f64>,
    /// Body fat percentage
    pub body_fat_percentage: Option<f64>,
    /// Muscle mass in kilograms
    pub muscle_mass: Option<f64>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Self-reported mood
    pub mood: Option<String>,
    /// Self-reported energy level, 1-100
    pub energy_level: Option<i64>,
    /// Measurement time
    pub logged_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workout_status_round_trip() {
        for status in [
            WorkoutStatus::Planned,
            WorkoutStatus::Completed,
            WorkoutStatus::Skipped,
        ] {
            assert_eq!(status.as_str().parse::<WorkoutStatus>().unwrap(), status);
        }
        assert!("paused".parse::<WorkoutStatus>().is_err());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User::new(
            "test@example.com".into(),
            "tester".into(),
            "$2b$12$secret".into(),
        );
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "test@example.com");
    }
}
