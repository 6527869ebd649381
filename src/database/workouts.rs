// ABOUTME: Workout database operations
// ABOUTME: Handles workout CRUD, status filtering, and aggregate statistics

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Workout, WorkoutStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Fields required to insert a workout; the database assigns id and
/// creation time
#[derive(Debug, Clone)]
pub struct NewWorkout {
    /// Owning user
    pub user_id: Uuid,
    /// Free-form type, defaults to "general" at the route layer
    pub workout_type: String,
    /// Session length in minutes
    pub duration_minutes: Option<i64>,
    /// Estimated energy expenditure
    pub calories_burned: Option<i64>,
    /// Free-form intensity
    pub intensity: String,
    /// Whether the AI coach suggested this workout
    pub recommended_by_ai: bool,
    /// Coach confidence for AI-recommended workouts
    pub ai_confidence: Option<f64>,
    /// Initial lifecycle status
    pub status: WorkoutStatus,
    /// Free-form notes
    pub notes: Option<String>,
    /// When the workout is scheduled
    pub scheduled_for: Option<DateTime<Utc>>,
}

/// Aggregate workout statistics for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutStats {
    /// All workouts regardless of status
    pub total_workouts: i64,
    /// Workouts with status completed
    pub completed: i64,
    /// Workouts with status planned
    pub planned: i64,
    /// Calories summed over completed workouts, zero when none
    pub total_calories_burned: i64,
    /// Minutes summed over completed workouts, zero when none
    pub total_minutes_exercised: i64,
}

fn row_to_workout(row: &SqliteRow) -> AppResult<Workout> {
    let status: String = row.get("status");
    let user_id: String = row.get("user_id");
    Ok(Workout {
        id: row.get("id"),
        user_id: Uuid::parse_str(&user_id)
            .map_err(|e| AppError::database(format!("Invalid user id in store: {e}")))?,
        workout_type: row.get("workout_type"),
        duration_minutes: row.get("duration_minutes"),
        calories_burned: row.get("calories_burned"),
        intensity: row.get("intensity"),
        recommended_by_ai: row.get("recommended_by_ai"),
        ai_confidence: row.get("ai_confidence"),
        status: status.parse()?,
        notes: row.get("notes"),
        scheduled_for: row.get("scheduled_for"),
        completed_at: row.get("completed_at"),
        created_at: row.get("created_at"),
    })
}

const WORKOUT_COLUMNS: &str = "id, user_id, workout_type, duration_minutes, calories_burned, \
                               intensity, recommended_by_ai, ai_confidence, status, notes, \
                               scheduled_for, completed_at, created_at";

impl Database {
    /// Create the workouts table
    pub(super) async fn migrate_workouts(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                workout_type TEXT NOT NULL,
                duration_minutes INTEGER,
                calories_burned INTEGER,
                intensity TEXT NOT NULL,
                recommended_by_ai INTEGER NOT NULL DEFAULT 0,
                ai_confidence REAL,
                status TEXT NOT NULL DEFAULT 'planned'
                    CHECK (status IN ('planned', 'completed', 'skipped')),
                notes TEXT,
                scheduled_for TEXT,
                completed_at TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workouts_user_created ON workouts(user_id, created_at)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workouts_user_status ON workouts(user_id, status)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a workout and return the stored record
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_workout(&self, new: &NewWorkout) -> AppResult<Workout> {
        let created_at = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO workouts (user_id, workout_type, duration_minutes, calories_burned,
                                  intensity, recommended_by_ai, ai_confidence, status, notes,
                                  scheduled_for, completed_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(new.user_id.to_string())
        .bind(&new.workout_type)
        .bind(new.duration_minutes)
        .bind(new.calories_burned)
        .bind(&new.intensity)
        .bind(new.recommended_by_ai)
        .bind(new.ai_confidence)
        .bind(new.status.as_str())
        .bind(&new.notes)
        .bind(new.scheduled_for)
        .bind(match new.status {
            // A workout logged directly as completed carries its completion time
            WorkoutStatus::Completed => Some(created_at),
            WorkoutStatus::Planned | WorkoutStatus::Skipped => None,
        })
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Workout {
            id: result.last_insert_rowid(),
            user_id: new.user_id,
            workout_type: new.workout_type.clone(),
            duration_minutes: new.duration_minutes,
            calories_burned: new.calories_burned,
            intensity: new.intensity.clone(),
            recommended_by_ai: new.recommended_by_ai,
            ai_confidence: new.ai_confidence,
            status: new.status,
            notes: new.notes.clone(),
            scheduled_for: new.scheduled_for,
            completed_at: match new.status {
                WorkoutStatus::Completed => Some(created_at),
                WorkoutStatus::Planned | WorkoutStatus::Skipped => None,
            },
            created_at,
        })
    }

    /// Get one workout, scoped to its owner
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored status is invalid.
    pub async fn get_workout(&self, workout_id: i64, user_id: Uuid) -> AppResult<Option<Workout>> {
        let row = sqlx::query(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1 AND user_id = $2"
        ))
        .bind(workout_id)
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_workout(&r)).transpose()
    }

    /// List a user's workouts, most recent first, optionally filtered by
    /// status
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_workouts(
        &self,
        user_id: Uuid,
        status: Option<WorkoutStatus>,
        limit: i64,
    ) -> AppResult<Vec<Workout>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "SELECT {WORKOUT_COLUMNS} FROM workouts \
                     WHERE user_id = $1 AND status = $2 \
                     ORDER BY created_at DESC, id DESC LIMIT $3"
                ))
                .bind(user_id.to_string())
                .bind(status.as_str())
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {WORKOUT_COLUMNS} FROM workouts \
                     WHERE user_id = $1 \
                     ORDER BY created_at DESC, id DESC LIMIT $2"
                ))
                .bind(user_id.to_string())
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(row_to_workout).collect()
    }

    /// Count a user's workouts with the same filter as `list_workouts`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_workouts(
        &self,
        user_id: Uuid,
        status: Option<WorkoutStatus>,
    ) -> AppResult<i64> {
        let row = match status {
            Some(status) => {
                sqlx::query("SELECT COUNT(*) AS n FROM workouts WHERE user_id = $1 AND status = $2")
                    .bind(user_id.to_string())
                    .bind(status.as_str())
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT COUNT(*) AS n FROM workouts WHERE user_id = $1")
                    .bind(user_id.to_string())
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(row.get("n"))
    }

    /// Count a user's workouts created at or after the given instant
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_workouts_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM workouts WHERE user_id = $1 AND created_at >= $2",
        )
        .bind(user_id.to_string())
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("n"))
    }

    /// Persist the mutable fields of an already-loaded workout
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update_workout(&self, workout: &Workout) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE workouts SET
                status = $3,
                duration_minutes = $4,
                calories_burned = $5,
                notes = $6,
                intensity = $7,
                completed_at = $8
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(workout.id)
        .bind(workout.user_id.to_string())
        .bind(workout.status.as_str())
        .bind(workout.duration_minutes)
        .bind(workout.calories_burned)
        .bind(&workout.notes)
        .bind(&workout.intensity)
        .bind(workout.completed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a workout, scoped to its owner; returns whether a row went away
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_workout(&self, workout_id: i64, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Aggregate statistics over a user's workouts; sums cover completed
    /// workouts only and are zero (not null) when nothing matches
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn workout_stats(&self, user_id: Uuid) -> AppResult<WorkoutStats> {
        let row = sqlx::query(
            r"
            SELECT
                COUNT(*) AS total_workouts,
                COALESCE(SUM(status = 'completed'), 0) AS completed,
                COALESCE(SUM(status = 'planned'), 0) AS planned,
                COALESCE(SUM(CASE WHEN status = 'completed' THEN calories_burned END), 0)
                    AS total_calories_burned,
                COALESCE(SUM(CASE WHEN status = 'completed' THEN duration_minutes END), 0)
                    AS total_minutes_exercised
            FROM workouts
            WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(WorkoutStats {
            total_workouts: row.get("total_workouts"),
            completed: row.get("completed"),
            planned: row.get("planned"),
            total_calories_burned: row.get("total_calories_burned"),
            total_minutes_exercised: row.get("total_minutes_exercised"),
        })
    }
}
