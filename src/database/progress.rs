// ABOUTME: Progress log database operations
// ABOUTME: Handles measurement inserts and most-recent-first listing

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::ProgressLog;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Fields required to insert a progress log; the database assigns id and
/// the measurement time
#[derive(Debug, Clone)]
pub struct NewProgressLog {
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
}

fn row_to_progress_log(row: &SqliteRow) -> AppResult<ProgressLog> {
    let user_id: String = row.get("user_id");
    Ok(ProgressLog {
        id: row.get("id"),
        user_id: Uuid::parse_str(&user_id)
            .map_err(|e| AppError::database(format!("Invalid user id in store: {e}")))?,
        weight: row.get("weight"),
        body_fat_percentage: row.get("body_fat_percentage"),
        muscle_mass: row.get("muscle_mass"),
        notes: row.get("notes"),
        mood: row.get("mood"),
        energy_level: row.get("energy_level"),
        logged_at: row.get("logged_at"),
    })
}

impl Database {
    /// Create the progress_logs table
    pub(super) async fn migrate_progress(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS progress_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                weight REAL,
                body_fat_percentage REAL,
                muscle_mass REAL,
                notes TEXT,
                mood TEXT,
                energy_level INTEGER,
                logged_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_progress_user_logged \
             ON progress_logs(user_id, logged_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a progress log and return the stored record
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_progress_log(&self, new: &NewProgressLog) -> AppResult<ProgressLog> {
        let logged_at = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO progress_logs (user_id, weight, body_fat_percentage, muscle_mass,
                                       notes, mood, energy_level, logged_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(new.user_id.to_string())
        .bind(new.weight)
        .bind(new.body_fat_percentage)
        .bind(new.muscle_mass)
        .bind(&new.notes)
        .bind(&new.mood)
        .bind(new.energy_level)
        .bind(logged_at)
        .execute(&self.pool)
        .await?;

        Ok(ProgressLog {
            id: result.last_insert_rowid(),
            user_id: new.user_id,
            weight: new.weight,
            body_fat_percentage: new.body_fat_percentage,
            muscle_mass: new.muscle_mass,
            notes: new.notes.clone(),
            mood: new.mood.clone(),
            energy_level: new.energy_level,
            logged_at,
        })
    }

    /// List a user's progress logs, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_progress_logs(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<ProgressLog>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, weight, body_fat_percentage, muscle_mass, notes, mood,
                   energy_level, logged_at
            FROM progress_logs
            WHERE user_id = $1
            ORDER BY logged_at DESC, id DESC
            LIMIT $2
            ",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_progress_log).collect()
    }

    /// Count a user's progress logs
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_progress_logs(&self, user_id: Uuid) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM progress_logs WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("n"))
    }
}
