// ABOUTME: User management database operations
// ABOUTME: Handles registration, lookup, profile updates, and cascading deletion

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let id: String = row.get("id");
    Ok(User {
        id: Uuid::parse_str(&id)
            .map_err(|e| AppError::database(format!("Invalid user id in store: {e}")))?,
        email: row.get("email"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        full_name: row.get("full_name"),
        age: row.get("age"),
        weight: row.get("weight"),
        height: row.get("height"),
        gender: row.get("gender"),
        fitness_level: row.get("fitness_level"),
        fitness_goal: row.get("fitness_goal"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        last_active: row.get("last_active"),
    })
}

const USER_COLUMNS: &str = "id, email, username, password_hash, full_name, age, weight, height, \
                            gender, fitness_level, fitness_goal, created_at, updated_at, last_active";

impl Database {
    /// Create the users table
    pub(super) async fn migrate_users(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                full_name TEXT,
                age INTEGER,
                weight REAL,
                height REAL,
                gender TEXT,
                fitness_level TEXT,
                fitness_goal TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                last_active TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_username ON users(username)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email or username is already taken, or the
    /// insert fails.
    pub async fn create_user(&self, user: &User) -> AppResult<Uuid> {
        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(AppError::already_exists("Email already registered"));
        }
        if self.get_user_by_username(&user.username).await?.is_some() {
            return Err(AppError::already_exists("Username already taken"));
        }

        sqlx::query(
            r"
            INSERT INTO users (id, email, username, password_hash, full_name, age, weight, height,
                               gender, fitness_level, fitness_goal, created_at, updated_at, last_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.age)
        .bind(user.weight)
        .bind(user.height)
        .bind(&user.gender)
        .bind(&user.fitness_level)
        .bind(&user.fitness_goal)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(user.last_active)
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Get a user by username
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Persist the profile fields of an already-loaded user
    ///
    /// Handlers load the user, apply the request's field-presence changes in
    /// memory, then call this. The single UPDATE keeps the write atomic.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails or the user no longer exists.
    pub async fn update_profile(&self, user: &User) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users SET
                full_name = $2,
                age = $3,
                weight = $4,
                height = $5,
                gender = $6,
                fitness_level = $7,
                fitness_goal = $8,
                updated_at = $9
            WHERE id = $1
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.full_name)
        .bind(user.age)
        .bind(user.weight)
        .bind(user.height)
        .bind(&user.gender)
        .bind(&user.fitness_level)
        .bind(&user.fitness_goal)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }

        Ok(())
    }

    /// Update the user's last-active timestamp
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update_last_active(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_active = $2 WHERE id = $1")
            .bind(user_id.to_string())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a user and, through foreign-key cascade, all owned workouts,
    /// chat messages, and progress logs
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_user(&self, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
