// ABOUTME: Chat exchange database operations
// ABOUTME: Persists coach exchanges transactionally together with user activity

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::ChatMessage;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Fields required to insert a chat exchange; the database assigns id and
/// the exchange time
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    /// Owning user
    pub user_id: Uuid,
    /// User's message text
    pub message: String,
    /// Coach's reply text
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
}

fn row_to_chat_message(row: &SqliteRow) -> AppResult<ChatMessage> {
    let user_id: String = row.get("user_id");
    Ok(ChatMessage {
        id: row.get("id"),
        user_id: Uuid::parse_str(&user_id)
            .map_err(|e| AppError::database(format!("Invalid user id in store: {e}")))?,
        message: row.get("message"),
        response: row.get("response"),
        emotion_detected: row.get("emotion_detected"),
        intent_detected: row.get("intent_detected"),
        energy_level: row.get("energy_level"),
        confidence_score: row.get("confidence_score"),
        brains_used: row.get("brains_used"),
        processing_time_ms: row.get("processing_time_ms"),
        created_at: row.get("created_at"),
    })
}

impl Database {
    /// Create the chat_messages table
    pub(super) async fn migrate_chat(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS chat_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                message TEXT NOT NULL,
                response TEXT NOT NULL,
                emotion_detected TEXT,
                intent_detected TEXT,
                energy_level INTEGER,
                confidence_score REAL,
                brains_used TEXT,
                processing_time_ms REAL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_chat_user_created \
             ON chat_messages(user_id, created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persist one exchange and bump the user's last-active timestamp in a
    /// single transaction; either both writes land or neither does
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails; nothing is persisted then.
    pub async fn record_exchange(&self, new: &NewChatMessage) -> AppResult<ChatMessage> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            INSERT INTO chat_messages (user_id, message, response, emotion_detected,
                                       intent_detected, energy_level, confidence_score,
                                       brains_used, processing_time_ms, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(new.user_id.to_string())
        .bind(&new.message)
        .bind(&new.response)
        .bind(&new.emotion_detected)
        .bind(&new.intent_detected)
        .bind(new.energy_level)
        .bind(new.confidence_score)
        .bind(&new.brains_used)
        .bind(new.processing_time_ms)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET last_active = $2 WHERE id = $1")
            .bind(new.user_id.to_string())
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(ChatMessage {
            id: result.last_insert_rowid(),
            user_id: new.user_id,
            message: new.message.clone(),
            response: new.response.clone(),
            emotion_detected: new.emotion_detected.clone(),
            intent_detected: new.intent_detected.clone(),
            energy_level: new.energy_level,
            confidence_score: new.confidence_score,
            brains_used: new.brains_used.clone(),
            processing_time_ms: new.processing_time_ms,
            created_at: now,
        })
    }

    /// List a user's exchanges, most recent first, with limit/offset paging
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_chat_messages(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<ChatMessage>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, message, response, emotion_detected, intent_detected,
                   energy_level, confidence_score, brains_used, processing_time_ms, created_at
            FROM chat_messages
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_chat_message).collect()
    }

    /// Count a user's exchanges
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_chat_messages(&self, user_id: Uuid) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM chat_messages WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("n"))
    }
}
