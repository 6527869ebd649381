// ABOUTME: Chat route handlers for AI coach interaction
// ABOUTME: Forwards messages to the coach collaborator and persists exchanges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Contributors

//! Chat routes
//!
//! `POST /chat/message` forwards the message with a profile snapshot to the
//! coach collaborator, persists the exchange together with the caller's
//! last-active bump in one transaction, and returns the reply with its
//! metadata. A collaborator failure degrades to an apology reply instead of
//! an error response.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::authenticate;
use crate::coach::{CoachProfile, CoachReply, CoachStats, SafetyStatus};
use crate::database::NewChatMessage;
use crate::errors::AppError;
use crate::models::ChatMessage;
use crate::server::ServerResources;

/// Request to send a message to the coach
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Message text; empty or whitespace-only is rejected
    #[serde(default)]
    pub message: String,
}

/// Metadata echoed back with each reply
#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyMetadata {
    pub emotion: Option<String>,
    pub intent: Option<String>,
    pub energy_level: Option<i64>,
    pub confidence: Option<f64>,
    pub brains_used: Vec<String>,
    pub processing_time_ms: f64,
}

/// Response for a sent message
#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub message_id: i64,
    pub response: String,
    pub workout_recommendation: Option<String>,
    pub safety_status: Option<SafetyStatus>,
    pub metadata: ReplyMetadata,
}

/// Query parameters for chat history paging
#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    /// Maximum number of exchanges to return
    #[serde(default = "default_history_limit")]
    pub limit: i64,
    /// Offset for pagination
    #[serde(default)]
    pub offset: i64,
}

const fn default_history_limit() -> i64 {
    50
}

/// Response for chat history
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub messages: Vec<ChatMessage>,
    pub total: i64,
}

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create all chat routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/chat/message", post(Self::send_message))
            .route("/chat/history", get(Self::history))
            .route("/chat/stats", get(Self::coach_stats))
            .with_state(resources)
    }

    /// Send a message to the coach and persist the exchange
    async fn send_message(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<SendMessageRequest>,
    ) -> Result<Json<SendMessageResponse>, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let user = resources
            .database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let message = request.message.trim();
        if message.is_empty() {
            return Err(AppError::missing_field("Message required"));
        }

        let profile = CoachProfile::from(&user);
        let reply = match resources.coach.chat(message, &profile).await {
            Ok(reply) => reply,
            Err(e) => {
                // The collaborator failing must not fail the request
                warn!("Coach collaborator failed, serving fallback reply: {e}");
                CoachReply::fallback()
            }
        };

        let brains_used = serde_json::to_string(&reply.brains_used)
            .map_err(|e| AppError::internal(format!("Metadata serialization failed: {e}")))?;

        let stored = resources
            .database
            .record_exchange(&NewChatMessage {
                user_id,
                message: message.to_owned(),
                response: reply.response.clone(),
                emotion_detected: reply.emotion_detected.clone(),
                intent_detected: reply.intent_detected.clone(),
                energy_level: reply.energy_level,
                confidence_score: reply.confidence_score,
                brains_used: Some(brains_used),
                processing_time_ms: Some(reply.processing_time_ms),
            })
            .await?;

        Ok(Json(SendMessageResponse {
            message_id: stored.id,
            response: reply.response,
            workout_recommendation: reply.workout_recommendation,
            safety_status: reply.safety_status,
            metadata: ReplyMetadata {
                emotion: reply.emotion_detected,
                intent: reply.intent_detected,
                energy_level: reply.energy_level,
                confidence: reply.confidence_score,
                brains_used: reply.brains_used,
                processing_time_ms: reply.processing_time_ms,
            },
        }))
    }

    /// Page through the caller's chat history, most recent first
    async fn history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<HistoryQuery>,
    ) -> Result<Json<HistoryResponse>, AppError> {
        let user_id = authenticate(&headers, &resources)?;

        let messages = resources
            .database
            .list_chat_messages(user_id, query.limit, query.offset)
            .await?;
        let total = resources.database.count_chat_messages(user_id).await?;

        Ok(Json(HistoryResponse { messages, total }))
    }

    /// Pass through the collaborator's operational counters
    async fn coach_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Json<CoachStats>, AppError> {
        authenticate(&headers, &resources)?;

        let stats = resources
            .coach
            .stats()
            .map_err(|e| AppError::external_service("coach", e.to_string()))?;

        Ok(Json(stats))
    }
}
