// ABOUTME: Response-generation collaborator interface for the AI coach
// ABOUTME: Defines the request/response contract and operational counters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Contributors

//! # Coach Collaborator
//!
//! The chat endpoint forwards user messages to a response-generation
//! collaborator behind the [`CoachService`] trait. The core makes no
//! availability or latency guarantee for it; a failing collaborator is
//! degraded into an apology reply at the route layer, never a 5xx.
//!
//! The collaborator instance is constructed once at startup and passed to
//! handlers through `ServerResources` - no global singleton.

mod keyword;

pub use keyword::KeywordCoach;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::User;

/// Safety assessment attached to a coach reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyStatus {
    /// Nothing concerning in the exchange
    Safe,
    /// The coach softened its advice (pain or injury mentioned)
    Caution,
    /// The coach overrode its advice entirely
    Intervention,
}

/// Minimal profile snapshot forwarded with each message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachProfile {
    /// User ID
    pub user_id: Uuid,
    /// Age in years
    pub age: Option<i64>,
    /// Body weight in kilograms
    pub weight: Option<f64>,
    /// Height in centimeters
    pub height: Option<f64>,
    /// Self-reported gender
    pub gender: Option<String>,
    /// Self-assessed fitness level
    pub fitness_level: Option<String>,
    /// Stated fitness goal
    pub fitness_goal: Option<String>,
}

impl From<&User> for CoachProfile {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            age: user.age,
            weight: user.weight,
            height: user.height,
            gender: user.gender.clone(),
            fitness_level: user.fitness_level.clone(),
            fitness_goal: user.fitness_goal.clone(),
        }
    }
}

/// Reply from the collaborator, with coarse metadata about how it was made
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachReply {
    /// Reply text shown to the user
    pub response: String,
    /// Suggested workout, when the coach has one
    pub workout_recommendation: Option<String>,
    /// Safety assessment, when the coach performed one
    pub safety_status: Option<SafetyStatus>,
    /// Collaborator confidence in [0, 1]
    pub confidence_score: Option<f64>,
    /// Detected emotion
    pub emotion_detected: Option<String>,
    /// Detected intent
    pub intent_detected: Option<String>,
    /// Estimated user energy level
    pub energy_level: Option<i64>,
    /// Subsystems that contributed to this reply
    pub brains_used: Vec<String>,
    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: f64,
}

impl CoachReply {
    /// Degraded reply used when the collaborator fails; neutral safety
    /// status, no recommendation
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            response: "I'm having trouble processing your request. Please try again.".into(),
            workout_recommendation: None,
            safety_status: Some(SafetyStatus::Safe),
            confidence_score: Some(0.0),
            emotion_detected: None,
            intent_detected: None,
            energy_level: None,
            brains_used: Vec::new(),
            processing_time_ms: 0.0,
        }
    }
}

/// Operational counters reported by the collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachStats {
    /// Total chat decisions made since startup
    pub total_decisions: u64,
    /// Calls into the language-analysis subsystem
    pub nlp_calls: u64,
    /// Calls into the recommendation subsystem
    pub ml_calls: u64,
    /// Calls into the rule subsystem
    pub logic_calls: u64,
    /// Calls into the phrasing subsystem
    pub personality_calls: u64,
    /// Replies where safety overrode the normal answer
    pub safety_interventions: u64,
    /// Mean processing time across all decisions
    pub average_response_time_ms: f64,
}

/// Response-generation collaborator contract
///
/// Implementations must be cheap to share (`Arc<dyn CoachService>`); the
/// server invokes `chat` inline on the request task.
#[async_trait]
pub trait CoachService: Send + Sync {
    /// Produce a reply for one user message with the profile snapshot
    ///
    /// # Errors
    ///
    /// Returns an error when the collaborator cannot produce a reply; the
    /// caller is expected to degrade, not propagate.
    async fn chat(&self, message: &str, profile: &CoachProfile) -> AppResult<CoachReply>;

    /// Report operational counters
    ///
    /// # Errors
    ///
    /// Returns an error when the collaborator cannot report.
    fn stats(&self) -> AppResult<CoachStats>;
}
