// ABOUTME: Stateless keyword-matching coach used as the default collaborator
// ABOUTME: Detects intent, emotion and safety terms; keeps process-lifetime counters

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use async_trait::async_trait;
use rand::seq::SliceRandom;

use super::{CoachProfile, CoachReply, CoachService, CoachStats, SafetyStatus};
use crate::errors::AppResult;

const WORKOUT_TERMS: &[&str] = &["workout", "exercise", "training", "train"];
const NUTRITION_TERMS: &[&str] = &["diet", "nutrition", "eat", "food", "meal"];
const WEIGHT_TERMS: &[&str] = &["weight", "lose", "gain"];
const SAFETY_TERMS: &[&str] = &["pain", "injury", "injured", "hurt", "dizzy", "faint"];

const GENERIC_REPLIES: &[&str] = &[
    "Great! Let's work on your fitness goals together!",
    "I'm here to help you achieve your fitness dreams!",
    "That's a great question! Let me help you with that.",
    "Stay motivated! You're doing awesome!",
    "Remember, consistency is key in fitness!",
];

fn contains_any(message: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| message.contains(term))
}

/// Keyword-matching coach. Replies are assembled from the detected intent,
/// the profile snapshot, and a coarse emotion guess; no model call happens.
pub struct KeywordCoach {
    total_decisions: AtomicU64,
    nlp_calls: AtomicU64,
    ml_calls: AtomicU64,
    logic_calls: AtomicU64,
    personality_calls: AtomicU64,
    safety_interventions: AtomicU64,
    /// Accumulated processing time in microseconds, for the stats average
    total_time_micros: AtomicU64,
}

impl KeywordCoach {
    /// Create a coach with zeroed counters
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_decisions: AtomicU64::new(0),
            nlp_calls: AtomicU64::new(0),
            ml_calls: AtomicU64::new(0),
            logic_calls: AtomicU64::new(0),
            personality_calls: AtomicU64::new(0),
            safety_interventions: AtomicU64::new(0),
            total_time_micros: AtomicU64::new(0),
        }
    }

    /// Coarse emotion and energy guess from message wording
    fn detect_emotion(message: &str) -> (&'static str, i64) {
        if contains_any(message, &["tired", "exhausted", "drained"]) {
            ("tired", 30)
        } else if contains_any(message, &["motivated", "excited", "great", "pumped"]) {
            ("motivated", 85)
        } else if contains_any(message, &["frustrated", "stuck", "hard", "can't"]) {
            ("frustrated", 45)
        } else {
            ("neutral", 60)
        }
    }

    /// Goal-keyed workout suggestion
    fn recommend_workout(profile: &CoachProfile) -> String {
        match profile.fitness_goal.as_deref() {
            Some("weight_loss") => "30-minute cardio session with intervals".into(),
            Some("muscle_gain") => "Upper-body strength training, 3 sets per exercise".into(),
            _ => "Balanced full-body routine".into(),
        }
    }
}

impl Default for KeywordCoach {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CoachService for KeywordCoach {
    async fn chat(&self, message: &str, profile: &CoachProfile) -> AppResult<CoachReply> {
        let started = Instant::now();
        let lowered = message.to_lowercase();

        // Emotion/intent detection and phrasing always run; the safety scan
        // is the rule subsystem
        self.nlp_calls.fetch_add(1, Ordering::Relaxed);
        self.logic_calls.fetch_add(1, Ordering::Relaxed);
        self.personality_calls.fetch_add(1, Ordering::Relaxed);

        let (emotion, energy_level) = Self::detect_emotion(&lowered);
        let mut brains_used = vec!["NLP".to_owned(), "Logic".to_owned()];

        let reply = if contains_any(&lowered, SAFETY_TERMS) {
            self.safety_interventions.fetch_add(1, Ordering::Relaxed);
            CoachReply {
                response: "Please stop and listen to your body. Rest today, and see a \
                           professional if the discomfort persists."
                    .into(),
                workout_recommendation: Some("REST".into()),
                safety_status: Some(SafetyStatus::Caution),
                confidence_score: Some(0.95),
                emotion_detected: Some(emotion.into()),
                intent_detected: Some("safety".into()),
                energy_level: Some(energy_level),
                brains_used: Vec::new(),
                processing_time_ms: 0.0,
            }
        } else if contains_any(&lowered, WORKOUT_TERMS) {
            self.ml_calls.fetch_add(1, Ordering::Relaxed);
            brains_used.push("ML".to_owned());
            let level = profile.fitness_level.as_deref().unwrap_or("beginner");
            CoachReply {
                response: format!(
                    "Based on your {level} level, I recommend starting with a balanced routine!"
                ),
                workout_recommendation: Some(Self::recommend_workout(profile)),
                safety_status: Some(SafetyStatus::Safe),
                confidence_score: Some(0.9),
                emotion_detected: Some(emotion.into()),
                intent_detected: Some("workout".into()),
                energy_level: Some(energy_level),
                brains_used: Vec::new(),
                processing_time_ms: 0.0,
            }
        } else if contains_any(&lowered, NUTRITION_TERMS) {
            CoachReply {
                response: "Nutrition is super important! Make sure you're eating a balanced \
                           diet with plenty of protein."
                    .into(),
                workout_recommendation: None,
                safety_status: Some(SafetyStatus::Safe),
                confidence_score: Some(0.9),
                emotion_detected: Some(emotion.into()),
                intent_detected: Some("nutrition".into()),
                energy_level: Some(energy_level),
                brains_used: Vec::new(),
                processing_time_ms: 0.0,
            }
        } else if contains_any(&lowered, WEIGHT_TERMS) {
            let goal = profile
                .fitness_goal
                .clone()
                .unwrap_or_else(|| "general fitness".into());
            CoachReply {
                response: format!(
                    "For your goal of {goal}, let's create a personalized plan together!"
                ),
                workout_recommendation: None,
                safety_status: Some(SafetyStatus::Safe),
                confidence_score: Some(0.85),
                emotion_detected: Some(emotion.into()),
                intent_detected: Some("goal_tracking".into()),
                energy_level: Some(energy_level),
                brains_used: Vec::new(),
                processing_time_ms: 0.0,
            }
        } else {
            let response = GENERIC_REPLIES
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(GENERIC_REPLIES[0]);
            CoachReply {
                response: response.into(),
                workout_recommendation: None,
                safety_status: Some(SafetyStatus::Safe),
                confidence_score: Some(0.6),
                emotion_detected: Some(emotion.into()),
                intent_detected: Some("general_fitness".into()),
                energy_level: Some(energy_level),
                brains_used: Vec::new(),
                processing_time_ms: 0.0,
            }
        };

        brains_used.push("Personality".to_owned());

        let elapsed_micros = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.total_decisions.fetch_add(1, Ordering::Relaxed);
        self.total_time_micros
            .fetch_add(elapsed_micros, Ordering::Relaxed);

        #[allow(clippy::cast_precision_loss)]
        let processing_time_ms = elapsed_micros as f64 / 1000.0;

        Ok(CoachReply {
            brains_used,
            processing_time_ms,
            ..reply
        })
    }

    fn stats(&self) -> AppResult<CoachStats> {
        let total_decisions = self.total_decisions.load(Ordering::Relaxed);
        let total_micros = self.total_time_micros.load(Ordering::Relaxed);

        #[allow(clippy::cast_precision_loss)]
        let average_response_time_ms = if total_decisions == 0 {
            0.0
        } else {
            total_micros as f64 / total_decisions as f64 / 1000.0
        };

        Ok(CoachStats {
            total_decisions,
            nlp_calls: self.nlp_calls.load(Ordering::Relaxed),
            ml_calls: self.ml_calls.load(Ordering::Relaxed),
            logic_calls: self.logic_calls.load(Ordering::Relaxed),
            personality_calls: self.personality_calls.load(Ordering::Relaxed),
            safety_interventions: self.safety_interventions.load(Ordering::Relaxed),
            average_response_time_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn profile(level: Option<&str>, goal: Option<&str>) -> CoachProfile {
        CoachProfile {
            user_id: Uuid::new_v4(),
            age: Some(30),
            weight: Some(75.0),
            height: Some(180.0),
            gender: None,
            fitness_level: level.map(Into::into),
            fitness_goal: goal.map(Into::into),
        }
    }

    #[tokio::test]
    async fn test_workout_intent_uses_fitness_level() {
        let coach = KeywordCoach::new();
        let reply = coach
            .chat("What workout should I do?", &profile(Some("advanced"), None))
            .await
            .unwrap();

        assert!(reply.response.contains("advanced"));
        assert_eq!(reply.intent_detected.as_deref(), Some("workout"));
        assert!(reply.workout_recommendation.is_some());
        assert!(reply.brains_used.contains(&"ML".to_owned()));
    }

    #[tokio::test]
    async fn test_weight_intent_uses_goal() {
        let coach = KeywordCoach::new();
        let reply = coach
            .chat("I want to lose a few kilos", &profile(None, Some("weight_loss")))
            .await
            .unwrap();

        assert!(reply.response.contains("weight_loss"));
        assert_eq!(reply.intent_detected.as_deref(), Some("goal_tracking"));
    }

    #[tokio::test]
    async fn test_safety_terms_trigger_intervention_counter() {
        let coach = KeywordCoach::new();
        let reply = coach
            .chat("My knee hurts during squats", &profile(None, None))
            .await
            .unwrap();

        assert_eq!(reply.safety_status, Some(SafetyStatus::Caution));
        assert_eq!(reply.workout_recommendation.as_deref(), Some("REST"));

        let stats = coach.stats().unwrap();
        assert_eq!(stats.safety_interventions, 1);
        assert_eq!(stats.total_decisions, 1);
    }

    #[tokio::test]
    async fn test_stats_counters_advance() {
        let coach = KeywordCoach::new();
        let p = profile(None, None);
        coach.chat("hello", &p).await.unwrap();
        coach.chat("tell me about my diet", &p).await.unwrap();

        let stats = coach.stats().unwrap();
        assert_eq!(stats.total_decisions, 2);
        assert_eq!(stats.nlp_calls, 2);
        assert_eq!(stats.personality_calls, 2);
    }

    #[tokio::test]
    async fn test_tired_message_lowers_energy() {
        let coach = KeywordCoach::new();
        let reply = coach
            .chat("I'm exhausted after work", &profile(None, None))
            .await
            .unwrap();

        assert_eq!(reply.emotion_detected.as_deref(), Some("tired"));
        assert_eq!(reply.energy_level, Some(30));
    }
}
