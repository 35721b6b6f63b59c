//! Session tuning loaded from JSON or defaults.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    ATTEMPTS_PER_QUESTION, BACKGROUND_SLOTS, QUESTIONS_PER_STAGE, TOAST_CORRECT_MS,
    TOAST_WRONG_MS,
};

/// Errors raised when quiz configuration invariants are violated.
#[derive(Debug, Error)]
pub enum QuizConfigError {
    #[error("failed to parse quiz config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: u64,
        value: u64,
    },
}

/// Feedback timing for answer toasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastConfig {
    #[serde(default = "ToastConfig::default_correct_ms")]
    pub correct_ms: u64,
    #[serde(default = "ToastConfig::default_wrong_ms")]
    pub wrong_ms: u64,
}

impl ToastConfig {
    const fn default_correct_ms() -> u64 {
        TOAST_CORRECT_MS
    }

    const fn default_wrong_ms() -> u64 {
        TOAST_WRONG_MS
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            correct_ms: Self::default_correct_ms(),
            wrong_ms: Self::default_wrong_ms(),
        }
    }
}

/// Progression rules for a play session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default = "QuizConfig::default_questions_per_stage")]
    pub questions_per_stage: u32,
    #[serde(default = "QuizConfig::default_attempts_per_question")]
    pub attempts_per_question: u8,
    #[serde(default)]
    pub toast: ToastConfig,
    #[serde(default = "QuizConfig::default_background_slots")]
    pub background_slots: usize,
}

impl QuizConfig {
    const fn default_questions_per_stage() -> u32 {
        QUESTIONS_PER_STAGE
    }

    const fn default_attempts_per_question() -> u8 {
        ATTEMPTS_PER_QUESTION
    }

    const fn default_background_slots() -> usize {
        BACKGROUND_SLOTS
    }

    /// Parse a JSON document and validate it. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or violates a minimum.
    pub fn from_json(json: &str) -> Result<Self, QuizConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the invariants the controller relies on.
    ///
    /// # Errors
    ///
    /// Returns the first field found below its minimum.
    pub fn validate(&self) -> Result<(), QuizConfigError> {
        check_min(
            "questions_per_stage",
            1,
            u64::from(self.questions_per_stage),
        )?;
        check_min(
            "attempts_per_question",
            1,
            u64::from(self.attempts_per_question),
        )?;
        check_min(
            "background_slots",
            1,
            u64::try_from(self.background_slots).unwrap_or(u64::MAX),
        )
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions_per_stage: Self::default_questions_per_stage(),
            attempts_per_question: Self::default_attempts_per_question(),
            toast: ToastConfig::default(),
            background_slots: Self::default_background_slots(),
        }
    }
}

fn check_min(field: &'static str, min: u64, value: u64) -> Result<(), QuizConfigError> {
    if value < min {
        return Err(QuizConfigError::MinViolation { field, min, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_rules() {
        let cfg = QuizConfig::default();
        assert_eq!(cfg.questions_per_stage, 3);
        assert_eq!(cfg.attempts_per_question, 2);
        assert_eq!(cfg.toast.correct_ms, 700);
        assert_eq!(cfg.toast.wrong_ms, 900);
        assert_eq!(cfg.background_slots, 9);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = QuizConfig::from_json(r#"{ "questions_per_stage": 5, "toast": { "wrong_ms": 50 } }"#)
            .unwrap();
        assert_eq!(cfg.questions_per_stage, 5);
        assert_eq!(cfg.attempts_per_question, 2);
        assert_eq!(cfg.toast.correct_ms, 700);
        assert_eq!(cfg.toast.wrong_ms, 50);
        assert_eq!(QuizConfig::from_json("{}").unwrap(), QuizConfig::default());
    }

    #[test]
    fn rejects_zero_attempts_and_bad_json() {
        let err = QuizConfig::from_json(r#"{ "attempts_per_question": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            QuizConfigError::MinViolation {
                field: "attempts_per_question",
                ..
            }
        ));
        assert!(err.to_string().contains("at least 1"));

        let err = QuizConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, QuizConfigError::Parse(_)));
    }
}
