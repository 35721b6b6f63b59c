//! Kabos Game Engine
//!
//! Platform-agnostic core for the Kabos escape-room arithmetic quiz.
//! This crate owns question generation and stage progression without any
//! rendering, audio playback or asset handling.

pub mod config;
pub mod constants;
pub mod controller;
pub mod generator;
pub mod media;
pub mod question;
pub mod rng;
pub mod stage;
pub mod state;

// Re-export commonly used types
pub use config::{QuizConfig, QuizConfigError, ToastConfig};
pub use controller::{Intent, IntentError, QuizController, Transition, Verdict};
pub use generator::{QuestionGenerator, generate, generate_with_attempts, unique_choices};
pub use media::{AudioGate, LifecycleEvent, MediaHooks, SilentMedia};
pub use question::{ChoiceSet, Expression, Question};
pub use rng::{CountingRng, derive_stream_seed};
pub use stage::Stage;
pub use state::{GameState, Screen, Toast, ToastSeverity};
