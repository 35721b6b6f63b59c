//! Progression state machine driving a play session.
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::QuizConfig;
use crate::constants::{TOAST_CORRECT_TEXT, TOAST_WRONG_TEXT};
use crate::generator::QuestionGenerator;
use crate::media::{AudioGate, LifecycleEvent, MediaHooks, SilentMedia};
use crate::stage::Stage;
use crate::state::{GameState, Screen, Toast, ToastSeverity};

/// Discrete player action dispatched by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "choice", rename_all = "snake_case")]
pub enum Intent {
    /// Skip button pressed or the intro video ended.
    SkipIntro,
    StartInstructions,
    StartRoom,
    /// Answer button at this index pressed.
    Answer(usize),
    Restart,
}

impl Intent {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SkipIntro => "skip_intro",
            Self::StartInstructions => "start_instructions",
            Self::StartRoom => "start_room",
            Self::Answer(_) => "answer",
            Self::Restart => "restart",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Answer(index) => write!(f, "answer({index})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Malformed intents. These are programmer errors in the host, never
/// player-facing conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("{intent} is not accepted on the {screen} screen")]
    WrongScreen { intent: &'static str, screen: Screen },
    #[error("answer dispatched with no active question")]
    NoActiveQuestion,
    #[error("choice {index} is out of range for {len} choices")]
    ChoiceOutOfRange { index: usize, len: usize },
}

/// How an answer was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Wrong { attempts_left: u8 },
    OutOfAttempts,
}

/// Result of one accepted intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: Screen,
    pub to: Screen,
    pub verdict: Option<Verdict>,
}

/// Owns the session state and is its only writer.
#[derive(Debug, Clone)]
pub struct QuizController<M: MediaHooks = SilentMedia> {
    config: QuizConfig,
    seed: u64,
    generator: QuestionGenerator,
    state: GameState,
    media: M,
    audio: AudioGate,
}

impl QuizController<SilentMedia> {
    /// Headless controller with default rules.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(QuizConfig::default(), seed)
    }

    /// Headless controller with explicit rules.
    ///
    /// # Panics
    ///
    /// Panics when the supplied configuration violates validation rules.
    #[must_use]
    pub fn with_config(config: QuizConfig, seed: u64) -> Self {
        Self::with_media(config, seed, SilentMedia)
    }
}

impl<M: MediaHooks> QuizController<M> {
    /// Controller wired to a media collaborator.
    ///
    /// # Panics
    ///
    /// Panics when the supplied configuration violates validation rules.
    #[must_use]
    pub fn with_media(config: QuizConfig, seed: u64, media: M) -> Self {
        config.validate().expect("valid quiz config");
        let generator =
            QuestionGenerator::from_seed(seed).with_attempts(config.attempts_per_question);
        Self {
            config,
            seed,
            generator,
            state: GameState::new(),
            media,
            audio: AudioGate::default(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Borrow the state without expiring feedback.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// State as it should be drawn now; stale toasts are dropped first.
    pub fn current_state(&mut self) -> &GameState {
        self.current_state_at(Instant::now())
    }

    pub fn current_state_at(&mut self, now: Instant) -> &GameState {
        self.state.expire_toast(now);
        &self.state
    }

    /// Owned copy for hosts that render off-thread or serialize.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    #[must_use]
    pub const fn media(&self) -> &M {
        &self.media
    }

    pub const fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    #[must_use]
    pub const fn audio_started(&self) -> bool {
        self.audio.started()
    }

    /// Background rotation for the active question under the configured slot count.
    #[must_use]
    pub fn background_slot(&self) -> Option<usize> {
        self.state.background_slot(self.config.background_slots)
    }

    /// Random draws consumed by question generation.
    #[must_use]
    pub const fn generator_draws(&self) -> u64 {
        self.generator.draws()
    }

    /// Restart question generation from a new seed. Progress is kept.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.generator.reseed(seed);
    }

    /// Forward a host lifecycle event to the audio layer. Never touches state.
    pub fn lifecycle(&mut self, event: LifecycleEvent) {
        log::debug!("lifecycle {event:?} on {}", self.state.screen());
        self.audio.lifecycle(event, &mut self.media);
    }

    /// Apply an intent, failing fast on anything malformed.
    ///
    /// # Panics
    ///
    /// Panics when the intent is not valid for the current state.
    pub fn dispatch(&mut self, intent: Intent) -> Transition {
        match self.try_dispatch(intent) {
            Ok(transition) => transition,
            Err(err) => panic!("invalid intent {intent}: {err}"),
        }
    }

    /// Apply an intent, rejecting malformed ones without touching state.
    ///
    /// # Errors
    ///
    /// Returns an error when the intent does not fit the current screen or
    /// names a choice that does not exist.
    pub fn try_dispatch(&mut self, intent: Intent) -> Result<Transition, IntentError> {
        self.try_dispatch_at(intent, Instant::now())
    }

    /// [`Self::try_dispatch`] with an explicit clock reading for feedback expiry.
    ///
    /// # Errors
    ///
    /// Same as [`Self::try_dispatch`].
    pub fn try_dispatch_at(
        &mut self,
        intent: Intent,
        now: Instant,
    ) -> Result<Transition, IntentError> {
        let from = self.state.screen();
        let verdict = match (from, intent) {
            (Screen::Intro, Intent::SkipIntro) => {
                self.audio.unlock(&mut self.media);
                self.state.set_screen(Screen::Instructions);
                None
            }
            (Screen::Instructions, Intent::StartInstructions) => {
                self.audio.start(&mut self.media);
                self.state.set_screen(Screen::Hub);
                None
            }
            (Screen::Hub, Intent::StartRoom) => {
                self.audio.start(&mut self.media);
                self.install_next_question();
                self.state.set_screen(Screen::Question);
                None
            }
            (Screen::Question, Intent::Answer(index)) => Some(self.answer(index, now)?),
            (Screen::Win | Screen::Lose, Intent::Restart) => {
                self.audio.pause(&mut self.media);
                self.state.reset();
                None
            }
            (screen, intent) => {
                return Err(IntentError::WrongScreen {
                    intent: intent.name(),
                    screen,
                });
            }
        };

        let to = self.state.screen();
        log::debug!(
            "{from} --{intent}--> {to} (stage {}, solved {}, verdict {verdict:?})",
            self.state.stage_index(),
            self.state.solved()
        );
        if to != from {
            self.media.on_screen_enter(to);
        }
        Ok(Transition { from, to, verdict })
    }

    fn answer(&mut self, index: usize, now: Instant) -> Result<Verdict, IntentError> {
        let question = self
            .state
            .question_mut()
            .ok_or(IntentError::NoActiveQuestion)?;
        let len = question.choices().len();
        if index >= len {
            return Err(IntentError::ChoiceOutOfRange { index, len });
        }

        if !question.is_correct(index) {
            let attempts_left = question.spend_attempt();
            if attempts_left == 0 {
                self.state.set_screen(Screen::Lose);
                return Ok(Verdict::OutOfAttempts);
            }
            self.show_toast(TOAST_WRONG_TEXT, ToastSeverity::Error, self.config.toast.wrong_ms, now);
            return Ok(Verdict::Wrong { attempts_left });
        }

        self.show_toast(
            TOAST_CORRECT_TEXT,
            ToastSeverity::Success,
            self.config.toast.correct_ms,
            now,
        );
        if self.state.record_solved() < self.config.questions_per_stage {
            self.install_next_question();
            return Ok(Verdict::Correct);
        }

        let next = self.state.advance_stage();
        let screen = if next >= Stage::COUNT {
            Screen::Win
        } else {
            Screen::Hub
        };
        self.state.set_screen(screen);
        Ok(Verdict::Correct)
    }

    fn install_next_question(&mut self) {
        let stage = self
            .state
            .stage()
            .expect("hub and question screens always have an active stage");
        let question = self.generator.next_question(stage);
        self.state.install_question(question);
    }

    fn show_toast(&mut self, text: &str, severity: ToastSeverity, ttl_ms: u64, now: Instant) {
        self.state
            .set_toast(Toast::new(text, severity, now, Duration::from_millis(ttl_ms)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_question(seed: u64) -> QuizController {
        let mut controller = QuizController::new(seed);
        controller.dispatch(Intent::SkipIntro);
        controller.dispatch(Intent::StartInstructions);
        controller.dispatch(Intent::StartRoom);
        controller
    }

    fn correct_index(controller: &QuizController) -> usize {
        controller
            .state()
            .question()
            .and_then(crate::question::Question::correct_index)
            .unwrap()
    }

    fn wrong_index(controller: &QuizController) -> usize {
        (correct_index(controller) + 1) % crate::constants::CHOICES_PER_QUESTION
    }

    #[test]
    fn intro_to_question_walks_the_table() {
        let mut controller = QuizController::new(1);
        let skip = controller.dispatch(Intent::SkipIntro);
        assert_eq!((skip.from, skip.to), (Screen::Intro, Screen::Instructions));
        let start = controller.dispatch(Intent::StartInstructions);
        assert_eq!(start.to, Screen::Hub);
        let room = controller.dispatch(Intent::StartRoom);
        assert_eq!(room.to, Screen::Question);
        let state = controller.state();
        assert_eq!(state.question_index(), 1);
        let question = state.question().unwrap();
        assert_eq!(question.stage(), Stage::Easy);
        assert_eq!(question.attempts_left(), 2);
        assert!(controller.audio_started());
    }

    #[test]
    fn correct_answer_sets_toast_and_next_question() {
        let mut controller = at_question(8);
        let now = Instant::now();
        let index = correct_index(&controller);
        let transition = controller.try_dispatch_at(Intent::Answer(index), now).unwrap();
        assert_eq!(transition.verdict, Some(Verdict::Correct));
        assert_eq!(transition.to, Screen::Question);

        let state = controller.current_state_at(now);
        assert_eq!(state.solved(), 1);
        assert_eq!(state.question_index(), 2);
        assert_eq!(state.question().unwrap().attempts_left(), 2);
        let toast = state.toast().unwrap();
        assert_eq!(toast.text, "Correct");
        assert_eq!(toast.severity, ToastSeverity::Success);

        let later = now + Duration::from_millis(701);
        assert!(controller.current_state_at(later).toast().is_none());
    }

    #[test]
    fn wrong_answer_keeps_question_and_warns() {
        let mut controller = at_question(21);
        let prompt = controller.state().question().unwrap().prompt().to_string();
        let transition = controller.dispatch(Intent::Answer(wrong_index(&controller)));
        assert_eq!(transition.verdict, Some(Verdict::Wrong { attempts_left: 1 }));
        let state = controller.state();
        assert_eq!(state.screen(), Screen::Question);
        assert_eq!(state.question().unwrap().prompt(), prompt);
        assert_eq!(state.toast().unwrap().text, "Wrong. Try again");
        assert_eq!(state.toast().unwrap().severity, ToastSeverity::Error);
    }

    #[test]
    fn invalid_intents_are_rejected_without_side_effects() {
        let mut controller = QuizController::new(2);
        let err = controller.try_dispatch(Intent::StartRoom).unwrap_err();
        assert_eq!(
            err,
            IntentError::WrongScreen {
                intent: "start_room",
                screen: Screen::Intro
            }
        );
        assert_eq!(controller.state().screen(), Screen::Intro);

        let mut controller = at_question(2);
        let err = controller.try_dispatch(Intent::Answer(4)).unwrap_err();
        assert_eq!(err, IntentError::ChoiceOutOfRange { index: 4, len: 4 });
        assert_eq!(controller.state().question().unwrap().attempts_left(), 2);

        let err = controller.try_dispatch(Intent::Restart).unwrap_err();
        assert!(err.to_string().contains("restart is not accepted"));
    }

    #[test]
    #[should_panic(expected = "invalid intent answer(0)")]
    fn dispatch_fails_fast() {
        let mut controller = QuizController::new(3);
        controller.dispatch(Intent::Answer(0));
    }

    #[test]
    #[should_panic(expected = "valid quiz config")]
    fn invalid_config_panics() {
        let config = QuizConfig {
            questions_per_stage: 0,
            ..QuizConfig::default()
        };
        let _ = QuizController::with_config(config, 1);
    }

    #[test]
    fn intents_serialize_for_hosts() {
        let json = serde_json::to_string(&Intent::Answer(2)).unwrap();
        assert_eq!(json, r#"{"type":"answer","choice":2}"#);
        let parsed: Intent = serde_json::from_str(r#"{"type":"restart"}"#).unwrap();
        assert_eq!(parsed, Intent::Restart);
    }
}
