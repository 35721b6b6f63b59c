//! Session state aggregate consumed by the presentation layer.
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::constants::{INSTRUCTION_LINES, MSG_LOSE, MSG_WIN};
use crate::question::Question;
use crate::stage::Stage;

/// Current UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Intro,
    Instructions,
    Hub,
    Question,
    Win,
    Lose,
}

impl Screen {
    /// Win and lose only accept a restart.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Win | Self::Lose)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Instructions => "instructions",
            Self::Hub => "hub",
            Self::Question => "question",
            Self::Win => "win",
            Self::Lose => "lose",
        }
    }

    /// Static copy the renderer shows on this screen.
    #[must_use]
    pub const fn copy(self) -> &'static [&'static str] {
        match self {
            Self::Instructions => &INSTRUCTION_LINES,
            Self::Win => &[MSG_WIN],
            Self::Lose => &[MSG_LOSE],
            Self::Intro | Self::Hub | Self::Question => &[],
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastSeverity {
    Success,
    Error,
}

/// Transient answer feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub severity: ToastSeverity,
    pub expires_at: Instant,
}

impl Toast {
    #[must_use]
    pub fn new(text: &str, severity: ToastSeverity, now: Instant, ttl: Duration) -> Self {
        Self {
            text: text.to_string(),
            severity,
            expires_at: now + ttl,
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// Everything the presentation layer needs to draw the current screen.
///
/// Only the controller mutates it; everyone else reads snapshots.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GameState {
    screen: Screen,
    stage_index: usize,
    solved: u32,
    question: Option<Question>,
    question_index: u64,
    #[serde(skip)]
    toast: Option<Toast>,
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    /// Index into [`Stage::ALL`]; equals [`Stage::COUNT`] only once every
    /// stage is cleared.
    #[must_use]
    pub const fn stage_index(&self) -> usize {
        self.stage_index
    }

    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        Stage::from_index(self.stage_index)
    }

    /// Correct answers in the current stage.
    #[must_use]
    pub const fn solved(&self) -> u32 {
        self.solved
    }

    #[must_use]
    pub const fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    /// Questions generated this session.
    #[must_use]
    pub const fn question_index(&self) -> u64 {
        self.question_index
    }

    #[must_use]
    pub const fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// Background image rotation for the active question, `None` before
    /// the first one.
    #[must_use]
    pub fn background_slot(&self, slots: usize) -> Option<usize> {
        if slots == 0 || self.question_index == 0 {
            return None;
        }
        let slots = u64::try_from(slots).ok()?;
        usize::try_from((self.question_index - 1) % slots).ok()
    }

    /// Drop the toast once its time is up. Returns true when one was cleared.
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self.toast.as_ref().is_some_and(|toast| toast.is_expired(now)) {
            self.toast = None;
            return true;
        }
        false
    }

    pub(crate) const fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub(crate) fn set_toast(&mut self, toast: Toast) {
        self.toast = Some(toast);
    }

    pub(crate) fn install_question(&mut self, question: Question) {
        self.question = Some(question);
        self.question_index = self.question_index.saturating_add(1);
    }

    pub(crate) const fn question_mut(&mut self) -> Option<&mut Question> {
        self.question.as_mut()
    }

    pub(crate) const fn record_solved(&mut self) -> u32 {
        self.solved = self.solved.saturating_add(1);
        self.solved
    }

    /// Move to the next stage with a clean slate. Returns the new index.
    pub(crate) fn advance_stage(&mut self) -> usize {
        self.stage_index = (self.stage_index + 1).min(Stage::COUNT);
        self.solved = 0;
        self.question = None;
        self.stage_index
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
