use kabos_game::{
    GameState, Intent, IntentError, QuizConfig, QuizController, Screen, Stage, Transition, Verdict,
};

use crate::logic::policy::{PlayStrategy, PlayerPolicy, PolicyDecision};
use crate::logic::transcript::TranscriptMedia;

/// Configuration for a simulation session.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub seed: u64,
    pub strategy: PlayStrategy,
    pub max_steps: u32,
    pub quiz: QuizConfig,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(strategy: PlayStrategy, seed: u64) -> Self {
        Self {
            seed,
            strategy,
            max_steps: 200,
            quiz: QuizConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    #[must_use]
    pub fn with_quiz(mut self, quiz: QuizConfig) -> Self {
        self.quiz = quiz;
        self
    }
}

/// Snapshot of an answered question.
#[derive(Debug, Clone)]
pub struct DecisionRecord {
    pub step: u32,
    pub stage: Stage,
    pub prompt: String,
    pub choice_index: usize,
    pub choice_value: u32,
    pub correct_value: u32,
    pub policy_name: String,
    pub rationale: Option<String>,
    pub verdict: Verdict,
}

/// Result of dispatching one intent.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step: u32,
    pub intent: Intent,
    pub transition: Transition,
    pub decision: Option<DecisionRecord>,
    pub game_ended: bool,
}

/// Headless presentation layer: reads the screen, dispatches the intent a
/// player would, and lets a policy answer questions.
pub struct SimulationSession {
    controller: QuizController<TranscriptMedia>,
    max_steps: u32,
    steps: u32,
}

impl SimulationSession {
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            controller: QuizController::with_media(
                config.quiz,
                config.seed,
                TranscriptMedia::default(),
            ),
            max_steps: config.max_steps,
            steps: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        self.controller.state()
    }

    #[must_use]
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    #[must_use]
    pub fn into_controller(self) -> QuizController<TranscriptMedia> {
        self.controller
    }

    /// True once the step cap is hit.
    #[must_use]
    pub const fn capped(&self) -> bool {
        self.steps >= self.max_steps
    }

    /// Dispatch whatever the current screen expects next.
    ///
    /// # Errors
    ///
    /// Returns the controller's rejection when the intent was invalid, which
    /// points at a bug in the session or the controller.
    pub fn advance(&mut self, policy: &mut dyn PlayerPolicy) -> Result<StepOutcome, IntentError> {
        self.steps += 1;
        let step = self.steps;

        let (intent, pending) = match self.state().screen() {
            Screen::Intro => (Intent::SkipIntro, None),
            Screen::Instructions => (Intent::StartInstructions, None),
            Screen::Hub => (Intent::StartRoom, None),
            Screen::Question => {
                let question = self
                    .state()
                    .question()
                    .ok_or(IntentError::NoActiveQuestion)?;
                let PolicyDecision {
                    choice_index,
                    rationale,
                } = policy.pick_choice(question);
                let pending = PendingDecision {
                    stage: question.stage(),
                    prompt: question.prompt().to_string(),
                    choice_index,
                    choice_value: question.choice(choice_index).unwrap_or_default(),
                    correct_value: question.correct(),
                    rationale,
                };
                (Intent::Answer(choice_index), Some(pending))
            }
            Screen::Win | Screen::Lose => (Intent::Restart, None),
        };

        let transition = self.controller.try_dispatch(intent)?;
        let decision = pending.zip(transition.verdict).map(|(pending, verdict)| {
            DecisionRecord {
                step,
                stage: pending.stage,
                prompt: pending.prompt,
                choice_index: pending.choice_index,
                choice_value: pending.choice_value,
                correct_value: pending.correct_value,
                policy_name: policy.name().to_string(),
                rationale: pending.rationale,
                verdict,
            }
        });

        Ok(StepOutcome {
            step,
            intent,
            transition,
            decision,
            game_ended: transition.to.is_terminal(),
        })
    }
}

struct PendingDecision {
    stage: Stage,
    prompt: String,
    choice_index: usize,
    choice_value: u32,
    correct_value: u32,
    rationale: Option<String>,
}
