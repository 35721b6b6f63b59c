use std::hash::Hasher;
use std::sync::Arc;

use anyhow::{Context, Result};
use kabos_game::{GameState, Question, QuizConfig, Screen, Verdict};
use twox_hash::XxHash64;

use crate::logic::policy::PlayStrategy;
use crate::logic::simulation::{DecisionRecord, SimulationConfig, SimulationSession, StepOutcome};
use crate::logic::transcript::MediaCommand;

pub const DEFAULT_MAX_STEPS: u32 = 200;

/// What to play and what must hold afterwards.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: PlayStrategy,
    pub max_steps: Option<u32>,
    pub rounds: usize,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(strategy: PlayStrategy) -> Self {
        Self {
            strategy,
            max_steps: None,
            rounds: 1,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Play this many rounds, restarting from each terminal screen.
    #[must_use]
    pub const fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    /// # Errors
    ///
    /// Returns the expectation's own failure.
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Answer tallies for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunMetrics {
    pub answers: usize,
    pub correct: usize,
    pub wrong: usize,
    pub out_of_attempts: usize,
    pub highest_stage_index: usize,
}

impl RunMetrics {
    fn record(&mut self, decision: &DecisionRecord) {
        self.answers += 1;
        match decision.verdict {
            Verdict::Correct => self.correct += 1,
            Verdict::Wrong { .. } => self.wrong += 1,
            Verdict::OutOfAttempts => self.out_of_attempts += 1,
        }
        self.highest_stage_index = self.highest_stage_index.max(decision.stage.index());
    }
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: PlayStrategy,
    pub config: QuizConfig,
    pub steps: Vec<StepOutcome>,
    pub decisions: Vec<DecisionRecord>,
    /// Every question shown, in order, as it looked when first installed.
    pub questions: Vec<Question>,
    /// Terminal screen reached by each completed round.
    pub outcomes: Vec<Screen>,
    pub media: Vec<MediaCommand>,
    pub metrics: RunMetrics,
    pub final_state: GameState,
    pub generator_draws: u64,
    pub fingerprint: u64,
    pub game_ended: bool,
}

impl SimulationSummary {
    #[must_use]
    pub fn final_screen(&self) -> Screen {
        self.final_state.screen()
    }

    /// Questions a full winning round shows.
    #[must_use]
    pub fn questions_per_round(&self) -> usize {
        kabos_game::Stage::COUNT * self.config.questions_per_stage as usize
    }
}

/// Headless deterministic runner for the quiz logic.
#[derive(Debug, Clone)]
pub struct QuizTester {
    verbose: bool,
    config: QuizConfig,
}

impl QuizTester {
    #[must_use]
    pub const fn new(config: QuizConfig, verbose: bool) -> Self {
        Self { verbose, config }
    }

    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// Drive one session from the intro until the plan's rounds are done.
    ///
    /// # Errors
    ///
    /// Fails when the controller rejects an intent the session produced.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let max_steps = plan.max_steps.unwrap_or(DEFAULT_MAX_STEPS);
        let rounds = plan.rounds.max(1);
        let mut session = SimulationSession::new(
            SimulationConfig::new(plan.strategy, seed)
                .with_max_steps(max_steps)
                .with_quiz(self.config.clone()),
        );
        let mut policy = plan.strategy.create_policy(seed);

        if self.verbose {
            println!(
                "🎮 Starting simulation | seed:{seed} policy:{} rounds:{rounds}",
                plan.strategy.label()
            );
        }

        let mut steps = Vec::new();
        let mut decisions = Vec::new();
        let mut questions = Vec::new();
        let mut outcomes = Vec::new();
        let mut metrics = RunMetrics::default();
        let mut seen_question_index = 0;

        while !session.capped() {
            if session.state().screen().is_terminal() && outcomes.len() >= rounds {
                break;
            }

            let outcome = session.advance(policy.as_mut()).with_context(|| {
                format!(
                    "step {} on {} screen rejected",
                    session.steps(),
                    session.state().screen()
                )
            })?;

            let state = session.state();
            if state.question_index() != seen_question_index {
                seen_question_index = state.question_index();
                if let Some(question) = state.question() {
                    questions.push(question.clone());
                }
            }
            if let Some(decision) = &outcome.decision {
                metrics.record(decision);
                decisions.push(decision.clone());
            }
            if outcome.game_ended {
                outcomes.push(outcome.transition.to);
            }
            if self.verbose {
                log_step(&outcome);
            }
            log::debug!("seed {seed} step {} {}", outcome.step, outcome.intent);
            steps.push(outcome);
        }

        let controller = session.into_controller();
        let final_state = controller.snapshot();
        let generator_draws = controller.generator_draws();
        let game_ended = final_state.screen().is_terminal();
        let fingerprint = transcript_fingerprint(&questions);
        let media = controller.media().commands().to_vec();

        if self.verbose {
            println!(
                "🏁 Simulation ended on {} after {} steps ({} answers, fingerprint {fingerprint:016x})",
                final_state.screen(),
                steps.len(),
                metrics.answers
            );
            for line in final_state.screen().copy() {
                println!("   {line}");
            }
        }

        Ok(SimulationSummary {
            seed,
            strategy: plan.strategy,
            config: self.config.clone(),
            steps,
            decisions,
            questions,
            outcomes,
            media,
            metrics,
            final_state,
            generator_draws,
            fingerprint,
            game_ended,
        })
    }
}

fn log_step(outcome: &StepOutcome) {
    if let Some(decision) = &outcome.decision {
        println!(
            "🎯 Step {}: [{}] {} -> {} ({}: {}, {:?})",
            decision.step,
            decision.stage,
            decision.prompt,
            decision.choice_value,
            decision.policy_name,
            decision.rationale.as_deref().unwrap_or("-"),
            decision.verdict
        );
    } else {
        println!(
            "➡️  Step {}: {} -> {}",
            outcome.step, outcome.transition.from, outcome.transition.to
        );
    }
}

/// Stable hash of the questions a run was shown.
#[must_use]
pub fn transcript_fingerprint(questions: &[Question]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    for question in questions {
        hasher.write(question.prompt().as_bytes());
        for choice in question.choices() {
            hasher.write(&choice.to_le_bytes());
        }
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_plan_records_every_question() {
        let tester = QuizTester::new(QuizConfig::default(), false);
        let summary = tester
            .run_plan(&SimulationPlan::new(PlayStrategy::Perfect), 31)
            .unwrap();
        assert!(summary.game_ended);
        assert_eq!(summary.final_screen(), Screen::Win);
        assert_eq!(summary.outcomes, vec![Screen::Win]);
        assert_eq!(summary.questions.len(), summary.questions_per_round());
        assert_eq!(summary.metrics.correct, 9);
        assert_eq!(summary.metrics.highest_stage_index, 2);
        assert!(summary.generator_draws > 0);
    }

    #[test]
    fn rounds_restart_from_terminal_screens() {
        let tester = QuizTester::new(QuizConfig::default(), false);
        let plan = SimulationPlan::new(PlayStrategy::Saboteur).with_rounds(3);
        let summary = tester.run_plan(&plan, 8).unwrap();
        assert_eq!(summary.outcomes, vec![Screen::Lose; 3]);
        assert_eq!(summary.questions.len(), 3);
        assert_eq!(summary.metrics.out_of_attempts, 3);
    }

    #[test]
    fn fingerprint_depends_on_questions() {
        let tester = QuizTester::new(QuizConfig::default(), false);
        let plan = SimulationPlan::new(PlayStrategy::Perfect);
        let first = tester.run_plan(&plan, 100).unwrap();
        let again = tester.run_plan(&plan, 100).unwrap();
        let other = tester.run_plan(&plan, 101).unwrap();
        assert_eq!(first.fingerprint, again.fingerprint);
        assert_ne!(first.fingerprint, other.fingerprint);
        assert_eq!(transcript_fingerprint(&[]), XxHash64::oneshot(0, &[]));
    }

    #[test]
    fn step_cap_leaves_game_unfinished() {
        let tester = QuizTester::new(QuizConfig::default(), false);
        let plan = SimulationPlan::new(PlayStrategy::Perfect).with_max_steps(4);
        let summary = tester.run_plan(&plan, 2).unwrap();
        assert!(!summary.game_ended);
        assert_eq!(summary.steps.len(), 4);
        assert!(summary.outcomes.is_empty());
    }

    #[test]
    fn verbose_run_matches_quiet_run() {
        let plan = SimulationPlan::new(PlayStrategy::Stumbler);
        let quiet = QuizTester::new(QuizConfig::default(), false)
            .run_plan(&plan, 12)
            .unwrap();
        let loud = QuizTester::new(QuizConfig::default(), true)
            .run_plan(&plan, 12)
            .unwrap();
        assert_eq!(quiet.fingerprint, loud.fingerprint);
        assert_eq!(loud.final_screen(), Screen::Win);
    }

    #[test]
    fn expectations_see_the_summary() {
        let expectation = SimulationExpectation::from(|summary: &SimulationSummary| {
            anyhow::ensure!(summary.seed == 5, "wrong seed");
            Ok(())
        });
        let tester = QuizTester::new(QuizConfig::default(), false);
        let plan = SimulationPlan::new(PlayStrategy::Saboteur);
        assert!(expectation.evaluate(&tester.run_plan(&plan, 5).unwrap()).is_ok());
        assert!(expectation.evaluate(&tester.run_plan(&plan, 6).unwrap()).is_err());
    }
}
