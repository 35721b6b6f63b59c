use std::fmt;

use kabos_game::Question;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Decision returned by a [`PlayerPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub choice_index: usize,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(choice_index: usize, rationale: Option<String>) -> Self {
        Self {
            choice_index,
            rationale,
        }
    }
}

/// Policy interface for automated players.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Select a choice for the active question.
    fn pick_choice(&mut self, question: &Question) -> PolicyDecision;
}

/// Built-in player strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayStrategy {
    Perfect,
    Stumbler,
    Saboteur,
    Guesser,
}

impl PlayStrategy {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PlayStrategy::Perfect => "Perfect",
            PlayStrategy::Stumbler => "Stumbler",
            PlayStrategy::Saboteur => "Saboteur",
            PlayStrategy::Guesser => "Guesser",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            PlayStrategy::Perfect => Box::new(PerfectPolicy),
            PlayStrategy::Stumbler => Box::new(StumblerPolicy::default()),
            PlayStrategy::Saboteur => Box::new(SaboteurPolicy),
            PlayStrategy::Guesser => Box::new(GuesserPolicy::new(seed)),
        }
    }
}

impl fmt::Display for PlayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct PerfectPolicy;
struct SaboteurPolicy;

/// Misses each question once before answering it.
#[derive(Default)]
struct StumblerPolicy {
    /// Prompt and remaining attempts at the last miss.
    missed: Option<(String, u8)>,
}

impl StumblerPolicy {
    fn is_retry(&self, question: &Question) -> bool {
        self.missed.as_ref().is_some_and(|(prompt, attempts)| {
            question.prompt() == prompt && question.attempts_left() < *attempts
        })
    }
}

struct GuesserPolicy {
    rng: ChaCha20Rng,
}

impl GuesserPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerPolicy for PerfectPolicy {
    fn name(&self) -> &'static str {
        "Perfect"
    }

    fn pick_choice(&mut self, question: &Question) -> PolicyDecision {
        PolicyDecision::new(correct_or_first(question), Some("knows the answer".to_string()))
    }
}

impl PlayerPolicy for StumblerPolicy {
    fn name(&self) -> &'static str {
        "Stumbler"
    }

    fn pick_choice(&mut self, question: &Question) -> PolicyDecision {
        if self.is_retry(question) {
            self.missed = None;
            PolicyDecision::new(correct_or_first(question), Some("second try".to_string()))
        } else {
            self.missed = Some((question.prompt().to_string(), question.attempts_left()));
            PolicyDecision::new(first_wrong(question), Some("first try".to_string()))
        }
    }
}

impl PlayerPolicy for SaboteurPolicy {
    fn name(&self) -> &'static str {
        "Saboteur"
    }

    fn pick_choice(&mut self, question: &Question) -> PolicyDecision {
        PolicyDecision::new(first_wrong(question), Some("avoids the answer".to_string()))
    }
}

impl PlayerPolicy for GuesserPolicy {
    fn name(&self) -> &'static str {
        "Guesser"
    }

    fn pick_choice(&mut self, question: &Question) -> PolicyDecision {
        let len = question.choices().len().max(1);
        let index = self.rng.gen_range(0..len);
        PolicyDecision::new(index, Some(format!("guessed {index} of {len}")))
    }
}

fn correct_or_first(question: &Question) -> usize {
    question.correct_index().unwrap_or(0)
}

fn first_wrong(question: &Question) -> usize {
    (0..question.choices().len())
        .find(|&index| !question.is_correct(index))
        .unwrap_or(0)
}
