//! Procedural question generation per stage.
//!
//! Every template constrains its operands so the correct answer is an exact,
//! non-negative integer; distractors are drawn around that answer.
use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::constants::{
    ATTEMPTS_PER_QUESTION, CHOICES_PER_QUESTION, DISTRACTOR_DRAW_CAP, DISTRACTOR_MAX_WIDENINGS,
    DISTRACTOR_SPREAD, EASY_OPERAND_MAX, EASY_OPERAND_MIN, HARD_ADDEND_MAX, HARD_ADDEND_MIN,
    HARD_DIVISOR_MAX, HARD_DIVISOR_MIN, HARD_FACTOR_MAX, HARD_FACTOR_MIN, HARD_MINUEND_MAX,
    HARD_MINUEND_MIN, HARD_SCALE_MAX, HARD_SCALE_MIN, HARD_SPLIT_FLOOR, HARD_SPLIT_MARGIN,
    HARD_SUBTRAHEND_MAX, HARD_SUBTRAHEND_MIN, HARD_TARGET_MAX, HARD_TARGET_MIN,
    MEDIUM_FACTOR_MAX, MEDIUM_FACTOR_MIN, STREAM_QUESTIONS,
};
use crate::question::{ChoiceSet, Expression, Question};
use crate::rng::CountingRng;
use crate::stage::Stage;

/// Generate one question for `stage` with the default attempt budget.
pub fn generate<R: Rng + ?Sized>(stage: Stage, rng: &mut R) -> Question {
    generate_with_attempts(stage, ATTEMPTS_PER_QUESTION, rng)
}

/// Generate one question for `stage` starting with `attempts` tries.
pub fn generate_with_attempts<R: Rng + ?Sized>(
    stage: Stage,
    attempts: u8,
    rng: &mut R,
) -> Question {
    let expression = match stage {
        Stage::Easy => easy_expression(rng),
        Stage::Medium => medium_expression(rng),
        Stage::Hard => hard_expression(rng),
    };
    let choices = unique_choices(expression.evaluate(), rng);
    Question::new(stage, expression, choices, attempts)
}

fn easy_expression<R: Rng + ?Sized>(rng: &mut R) -> Expression {
    let mut a = rng.gen_range(EASY_OPERAND_MIN..=EASY_OPERAND_MAX);
    let mut b = rng.gen_range(EASY_OPERAND_MIN..=EASY_OPERAND_MAX);
    if rng.gen_bool(0.5) {
        return Expression::Add { a, b };
    }
    if b > a {
        std::mem::swap(&mut a, &mut b);
    }
    Expression::Subtract { a, b }
}

fn medium_expression<R: Rng + ?Sized>(rng: &mut R) -> Expression {
    if rng.gen_bool(0.5) {
        let a = rng.gen_range(MEDIUM_FACTOR_MIN..=MEDIUM_FACTOR_MAX);
        let b = rng.gen_range(MEDIUM_FACTOR_MIN..=MEDIUM_FACTOR_MAX);
        return Expression::Multiply { a, b };
    }
    let divisor = rng.gen_range(MEDIUM_FACTOR_MIN..=MEDIUM_FACTOR_MAX);
    let quotient = rng.gen_range(MEDIUM_FACTOR_MIN..=MEDIUM_FACTOR_MAX);
    Expression::Divide {
        dividend: divisor * quotient,
        divisor,
    }
}

fn hard_expression<R: Rng + ?Sized>(rng: &mut R) -> Expression {
    match rng.gen_range(1..=3) {
        1 => grouped_sum_divided(rng),
        2 => scaled_difference(rng),
        _ => sum_with_product(rng),
    }
}

fn grouped_sum_divided<R: Rng + ?Sized>(rng: &mut R) -> Expression {
    let c = rng.gen_range(HARD_DIVISOR_MIN..=HARD_DIVISOR_MAX);
    let raw = rng.gen_range(HARD_TARGET_MIN..=HARD_TARGET_MAX);
    let target = raw - raw % c;
    let split_max = target
        .saturating_sub(HARD_SPLIT_MARGIN)
        .max(HARD_SPLIT_FLOOR);
    let a = rng.gen_range(HARD_SPLIT_MARGIN..=split_max);
    let b = target.saturating_sub(a);
    Expression::GroupedSumDivided { a, b, c }
}

fn scaled_difference<R: Rng + ?Sized>(rng: &mut R) -> Expression {
    let a = rng.gen_range(HARD_SCALE_MIN..=HARD_SCALE_MAX);
    let b = rng.gen_range(HARD_MINUEND_MIN..=HARD_MINUEND_MAX);
    let mut c = rng.gen_range(HARD_SUBTRAHEND_MIN..=HARD_SUBTRAHEND_MAX);
    if c >= b {
        c = HARD_SUBTRAHEND_MIN;
    }
    Expression::ScaledDifference { a, b, c }
}

fn sum_with_product<R: Rng + ?Sized>(rng: &mut R) -> Expression {
    let x = rng.gen_range(HARD_ADDEND_MIN..=HARD_ADDEND_MAX);
    let y = rng.gen_range(HARD_FACTOR_MIN..=HARD_FACTOR_MAX);
    let z = rng.gen_range(HARD_FACTOR_MIN..=HARD_FACTOR_MAX);
    Expression::SumWithProduct { x, y, z }
}

/// Build the shuffled answer set: `correct` plus three distinct,
/// non-negative distractors near it.
///
/// Draws are capped. Each time the cap is hit the perturbation window widens;
/// once widening is exhausted the set is completed with the nearest unused
/// values above `correct`, so the loop always terminates.
pub fn unique_choices<R: Rng + ?Sized>(correct: u32, rng: &mut R) -> ChoiceSet {
    let mut values = ChoiceSet::new();
    values.push(correct);

    let mut spread = DISTRACTOR_SPREAD;
    let mut widenings = 0;
    let mut draws = 0;
    while values.len() < CHOICES_PER_QUESTION {
        if draws == DISTRACTOR_DRAW_CAP {
            if widenings == DISTRACTOR_MAX_WIDENINGS {
                log::trace!("distractor draws exhausted for {correct}; filling upward");
                fill_upward(correct, &mut values);
                break;
            }
            widenings += 1;
            spread += DISTRACTOR_SPREAD;
            draws = 0;
            log::trace!("widening distractor spread to ±{spread} for {correct}");
        }
        draws += 1;

        let delta = rng.gen_range(-spread..=spread);
        if delta == 0 {
            continue;
        }
        let Ok(candidate) = u32::try_from(i64::from(correct) + delta) else {
            continue;
        };
        if !values.contains(&candidate) {
            values.push(candidate);
        }
    }

    values.shuffle(rng);
    values
}

fn fill_upward(correct: u32, values: &mut ChoiceSet) {
    let mut candidate = correct;
    while values.len() < CHOICES_PER_QUESTION {
        candidate = candidate.wrapping_add(1);
        if !values.contains(&candidate) {
            values.push(candidate);
        }
    }
}

/// Seeded question source owned by a controller.
#[derive(Debug, Clone)]
pub struct QuestionGenerator {
    rng: CountingRng<SmallRng>,
    attempts: u8,
}

impl QuestionGenerator {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: CountingRng::for_stream(seed, STREAM_QUESTIONS),
            attempts: ATTEMPTS_PER_QUESTION,
        }
    }

    /// Override the attempt budget handed to new questions.
    #[must_use]
    pub const fn with_attempts(mut self, attempts: u8) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn next_question(&mut self, stage: Stage) -> Question {
        generate_with_attempts(stage, self.attempts, &mut self.rng)
    }

    /// Restart the stream from a new session seed.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = CountingRng::for_stream(seed, STREAM_QUESTIONS);
    }

    /// Random draws consumed so far.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.rng.draws()
    }
}
