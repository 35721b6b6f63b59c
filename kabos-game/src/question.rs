//! Generated arithmetic problems and their multiple-choice answers.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::CHOICES_PER_QUESTION;
use crate::stage::Stage;

/// Inline storage for the answer buttons of a question.
pub type ChoiceSet = SmallVec<[u32; CHOICES_PER_QUESTION]>;

/// Operands of a generated problem, one variant per template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expression {
    /// `a + b`
    Add { a: u32, b: u32 },
    /// `a - b` with `a >= b`
    Subtract { a: u32, b: u32 },
    /// `a × b`
    Multiply { a: u32, b: u32 },
    /// `dividend ÷ divisor`, always exact
    Divide { dividend: u32, divisor: u32 },
    /// `(a + b) ÷ c`, always exact
    GroupedSumDivided { a: u32, b: u32, c: u32 },
    /// `a × (b - c)` with `b > c`
    ScaledDifference { a: u32, b: u32, c: u32 },
    /// `x + y × z`
    SumWithProduct { x: u32, y: u32, z: u32 },
}

impl Expression {
    /// Exact value of the expression.
    ///
    /// Generators only build expressions whose subtractions and divisions
    /// stay exact and non-negative.
    #[must_use]
    pub const fn evaluate(self) -> u32 {
        match self {
            Self::Add { a, b } => a + b,
            Self::Subtract { a, b } => a - b,
            Self::Multiply { a, b } => a * b,
            Self::Divide { dividend, divisor } => dividend / divisor,
            Self::GroupedSumDivided { a, b, c } => (a + b) / c,
            Self::ScaledDifference { a, b, c } => a * (b - c),
            Self::SumWithProduct { x, y, z } => x + y * z,
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Add { a, b } => write!(f, "{a} + {b}"),
            Self::Subtract { a, b } => write!(f, "{a} - {b}"),
            Self::Multiply { a, b } => write!(f, "{a} × {b}"),
            Self::Divide { dividend, divisor } => write!(f, "{dividend} ÷ {divisor}"),
            Self::GroupedSumDivided { a, b, c } => write!(f, "({a} + {b}) ÷ {c}"),
            Self::ScaledDifference { a, b, c } => write!(f, "{a} × ({b} - {c})"),
            Self::SumWithProduct { x, y, z } => write!(f, "{x} + {y} × {z}"),
        }
    }
}

/// One generated problem. Everything except the attempt counter is fixed
/// at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    stage: Stage,
    prompt: String,
    expression: Expression,
    correct: u32,
    choices: ChoiceSet,
    attempts_left: u8,
}

impl Question {
    #[must_use]
    pub(crate) fn new(
        stage: Stage,
        expression: Expression,
        choices: ChoiceSet,
        attempts: u8,
    ) -> Self {
        Self {
            stage,
            prompt: format!("{expression} = ?"),
            expression,
            correct: expression.evaluate(),
            choices,
            attempts_left: attempts,
        }
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub const fn expression(&self) -> Expression {
        self.expression
    }

    #[must_use]
    pub const fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn choices(&self) -> &[u32] {
        &self.choices
    }

    #[must_use]
    pub const fn attempts_left(&self) -> u8 {
        self.attempts_left
    }

    /// Value behind the answer button at `index`.
    #[must_use]
    pub fn choice(&self, index: usize) -> Option<u32> {
        self.choices.get(index).copied()
    }

    /// Button index holding the correct value.
    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        self.choices.iter().position(|value| *value == self.correct)
    }

    /// Compares by value, never by position: choices are shuffled.
    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        self.choice(index) == Some(self.correct)
    }

    /// Spend one attempt, returning what remains.
    pub(crate) fn spend_attempt(&mut self) -> u8 {
        self.attempts_left = self.attempts_left.saturating_sub(1);
        self.attempts_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn prompts_render_each_template() {
        let cases = [
            (Expression::Add { a: 4, b: 9 }, "4 + 9", 13),
            (Expression::Subtract { a: 12, b: 5 }, "12 - 5", 7),
            (Expression::Multiply { a: 6, b: 7 }, "6 × 7", 42),
            (Expression::Divide { dividend: 56, divisor: 8 }, "56 ÷ 8", 7),
            (Expression::GroupedSumDivided { a: 20, b: 25, c: 9 }, "(20 + 25) ÷ 9", 5),
            (Expression::ScaledDifference { a: 5, b: 12, c: 4 }, "5 × (12 - 4)", 40),
            (Expression::SumWithProduct { x: 10, y: 3, z: 4 }, "10 + 3 × 4", 22),
        ];
        for (expression, rendered, value) in cases {
            assert_eq!(expression.to_string(), rendered);
            assert_eq!(expression.evaluate(), value);
        }
    }

    #[test]
    fn question_derives_prompt_and_correct_value() {
        let question = Question::new(
            Stage::Medium,
            Expression::Divide { dividend: 36, divisor: 4 },
            smallvec![11, 9, 5, 14],
            2,
        );
        assert_eq!(question.prompt(), "36 ÷ 4 = ?");
        assert_eq!(question.correct(), 9);
        assert_eq!(question.correct_index(), Some(1));
        assert!(question.is_correct(1));
        assert!(!question.is_correct(0));
        assert!(!question.is_correct(7));
    }

    #[test]
    fn spending_attempts_saturates_at_zero() {
        let mut question = Question::new(
            Stage::Easy,
            Expression::Add { a: 1, b: 1 },
            smallvec![2, 3, 4, 5],
            2,
        );
        assert_eq!(question.spend_attempt(), 1);
        assert_eq!(question.spend_attempt(), 0);
        assert_eq!(question.spend_attempt(), 0);
    }
}
