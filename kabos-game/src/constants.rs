//! Centralized tuning constants for Kabos quiz logic.
//!
//! Operand ranges and distractor bounds live here so that question
//! difficulty can only be adjusted via reviewed code changes.

// Progression ---------------------------------------------------------------
pub const QUESTIONS_PER_STAGE: u32 = 3;
pub const ATTEMPTS_PER_QUESTION: u8 = 2;
pub const CHOICES_PER_QUESTION: usize = 4;
pub const BACKGROUND_SLOTS: usize = 9;

// Feedback ------------------------------------------------------------------
pub const TOAST_CORRECT_TEXT: &str = "Correct";
pub const TOAST_WRONG_TEXT: &str = "Wrong. Try again";
pub const TOAST_CORRECT_MS: u64 = 700;
pub const TOAST_WRONG_MS: u64 = 900;

// Terminal copy -------------------------------------------------------------
pub const MSG_WIN: &str = "Finally you are out. You can exit from the school.";
pub const MSG_LOSE: &str = "Game Over";
pub const INSTRUCTION_LINES: [&str; 6] = [
    "Escape three rooms: Easy, Medium, Hard.",
    "Each room has three math questions.",
    "Each question has two attempts.",
    "Answers are multiple choice.",
    "Three correct answers unlock next room.",
    "Finish Hard room to exit the school.",
];

// Easy operands -------------------------------------------------------------
pub(crate) const EASY_OPERAND_MIN: u32 = 1;
pub(crate) const EASY_OPERAND_MAX: u32 = 20;

// Medium operands -----------------------------------------------------------
pub(crate) const MEDIUM_FACTOR_MIN: u32 = 2;
pub(crate) const MEDIUM_FACTOR_MAX: u32 = 12;

// Hard: (a + b) ÷ c ---------------------------------------------------------
pub(crate) const HARD_DIVISOR_MIN: u32 = 2;
pub(crate) const HARD_DIVISOR_MAX: u32 = 9;
pub(crate) const HARD_TARGET_MIN: u32 = 30;
pub(crate) const HARD_TARGET_MAX: u32 = 120;
pub(crate) const HARD_SPLIT_MARGIN: u32 = 5;
pub(crate) const HARD_SPLIT_FLOOR: u32 = 6;

// Hard: a × (b - c) ---------------------------------------------------------
pub(crate) const HARD_SCALE_MIN: u32 = 5;
pub(crate) const HARD_SCALE_MAX: u32 = 16;
pub(crate) const HARD_MINUEND_MIN: u32 = 10;
pub(crate) const HARD_MINUEND_MAX: u32 = 28;
pub(crate) const HARD_SUBTRAHEND_MIN: u32 = 2;
pub(crate) const HARD_SUBTRAHEND_MAX: u32 = 10;

// Hard: x + y × z -----------------------------------------------------------
pub(crate) const HARD_ADDEND_MIN: u32 = 5;
pub(crate) const HARD_ADDEND_MAX: u32 = 50;
pub(crate) const HARD_FACTOR_MIN: u32 = 2;
pub(crate) const HARD_FACTOR_MAX: u32 = 12;

// Distractors ---------------------------------------------------------------
pub(crate) const DISTRACTOR_SPREAD: i64 = 8;
pub(crate) const DISTRACTOR_DRAW_CAP: u32 = 64;
pub(crate) const DISTRACTOR_MAX_WIDENINGS: u32 = 4;

// RNG stream tags -----------------------------------------------------------
pub(crate) const STREAM_QUESTIONS: &[u8] = b"questions";
