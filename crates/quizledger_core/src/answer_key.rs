//! Canonical answer key and pure scoring.
//!
//! # Responsibility
//! - Hold the fixed correct-answer indices for the ten-question quiz.
//! - Score a submitted answer sheet without side effects.
//!
//! # Invariants
//! - The key never changes at runtime; scoring is a pure function of it.
//! - Length enforcement is the record store's job, not the key's; the array
//!   parameter makes under/over-length unrepresentable past that gate.

/// Number of questions in the quiz, and therefore the maximum score.
pub const QUESTION_COUNT: usize = 10;

/// Number of options per question. Submitted values outside `0..OPTION_COUNT`
/// are not rejected; they simply never match the key.
pub const OPTION_COUNT: u8 = 4;

/// Canonical correct-answer indices, one per question (answers C, B, D, A,
/// C, B, D, C, A, B).
pub const ANSWER_KEY: [u8; QUESTION_COUNT] = [2, 1, 3, 0, 2, 1, 3, 2, 0, 1];

/// Counts positions where the submitted sheet agrees with the key.
pub fn score_answers(submitted: &[u8; QUESTION_COUNT]) -> u8 {
    ANSWER_KEY
        .iter()
        .zip(submitted.iter())
        .filter(|(expected, actual)| expected == actual)
        .count() as u8
}
