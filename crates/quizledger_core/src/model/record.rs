//! Quiz record domain model.
//!
//! # Responsibility
//! - Define the canonical per-user record persisted by the store.
//! - Validate record state on every write and every read.
//!
//! # Invariants
//! - `owner` is set at initialization and never changes.
//! - `completed` only ever transitions false -> true.
//! - `score` stays 0 until the single completing submission and is
//!   immutable afterwards.

use crate::answer_key::QUESTION_COUNT;
use crate::model::identity::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for persisted or incoming record state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    /// `score` exceeds the number of questions.
    ScoreOutOfRange { score: u8 },
    /// Nonzero `score` on a record that was never completed.
    ScoreWithoutCompletion { score: u8 },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScoreOutOfRange { score } => {
                write!(f, "score {score} exceeds maximum of {QUESTION_COUNT}")
            }
            Self::ScoreWithoutCompletion { score } => {
                write!(f, "score {score} recorded on an uncompleted record")
            }
        }
    }
}

impl Error for RecordValidationError {}

/// One per-user quiz record, addressed by its derived record address.
///
/// Lifecycle: created by initialize (`score = 0`, `completed = false`),
/// finalized exactly once by submit, never destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuizRecordWire")]
pub struct QuizRecord {
    /// Identity this record belongs to.
    pub owner: UserId,
    /// Number of correct answers, 0 until submission.
    pub score: u8,
    /// Permanently true after the single successful submission.
    pub completed: bool,
}

impl QuizRecord {
    /// Creates the fresh record written by initialize.
    pub fn new(owner: UserId) -> Self {
        Self {
            owner,
            score: 0,
            completed: false,
        }
    }

    /// Checks the record invariants.
    ///
    /// Called by the store before every SQL mutation and after every row
    /// parse, so corrupt persisted state surfaces instead of being masked.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if usize::from(self.score) > QUESTION_COUNT {
            return Err(RecordValidationError::ScoreOutOfRange { score: self.score });
        }
        if !self.completed && self.score != 0 {
            return Err(RecordValidationError::ScoreWithoutCompletion { score: self.score });
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct QuizRecordWire {
    owner: UserId,
    score: u8,
    completed: bool,
}

impl TryFrom<QuizRecordWire> for QuizRecord {
    type Error = RecordValidationError;

    fn try_from(wire: QuizRecordWire) -> Result<Self, Self::Error> {
        let record = Self {
            owner: wire.owner,
            score: wire.score,
            completed: wire.completed,
        };
        record.validate()?;
        Ok(record)
    }
}
