//! Core domain logic for Quizledger.
//! This crate is the single source of truth for the one-shot quiz
//! invariants: one record per identity, initialized once, scored once,
//! immutable afterwards.

pub mod address;
pub mod answer_key;
pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use address::{derive_record_address, RecordAddress, RECORD_NAMESPACE};
pub use answer_key::{score_answers, ANSWER_KEY, OPTION_COUNT, QUESTION_COUNT};
pub use auth::{
    sign_initialize, sign_submit, verify_initialize, verify_submit, AuthError, Authorization,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::identity::{IdentityError, UserId};
pub use model::record::{QuizRecord, RecordValidationError};
pub use repo::record_repo::{
    RecordRepository, ScoreSummary, SqliteRecordRepository, StoreError, StoreResult,
};
pub use service::quiz_service::QuizService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
