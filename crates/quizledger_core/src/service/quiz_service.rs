//! Quiz use-case service.
//!
//! # Responsibility
//! - Provide the stable initialize/submit/read entry points for callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::address::RecordAddress;
use crate::auth::Authorization;
use crate::model::identity::UserId;
use crate::model::record::QuizRecord;
use crate::repo::record_repo::{RecordRepository, ScoreSummary, StoreResult};

/// Use-case service wrapper for the one-shot quiz record lifecycle.
pub struct QuizService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> QuizService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates the caller's record in its initial state.
    ///
    /// # Contract
    /// - Fails with `AlreadyInitialized` when the record exists; creation is
    ///   never a silent no-op, so callers can distinguish "already started"
    ///   from "just started".
    pub fn initialize(
        &self,
        user: &UserId,
        authorization: &Authorization,
    ) -> StoreResult<RecordAddress> {
        self.repo.initialize(user, authorization)
    }

    /// Scores the answer sheet and finalizes the caller's record.
    ///
    /// # Contract
    /// - Single-shot: once a record completes, every later submission is
    ///   rejected and never re-reads user-supplied answers.
    pub fn submit(
        &self,
        user: &UserId,
        authorization: &Authorization,
        answers: &[u8],
    ) -> StoreResult<ScoreSummary> {
        self.repo.submit(user, authorization, answers)
    }

    /// Reads the caller's record; `None` means "not started yet".
    pub fn read(&self, user: &UserId) -> StoreResult<Option<QuizRecord>> {
        self.repo.read(user)
    }
}
