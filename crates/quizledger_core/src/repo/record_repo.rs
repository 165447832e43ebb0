//! Quiz record store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own the initialize/submit/read transitions over `quiz_records`.
//! - Map storage-native conflicts onto the domain error taxonomy.
//!
//! # Invariants
//! - `initialize` relies on the primary-key constraint for its
//!   create-if-absent semantics; a conflict is `AlreadyInitialized`, never a
//!   silent overwrite.
//! - `submit` finalizes a record through a single conditional UPDATE
//!   (`... WHERE completed = 0`), so two racing submits resolve to exactly
//!   one winner without client-side locking.
//! - Read paths re-validate persisted state instead of masking corruption.

use crate::address::{derive_record_address, RecordAddress};
use crate::answer_key::{score_answers, QUESTION_COUNT};
use crate::auth::{self, AuthError, Authorization};
use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::identity::UserId;
use crate::model::record::{QuizRecord, RecordValidationError};
use log::{info, warn};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const RECORD_SELECT_SQL: &str = "SELECT owner, score, completed FROM quiz_records";
const REQUIRED_TABLE: &str = "quiz_records";
const REQUIRED_COLUMNS: [&str; 5] = ["address", "owner", "score", "completed", "updated_at"];

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error taxonomy.
///
/// The first five variants are the domain rejections: terminal validation
/// failures of the requested transition, surfaced verbatim and never retried
/// by the core. The rest cover storage bootstrap and persisted-state
/// integrity.
#[derive(Debug)]
pub enum StoreError {
    /// A record already exists at the derived address; creation is not
    /// idempotent.
    AlreadyInitialized,
    /// Submit attempted with no prior initialize.
    NotInitialized,
    /// Submitted answer sheet is not exactly `QUESTION_COUNT` entries.
    InvalidAnswersLength { actual: usize },
    /// Submit attempted on a record that is already completed.
    AlreadyCompleted,
    /// Authorization does not prove control of the record's owner.
    Unauthorized(AuthError),
    Validation(RecordValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyInitialized => {
                write!(f, "quiz record already initialized for this identity")
            }
            Self::NotInitialized => write!(f, "no quiz record initialized for this identity"),
            Self::InvalidAnswersLength { actual } => {
                write!(f, "expected {QUESTION_COUNT} answers, got {actual}")
            }
            Self::AlreadyCompleted => write!(f, "quiz record is already completed"),
            Self::Unauthorized(err) => write!(f, "unauthorized: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted quiz record data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "table `{table}` is missing required column `{column}`")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unauthorized(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub score: u8,
    pub completed: bool,
}

/// Store interface for the per-user quiz record lifecycle.
pub trait RecordRepository {
    /// Creates the record for `user` in its initial state.
    fn initialize(&self, user: &UserId, authorization: &Authorization)
        -> StoreResult<RecordAddress>;

    /// Scores `answers` and finalizes the record, exactly once.
    fn submit(
        &self,
        user: &UserId,
        authorization: &Authorization,
        answers: &[u8],
    ) -> StoreResult<ScoreSummary>;

    /// Returns the current record, or `None` when no record exists.
    /// Absence is not an error, and no authorization is required: records
    /// are non-confidential.
    fn read(&self, user: &UserId) -> StoreResult<Option<QuizRecord>>;
}

/// SQLite-backed quiz record store.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn fetch_record(&self, address: &RecordAddress) -> StoreResult<Option<QuizRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} WHERE address = ?1;"))?;

        let mut rows = stmt.query([address.to_hex()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(row)?));
        }

        Ok(None)
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn initialize(
        &self,
        user: &UserId,
        authorization: &Authorization,
    ) -> StoreResult<RecordAddress> {
        let address = derive_record_address(user);

        if let Err(err) = auth::verify_initialize(user, authorization) {
            warn!("event=record_initialize module=repo status=unauthorized address={address} error={err}");
            return Err(StoreError::Unauthorized(err));
        }

        let record = QuizRecord::new(*user);
        record.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO quiz_records (address, owner, score, completed)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                address.to_hex(),
                record.owner.to_hex(),
                record.score,
                bool_to_int(record.completed),
            ],
        );

        match inserted {
            Ok(_) => {
                info!("event=record_initialize module=repo status=ok address={address}");
                Ok(address)
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                info!("event=record_initialize module=repo status=conflict address={address}");
                Err(StoreError::AlreadyInitialized)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn submit(
        &self,
        user: &UserId,
        authorization: &Authorization,
        answers: &[u8],
    ) -> StoreResult<ScoreSummary> {
        let address = derive_record_address(user);

        // Precondition order is part of the contract: existence, then
        // length, then completion, then authorization.
        let Some(record) = self.fetch_record(&address)? else {
            return Err(StoreError::NotInitialized);
        };

        if answers.len() != QUESTION_COUNT {
            return Err(StoreError::InvalidAnswersLength {
                actual: answers.len(),
            });
        }

        if record.completed {
            return Err(StoreError::AlreadyCompleted);
        }

        if let Err(err) = auth::verify_submit(user, answers, authorization) {
            warn!(
                "event=record_submit module=repo status=unauthorized address={address} error={err}"
            );
            return Err(StoreError::Unauthorized(err));
        }
        if record.owner != *user {
            warn!(
                "event=record_submit module=repo status=unauthorized address={address} error=owner_mismatch"
            );
            return Err(StoreError::Unauthorized(AuthError::OwnerMismatch));
        }

        let mut sheet = [0u8; QUESTION_COUNT];
        sheet.copy_from_slice(answers);
        let score = score_answers(&sheet);

        // Compare-and-update: the completed guard re-runs inside the UPDATE
        // itself, so a submit that lost the race changes zero rows.
        let changed = self.conn.execute(
            "UPDATE quiz_records
             SET
                score = ?2,
                completed = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE address = ?1
               AND completed = 0;",
            params![address.to_hex(), score],
        )?;

        if changed == 0 {
            info!("event=record_submit module=repo status=conflict address={address}");
            return Err(StoreError::AlreadyCompleted);
        }

        info!(
            "event=record_submit module=repo status=ok address={address} score={score}/{QUESTION_COUNT}"
        );

        Ok(ScoreSummary {
            score,
            completed: true,
        })
    }

    fn read(&self, user: &UserId) -> StoreResult<Option<QuizRecord>> {
        let address = derive_record_address(user);
        self.fetch_record(&address)
    }
}

fn ensure_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [REQUIRED_TABLE],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(StoreError::MissingRequiredTable(REQUIRED_TABLE));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({REQUIRED_TABLE});"))?;
    let mut rows = stmt.query([])?;
    let mut present = Vec::new();
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>(1)?);
    }
    for column in REQUIRED_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(StoreError::MissingRequiredColumn {
                table: REQUIRED_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn parse_record_row(row: &Row<'_>) -> StoreResult<QuizRecord> {
    let owner_text: String = row.get("owner")?;
    let owner = UserId::from_hex(&owner_text).map_err(|err| {
        StoreError::InvalidData(format!(
            "invalid owner value `{owner_text}` in quiz_records.owner: {err}"
        ))
    })?;

    let score_raw: i64 = row.get("score")?;
    let score = u8::try_from(score_raw).map_err(|_| {
        StoreError::InvalidData(format!("invalid score value `{score_raw}` in quiz_records.score"))
    })?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid completed value `{other}` in quiz_records.completed"
            )));
        }
    };

    let record = QuizRecord {
        owner,
        score,
        completed,
    };
    record.validate()?;
    Ok(record)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
