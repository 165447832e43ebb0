//! Record address derivation.
//!
//! # Responsibility
//! - Derive the unique storage address of a user's quiz record.
//!
//! # Invariants
//! - Derivation is deterministic: same identity, same address, always.
//! - The address depends only on the fixed namespace tag and the identity
//!   bytes; there is no randomness and no call-order dependence.

use crate::model::identity::UserId;
use sha2::{Digest, Sha256};
use std::fmt::{Display, Formatter};

/// Namespace tag scoping all quiz records, mixed into every derivation.
pub const RECORD_NAMESPACE: &[u8] = b"quiz_state";

// Domain separator so record addresses can never collide with any other
// SHA-256 use in this system.
const ADDRESS_DOMAIN: &[u8] = b"quizledger:v1:record_address";

/// Byte length of a derived record address.
pub const RECORD_ADDRESS_LEN: usize = 32;

/// Deterministic, collision-resistant storage key of one quiz record.
///
/// The hex form is the primary key of the `quiz_records` table, which makes
/// the derivation a de facto uniqueness lock: a second create at the same
/// address collides instead of overwriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordAddress([u8; RECORD_ADDRESS_LEN]);

impl RecordAddress {
    pub fn as_bytes(&self) -> &[u8; RECORD_ADDRESS_LEN] {
        &self.0
    }

    /// Lowercase hex wire form, used as the `address` column value.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Display for RecordAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Derives the record address for a user identity.
///
/// SHA-256 over `domain separator || namespace tag || identity bytes`.
pub fn derive_record_address(user: &UserId) -> RecordAddress {
    let mut hasher = Sha256::new();
    hasher.update(ADDRESS_DOMAIN);
    hasher.update(RECORD_NAMESPACE);
    hasher.update(user.as_bytes());
    RecordAddress(hasher.finalize().into())
}
