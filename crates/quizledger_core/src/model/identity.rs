//! User identity type.
//!
//! # Responsibility
//! - Represent the public identity a record belongs to.
//! - Own the hex wire form used for storage and serialization.
//!
//! # Invariants
//! - An identity is exactly 32 bytes: an Ed25519 public key.
//! - The hex form is lowercase and round-trips losslessly.

use ed25519_dalek::VerifyingKey;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Byte length of a user identity (an Ed25519 public key).
pub const USER_ID_LEN: usize = 32;

/// Public identity of a quiz participant.
///
/// Doubles as the record owner and as the sole variable input to record
/// address derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId([u8; USER_ID_LEN]);

/// Parse failure for identity wire forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    InvalidLength { actual: usize },
    InvalidHex(String),
}

impl Display for IdentityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLength { actual } => {
                write!(f, "expected {USER_ID_LEN} identity bytes, got {actual}")
            }
            Self::InvalidHex(message) => write!(f, "invalid identity hex: {message}"),
        }
    }
}

impl Error for IdentityError {}

impl UserId {
    /// Wraps raw identity bytes without validating key canonicity.
    ///
    /// Signature verification is where non-keys get rejected; an identity
    /// that is not a valid Ed25519 point can never authorize anything.
    pub fn from_bytes(bytes: [u8; USER_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parses the lowercase/uppercase hex wire form.
    pub fn from_hex(text: &str) -> Result<Self, IdentityError> {
        let bytes =
            hex::decode(text).map_err(|err| IdentityError::InvalidHex(err.to_string()))?;
        let actual = bytes.len();
        let raw = <[u8; USER_ID_LEN]>::try_from(bytes.as_slice())
            .map_err(|_| IdentityError::InvalidLength { actual })?;
        Ok(Self(raw))
    }

    pub fn as_bytes(&self) -> &[u8; USER_ID_LEN] {
        &self.0
    }

    /// Lowercase hex wire form, used as the `owner` column value.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<&VerifyingKey> for UserId {
    fn from(key: &VerifyingKey) -> Self {
        Self(key.to_bytes())
    }
}

impl TryFrom<&[u8]> for UserId {
    type Error = IdentityError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let raw = <[u8; USER_ID_LEN]>::try_from(bytes)
            .map_err(|_| IdentityError::InvalidLength { actual: bytes.len() })?;
        Ok(Self(raw))
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for UserId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(DeError::custom)
    }
}
