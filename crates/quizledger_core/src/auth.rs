//! Operation authorization via Ed25519 signatures.
//!
//! # Responsibility
//! - Define the signed payloads that prove control of an identity for each
//!   mutating operation.
//! - Provide the client-side signing helpers and the store-side checks.
//!
//! # Invariants
//! - Payloads are domain-separated per operation: a proof for initialize
//!   never verifies for submit, and a submit proof is bound to one exact
//!   answer sheet.
//! - Verification uses `verify_strict`; signing is deterministic per
//!   RFC 8032, so identical inputs always produce identical proofs.

use crate::model::identity::UserId;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use std::error::Error;
use std::fmt::{Display, Formatter};

const INITIALIZE_DOMAIN: &[u8] = b"quizledger:v1:initialize";
const SUBMIT_DOMAIN: &[u8] = b"quizledger:v1:submit";

/// Byte length of an authorization signature.
pub const SIGNATURE_LEN: usize = 64;

/// Proof that the caller controls the claimed identity for one operation.
#[derive(Debug, Clone, Copy)]
pub struct Authorization(Signature);

impl Authorization {
    pub fn from_bytes(bytes: &[u8; SIGNATURE_LEN]) -> Self {
        Self(Signature::from_bytes(bytes))
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        self.0.to_bytes()
    }
}

/// Authorization failure causes surfaced through the store's
/// `Unauthorized` rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// The claimed identity is not a valid Ed25519 public key.
    InvalidPublicKey,
    /// The signature does not verify for the identity and payload.
    SignatureMismatch,
    /// The identity verifies but does not own the record.
    OwnerMismatch,
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPublicKey => write!(f, "identity is not a valid public key"),
            Self::SignatureMismatch => write!(f, "signature does not match identity and payload"),
            Self::OwnerMismatch => write!(f, "identity does not own this record"),
        }
    }
}

impl Error for AuthError {}

fn initialize_payload(user: &UserId) -> Vec<u8> {
    let mut payload = Vec::with_capacity(INITIALIZE_DOMAIN.len() + user.as_bytes().len());
    payload.extend_from_slice(INITIALIZE_DOMAIN);
    payload.extend_from_slice(user.as_bytes());
    payload
}

fn submit_payload(user: &UserId, answers: &[u8]) -> Vec<u8> {
    let mut payload =
        Vec::with_capacity(SUBMIT_DOMAIN.len() + user.as_bytes().len() + answers.len());
    payload.extend_from_slice(SUBMIT_DOMAIN);
    payload.extend_from_slice(user.as_bytes());
    payload.extend_from_slice(answers);
    payload
}

/// Signs the initialize payload for the key's own identity.
pub fn sign_initialize(key: &SigningKey) -> Authorization {
    let user = UserId::from(&key.verifying_key());
    Authorization(key.sign(&initialize_payload(&user)))
}

/// Signs the submit payload for the key's own identity and one exact
/// answer sheet.
pub fn sign_submit(key: &SigningKey, answers: &[u8]) -> Authorization {
    let user = UserId::from(&key.verifying_key());
    Authorization(key.sign(&submit_payload(&user, answers)))
}

/// Checks an initialize proof against the claimed identity.
pub fn verify_initialize(user: &UserId, authorization: &Authorization) -> Result<(), AuthError> {
    verify_payload(user, &initialize_payload(user), authorization)
}

/// Checks a submit proof against the claimed identity and answer sheet.
pub fn verify_submit(
    user: &UserId,
    answers: &[u8],
    authorization: &Authorization,
) -> Result<(), AuthError> {
    verify_payload(user, &submit_payload(user, answers), authorization)
}

fn verify_payload(
    user: &UserId,
    payload: &[u8],
    authorization: &Authorization,
) -> Result<(), AuthError> {
    let key =
        VerifyingKey::from_bytes(user.as_bytes()).map_err(|_| AuthError::InvalidPublicKey)?;
    key.verify_strict(payload, &authorization.0)
        .map_err(|_| AuthError::SignatureMismatch)
}

#[cfg(test)]
mod tests {
    use super::{
        sign_initialize, sign_submit, verify_initialize, verify_submit, AuthError, Authorization,
    };
    use crate::model::identity::UserId;
    use ed25519_dalek::SigningKey;

    fn key_from_seed(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    fn user_of(key: &SigningKey) -> UserId {
        UserId::from(&key.verifying_key())
    }

    #[test]
    fn initialize_proof_round_trips() {
        let key = key_from_seed(7);
        let user = user_of(&key);

        let authorization = sign_initialize(&key);
        verify_initialize(&user, &authorization).unwrap();
    }

    #[test]
    fn submit_proof_is_bound_to_the_answer_sheet() {
        let key = key_from_seed(7);
        let user = user_of(&key);
        let answers = [2u8, 1, 3, 0, 2, 1, 3, 2, 0, 1];

        let authorization = sign_submit(&key, &answers);
        verify_submit(&user, &answers, &authorization).unwrap();

        let mut tampered = answers;
        tampered[0] = 0;
        let err = verify_submit(&user, &tampered, &authorization).unwrap_err();
        assert_eq!(err, AuthError::SignatureMismatch);
    }

    #[test]
    fn proofs_are_domain_separated_per_operation() {
        let key = key_from_seed(7);
        let user = user_of(&key);

        let initialize_proof = sign_initialize(&key);
        let err = verify_submit(&user, &[], &initialize_proof).unwrap_err();
        assert_eq!(err, AuthError::SignatureMismatch);
    }

    #[test]
    fn foreign_key_cannot_authorize_another_identity() {
        let owner_key = key_from_seed(7);
        let intruder_key = key_from_seed(8);
        let owner = user_of(&owner_key);

        let forged = sign_initialize(&intruder_key);
        let err = verify_initialize(&owner, &forged).unwrap_err();
        assert_eq!(err, AuthError::SignatureMismatch);
    }

    #[test]
    fn signature_bytes_round_trip() {
        let key = key_from_seed(7);
        let user = user_of(&key);

        let authorization = sign_initialize(&key);
        let restored = Authorization::from_bytes(&authorization.to_bytes());
        verify_initialize(&user, &restored).unwrap();
    }

    #[test]
    fn non_key_identity_is_rejected_as_invalid() {
        // All-0x02 does not decompress to a curve point.
        let user = UserId::from_bytes([0x02; 32]);
        let authorization = sign_initialize(&key_from_seed(7));

        let err = verify_initialize(&user, &authorization).unwrap_err();
        assert_eq!(err, AuthError::InvalidPublicKey);
    }
}
