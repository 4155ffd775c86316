//! Hash commitments binding a player's secrets to the shared game record
//!
//! A player commits to two secrets when taking a seat: the encrypt secret,
//! which blinds the public board commitment, and the mask secret, which hides
//! their private board. Commitments are accepted unconditionally; a forged
//! commitment is caught the first time the secret has to be presented to
//! authorize a move.

use std::fmt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha256};
use crate::error::{GameResult, ProtocolError};
use crate::game::Seat;

/// Width in bytes of secrets and digests
pub const FIELD_BYTES: usize = 32;

/// SHA-256 digest used for commitments and fingerprints
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; FIELD_BYTES]);

impl Digest {
    pub const ZERO: Digest = Digest([0u8; FIELD_BYTES]);

    pub fn from_bytes(bytes: [u8; FIELD_BYTES]) -> Self {
        Digest(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; FIELD_BYTES] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 64-character hex string
    pub fn from_hex(value: &str) -> GameResult<Self> {
        Ok(Digest(decode_field(value)?))
    }

    /// Hash the concatenation of `parts`
    pub fn of_parts(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        Digest(hasher.finalize().into())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Digest::from_hex(&value).map_err(serde::de::Error::custom)
    }
}

/// A player-held secret: a 256-bit unsigned integer stored big-endian
///
/// `Debug` output is redacted so secrets never end up in logs.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Secret([u8; FIELD_BYTES]);

impl Secret {
    pub fn from_bytes(bytes: [u8; FIELD_BYTES]) -> Self {
        Secret(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; FIELD_BYTES] {
        &self.0
    }

    /// Parse a 64-character hex string
    pub fn from_hex(value: &str) -> GameResult<Self> {
        Ok(Secret(decode_field(value)?))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<u64> for Secret {
    fn from(value: u64) -> Self {
        let mut bytes = [0u8; FIELD_BYTES];
        bytes[FIELD_BYTES - 8..].copy_from_slice(&value.to_be_bytes());
        Secret(bytes)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(<redacted>)")
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Secret::from_hex(&value).map_err(serde::de::Error::custom)
    }
}

fn decode_field(value: &str) -> GameResult<[u8; FIELD_BYTES]> {
    let bytes = hex::decode(value)?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        ProtocolError::invalid_parameter(
            "hex",
            format!("expected {} bytes, got {}", FIELD_BYTES, bytes.len()),
        )
    })
}

/// Commit to a secret: `SHA256(secret)`
pub fn commit(secret: &Secret) -> Digest {
    Digest(Sha256::digest(secret.as_bytes()).into())
}

/// Which of a player's two secrets a commitment refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecretKind {
    Encrypt,
    Mask,
}

impl fmt::Display for SecretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretKind::Encrypt => write!(f, "encrypt"),
            SecretKind::Mask => write!(f, "mask"),
        }
    }
}

/// The pair of secrets a player supplies from external key storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSecrets {
    pub encrypt_secret: Secret,
    pub mask_secret: Secret,
}

impl PlayerSecrets {
    pub fn new(encrypt_secret: Secret, mask_secret: Secret) -> Self {
        Self { encrypt_secret, mask_secret }
    }

    /// Compute the public commitments for this pair
    pub fn commitments(&self) -> SeatCommitments {
        SeatCommitments {
            encrypt_hash: commit(&self.encrypt_secret),
            mask_hash: commit(&self.mask_secret),
        }
    }
}

/// Public commitments recorded for one seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatCommitments {
    pub encrypt_hash: Digest,
    pub mask_hash: Digest,
}

impl SeatCommitments {
    /// Reveal-and-recompute check.
    ///
    /// Pure predicate: it never touches game or player state, so callers run
    /// it before building any candidate transition.
    pub fn verify(&self, seat: Seat, secrets: &PlayerSecrets) -> GameResult<()> {
        if commit(&secrets.encrypt_secret) != self.encrypt_hash {
            return Err(ProtocolError::CommitmentMismatch {
                seat,
                secret: SecretKind::Encrypt,
            });
        }

        if commit(&secrets.mask_secret) != self.mask_hash {
            return Err(ProtocolError::CommitmentMismatch {
                seat,
                secret: SecretKind::Mask,
            });
        }

        Ok(())
    }

    /// Whether `secrets` open both commitments
    pub fn matches(&self, secrets: &PlayerSecrets) -> bool {
        *self == secrets.commitments()
    }
}
