use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::hashing::{self, Digest};

/// Random blinding factor for commitments (256-bit).
/// Kept secret until a commitment is deliberately opened; zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct BlindingFactor([u8; 32]);

impl BlindingFactor {
    /// Fresh cryptographically random blinding.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wrap existing bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Encode as a 64-character hex string (used when a claim is opened).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode from the hex form.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes =
            hex::decode(s).map_err(|e| CryptoError::InvalidInput(format!("invalid hex: {}", e)))?;
        let arr: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidInput(format!("blinding must be 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for BlindingFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the secret bytes.
        write!(f, "BlindingFactor(..)")
    }
}

/// A hash commitment to a secret value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// The commitment digest.
    pub hash: Digest,
}

impl Commitment {
    /// Encode as a 64-character hex string.
    pub fn to_hex(&self) -> String {
        hashing::digest_to_hex(&self.hash)
    }

    /// Decode from the hex form.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        Ok(Self {
            hash: hashing::digest_from_hex(s)?,
        })
    }

    /// Check that a value and blinding open this commitment.
    pub fn verify_opening(
        &self,
        scheme: &dyn CommitmentScheme,
        value: &[u8],
        blinding: &BlindingFactor,
    ) -> bool {
        scheme.commit(value, blinding) == *self
    }
}

/// Commitment operations used by proof builders and verifiers.
///
/// `commit` and `challenge_hash` must be deterministic so a verifier can
/// recompute both from public data. Implementations other than the BLAKE3
/// scheme (e.g. curve-based ones) satisfy the same contracts.
pub trait CommitmentScheme: Send + Sync {
    /// Commit to a value under a blinding factor.
    fn commit(&self, value: &[u8], blinding: &BlindingFactor) -> Commitment;

    /// Fresh random blinding factor (at least 128 bits of entropy).
    fn random_blinding(&self) -> BlindingFactor;

    /// Fresh 256-bit nonce as a 64-character hex string, unique per call.
    fn nonce(&self) -> String;

    /// Fiat-Shamir style challenge hash binding a commitment to public data.
    fn challenge_hash(&self, commitment: &Commitment, public_data: &[u8]) -> Digest;
}

/// BLAKE3 hash-commitment scheme: commit = H(value || blinding).
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3CommitmentScheme;

impl Blake3CommitmentScheme {
    pub fn new() -> Self {
        Self
    }
}

impl CommitmentScheme for Blake3CommitmentScheme {
    fn commit(&self, value: &[u8], blinding: &BlindingFactor) -> Commitment {
        let mut input = Vec::with_capacity(value.len() + 32);
        input.extend_from_slice(value);
        input.extend_from_slice(blinding.as_bytes());
        Commitment {
            hash: hashing::hash(&input),
        }
    }

    fn random_blinding(&self) -> BlindingFactor {
        BlindingFactor::random()
    }

    fn nonce(&self) -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    fn challenge_hash(&self, commitment: &Commitment, public_data: &[u8]) -> Digest {
        let mut input = Vec::with_capacity(32 + public_data.len());
        input.extend_from_slice(&commitment.hash);
        input.extend_from_slice(public_data);
        hashing::hash(&input)
    }
}
