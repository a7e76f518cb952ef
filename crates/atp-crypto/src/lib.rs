//! ATP Crypto — BLAKE3 hashing, Ed25519 signing, hash commitments, and
//! Merkle inclusion proofs for the Agent Trust Protocol.

pub mod commitment;
pub mod error;
pub mod hashing;
pub mod keys;
pub mod merkle;
pub mod signing;

pub use commitment::{Blake3CommitmentScheme, BlindingFactor, Commitment, CommitmentScheme};
pub use error::CryptoError;
pub use hashing::{digest_from_hex, digest_to_hex, hash, Digest};
pub use keys::{AgentKeyPair, PublicKey};
pub use merkle::{merkle_path, merkle_root, verify_merkle_path, MerklePath};
pub use signing::{sign, verify, Signature};
