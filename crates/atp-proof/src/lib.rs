//! ATP Proof — challenge-response protocol core for the Agent Trust Protocol.
//!
//! Provides proof construction and verification for:
//! - Trust level proofs (prove score >= threshold without revealing the score)
//! - Identity proofs (prove control of a DID)
//! - Credential proofs (prove possession, selectively disclosing fields)
//! - Behavior proofs (no violations, success rate, policy compliance)

pub mod builder;
pub mod challenge;
pub mod error;
pub mod proof;
pub mod verifier;

pub use builder::ProofBuilder;
pub use challenge::{Challenge, ChallengeManager};
pub use error::ProofError;
pub use proof::Proof;
pub use verifier::ProofVerifier;
