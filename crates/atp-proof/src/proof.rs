use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atp_core::{ProofType, PublicInput};
use atp_crypto::{digest_from_hex, Commitment, CommitmentScheme, Digest, Signature};
use atp_identity::OpenedClaim;

use crate::challenge::Challenge;
use crate::error::ProofError;

/// A single proof answering one challenge requirement.
///
/// Carries only a commitment to the secret and the minimum public facts
/// needed for verification; the raw value never appears.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proof {
    /// Which variant this proof is.
    pub proof_type: ProofType,
    /// Hex commitment. For credential proofs this is the claim-set root.
    pub commitment: String,
    /// Hex Fiat-Shamir challenge hash over the commitment and public data.
    pub challenge: String,
    /// Hex Ed25519 signature binding the proof to the prover's key.
    pub response: String,
    /// Public inputs the verifier checks the challenge hash against.
    pub public_inputs: Vec<PublicInput>,
    /// Opened claims with inclusion paths (credential proofs only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merkle_proof: Option<Vec<OpenedClaim>>,
    /// Publicly claimed value (behavior proofs only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_value: Option<f64>,
    /// Ledger size when the proof was built (behavior proofs only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_count: Option<u64>,
    /// When the proof was generated.
    pub timestamp: DateTime<Utc>,
}

impl Proof {
    /// The commitment as raw bytes.
    pub fn commitment_digest(&self) -> Result<Digest, ProofError> {
        Ok(digest_from_hex(&self.commitment)?)
    }

    /// The challenge hash as raw bytes.
    pub fn challenge_digest(&self) -> Result<Digest, ProofError> {
        Ok(digest_from_hex(&self.challenge)?)
    }

    /// The response as an Ed25519 signature.
    pub fn response_signature(&self) -> Result<Signature, ProofError> {
        Ok(Signature::from_hex(&self.response)?)
    }
}

/// Fiat-Shamir transcript hash shared by builder and verifier:
/// H(commitment || challenge nonce || public inputs).
pub(crate) fn transcript_hash(
    scheme: &dyn CommitmentScheme,
    commitment: &Commitment,
    challenge: &Challenge,
    public_inputs: &[PublicInput],
) -> Result<Digest, ProofError> {
    let mut public_data = Vec::new();
    public_data.extend_from_slice(&challenge.nonce_bytes()?);
    for input in public_inputs {
        public_data.extend_from_slice(&input.canonical_bytes());
    }
    Ok(scheme.challenge_hash(commitment, &public_data))
}

/// Text form of a disclosed claim value in the public inputs.
/// Strings go in bare; other JSON values use their compact encoding.
pub(crate) fn claim_value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
