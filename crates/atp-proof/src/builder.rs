use std::sync::Arc;

use chrono::Utc;

use atp_core::{BehaviorRequirement, Did, ProofType, PublicInput};
use atp_crypto::{digest_to_hex, sign, AgentKeyPair, Commitment, CommitmentScheme};
use atp_identity::{ClaimCommitmentSet, DidDocument, VerifiableCredential};
use atp_ledger::{BehaviorLedger, InteractionCounts};

use crate::challenge::Challenge;
use crate::error::ProofError;
use crate::proof::{claim_value_text, transcript_hash, Proof};

/// Builds proofs answering challenge requirements from the prover's
/// local secret state.
///
/// Every variant follows the same shape: commit to the secret under a
/// fresh blinding, derive a Fiat-Shamir challenge hash over the commitment
/// and public data, then sign the transcript with the prover's key.
pub struct ProofBuilder {
    scheme: Arc<dyn CommitmentScheme>,
}

impl ProofBuilder {
    pub fn new(scheme: Arc<dyn CommitmentScheme>) -> Self {
        Self { scheme }
    }

    /// Prove the trust score meets a minimum without revealing the score.
    ///
    /// Fails with `ThresholdNotMet` when the score is short; the error
    /// carries only the public threshold.
    pub fn build_trust_level(
        &self,
        challenge: &Challenge,
        keypair: &AgentKeyPair,
        actual_score: f64,
        min_trust_level: f64,
    ) -> Result<Proof, ProofError> {
        self.refuse_expired(challenge)?;
        if !(0.0..=1.0).contains(&actual_score) {
            return Err(ProofError::Validation(
                "trust score must be between 0.0 and 1.0".into(),
            ));
        }
        if actual_score < min_trust_level {
            return Err(ProofError::ThresholdNotMet {
                threshold: min_trust_level,
            });
        }

        let blinding = self.scheme.random_blinding();
        let commitment = self.scheme.commit(&actual_score.to_le_bytes(), &blinding);
        let public_inputs = vec![PublicInput::number(min_trust_level)];
        let challenge_hash =
            transcript_hash(self.scheme.as_ref(), &commitment, challenge, &public_inputs)?;

        let mut message = Vec::new();
        message.extend_from_slice(&commitment.hash);
        message.extend_from_slice(&challenge_hash);
        message.extend_from_slice(&min_trust_level.to_le_bytes());
        let response = sign(&message, keypair);

        tracing::debug!(challenge_id = %challenge.id, "trust level proof built");

        Ok(Proof {
            proof_type: ProofType::TrustLevel,
            commitment: commitment.to_hex(),
            challenge: digest_to_hex(&challenge_hash),
            response: response.to_hex(),
            public_inputs,
            merkle_proof: None,
            claimed_value: None,
            interaction_count: None,
            timestamp: Utc::now(),
        })
    }

    /// Prove control of a DID.
    ///
    /// The DID's method prefix goes into the public inputs; the response
    /// signs the challenge nonce with the key the DID document references.
    pub fn build_identity(
        &self,
        challenge: &Challenge,
        keypair: &AgentKeyPair,
        did: &Did,
        document: &DidDocument,
    ) -> Result<Proof, ProofError> {
        self.refuse_expired(challenge)?;
        if !document.references_key(&keypair.public_key()) {
            return Err(ProofError::Validation(
                "signing key is not referenced by the DID document".into(),
            ));
        }
        let method_prefix = did
            .method_prefix()
            .ok_or_else(|| ProofError::Validation("DID has no method prefix".into()))?;

        let blinding = self.scheme.random_blinding();
        let commitment = self.scheme.commit(did.as_str().as_bytes(), &blinding);
        let public_inputs = vec![PublicInput::text(method_prefix)];
        let challenge_hash =
            transcript_hash(self.scheme.as_ref(), &commitment, challenge, &public_inputs)?;

        // Key control is demonstrated by signing the challenge nonce.
        let response = sign(&challenge.nonce_bytes()?, keypair);

        tracing::debug!(challenge_id = %challenge.id, did = %did, "identity proof built");

        Ok(Proof {
            proof_type: ProofType::Identity,
            commitment: commitment.to_hex(),
            challenge: digest_to_hex(&challenge_hash),
            response: response.to_hex(),
            public_inputs,
            merkle_proof: None,
            claimed_value: None,
            interaction_count: None,
            timestamp: Utc::now(),
        })
    }

    /// Prove possession of a credential of the requested type, disclosing
    /// only the named claim fields.
    ///
    /// The commitment is the Merkle root over per-claim commitments;
    /// disclosed fields ship as opened claims with inclusion paths.
    pub fn build_credential(
        &self,
        challenge: &Challenge,
        keypair: &AgentKeyPair,
        credential: &VerifiableCredential,
        credential_type: &str,
        disclosed_fields: &[String],
    ) -> Result<Proof, ProofError> {
        self.refuse_expired(challenge)?;
        if !credential.has_type(credential_type) {
            return Err(ProofError::Validation(format!(
                "credential does not carry type {}",
                credential_type
            )));
        }
        if credential.is_expired() {
            return Err(ProofError::Validation("credential has expired".into()));
        }

        let set = ClaimCommitmentSet::commit_claims(self.scheme.as_ref(), &credential.claims)?;
        let commitment = Commitment { hash: set.root() };

        let mut public_inputs = vec![PublicInput::text(credential_type)];
        let mut opened = Vec::with_capacity(disclosed_fields.len());
        for field in disclosed_fields {
            let claim = set.open(field)?;
            public_inputs.push(PublicInput::text(claim_value_text(&claim.value)));
            opened.push(claim);
        }
        let challenge_hash =
            transcript_hash(self.scheme.as_ref(), &commitment, challenge, &public_inputs)?;

        let mut message = Vec::new();
        message.extend_from_slice(&commitment.hash);
        message.extend_from_slice(&challenge_hash);
        message.extend_from_slice(credential_type.as_bytes());
        let response = sign(&message, keypair);

        tracing::debug!(
            challenge_id = %challenge.id,
            credential_type,
            disclosed = disclosed_fields.len(),
            "credential proof built"
        );

        Ok(Proof {
            proof_type: ProofType::Credential,
            commitment: commitment.to_hex(),
            challenge: digest_to_hex(&challenge_hash),
            response: response.to_hex(),
            public_inputs,
            merkle_proof: (!opened.is_empty()).then_some(opened),
            claimed_value: None,
            interaction_count: None,
            timestamp: Utc::now(),
        })
    }

    /// Prove a property of the interaction history backed by the ledger.
    ///
    /// The commitment binds the ledger root and the claimed value together,
    /// so neither can be swapped after the fact.
    pub fn build_behavior(
        &self,
        challenge: &Challenge,
        keypair: &AgentKeyPair,
        ledger: &BehaviorLedger,
        counts: &InteractionCounts,
        requirement: &BehaviorRequirement,
    ) -> Result<Proof, ProofError> {
        self.refuse_expired(challenge)?;

        let (claimed_value, interaction_count, public_inputs) = match requirement {
            BehaviorRequirement::NoViolations => {
                if counts.violation_count > 0 {
                    return Err(ProofError::ViolationsPresent);
                }
                (
                    0.0,
                    ledger.len() as u64,
                    vec![PublicInput::text("no_violations")],
                )
            }
            BehaviorRequirement::SuccessRate { threshold } => {
                let rate = counts
                    .success_rate_percent()
                    .ok_or_else(|| ProofError::Validation("no interactions recorded".into()))?;
                if rate < *threshold {
                    return Err(ProofError::RateBelowThreshold {
                        threshold: *threshold,
                    });
                }
                (
                    rate,
                    counts.total(),
                    vec![
                        PublicInput::text("success_rate"),
                        PublicInput::number(*threshold),
                    ],
                )
            }
            // Assumes compliance was established by the caller; claims
            // full compliance bound to the policy id.
            BehaviorRequirement::PolicyCompliance { policy_id } => (
                100.0,
                ledger.len() as u64,
                vec![
                    PublicInput::text("policy_compliance"),
                    PublicInput::text(policy_id.clone()),
                ],
            ),
        };

        let blinding = self.scheme.random_blinding();
        let mut value = Vec::with_capacity(40);
        value.extend_from_slice(&ledger.root());
        value.extend_from_slice(&claimed_value.to_le_bytes());
        let commitment = self.scheme.commit(&value, &blinding);

        let challenge_hash =
            transcript_hash(self.scheme.as_ref(), &commitment, challenge, &public_inputs)?;

        let mut message = Vec::new();
        message.extend_from_slice(&commitment.hash);
        message.extend_from_slice(&challenge_hash);
        message.extend_from_slice(&claimed_value.to_le_bytes());
        let response = sign(&message, keypair);

        tracing::debug!(
            challenge_id = %challenge.id,
            kind = requirement.kind(),
            "behavior proof built"
        );

        Ok(Proof {
            proof_type: ProofType::Behavior,
            commitment: commitment.to_hex(),
            challenge: digest_to_hex(&challenge_hash),
            response: response.to_hex(),
            public_inputs,
            merkle_proof: None,
            claimed_value: Some(claimed_value),
            interaction_count: Some(interaction_count),
            timestamp: Utc::now(),
        })
    }

    fn refuse_expired(&self, challenge: &Challenge) -> Result<(), ProofError> {
        if challenge.is_expired() {
            return Err(ProofError::ChallengeExpired(challenge.id.clone()));
        }
        Ok(())
    }
}
