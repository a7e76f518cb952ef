use std::sync::Arc;

use atp_core::{BehaviorRequirement, ProofType, ProtocolConfig, PublicInput, Requirement};
use atp_crypto::{Commitment, CommitmentScheme};
use atp_identity::verify_opened_claim;

use crate::challenge::Challenge;
use crate::proof::{claim_value_text, transcript_hash, Proof};

/// Checks proofs against the requirements that produced a challenge.
///
/// Verification never re-derives the prover's secret; it checks that the
/// proof is internally consistent with the challenge and that the public
/// inputs carry exactly what the requirement demands. A failed check is
/// a normal outcome: every routine returns `false` instead of erroring,
/// and tampered proofs fail closed.
pub struct ProofVerifier {
    scheme: Arc<dyn CommitmentScheme>,
    config: ProtocolConfig,
}

impl ProofVerifier {
    pub fn new(scheme: Arc<dyn CommitmentScheme>, config: ProtocolConfig) -> Self {
        Self { scheme, config }
    }

    /// Check one proof against the requirement at its challenge position.
    pub fn verify_proof(
        &self,
        challenge: &Challenge,
        requirement: &Requirement,
        proof: &Proof,
    ) -> bool {
        if proof.proof_type != requirement.proof_type() {
            tracing::debug!(
                challenge_id = %challenge.id,
                expected = %requirement.proof_type(),
                got = %proof.proof_type,
                "proof type does not answer requirement"
            );
            return false;
        }
        let verified = match requirement {
            Requirement::TrustLevel { min_trust_level } => {
                self.verify_trust_level(challenge, proof, *min_trust_level)
            }
            Requirement::Identity => self.verify_identity(challenge, proof),
            Requirement::Credential {
                credential_type,
                disclosed_fields,
            } => self.verify_credential(challenge, proof, credential_type, disclosed_fields),
            Requirement::Behavior(behavior) => self.verify_behavior(challenge, proof, behavior),
        };
        tracing::debug!(
            challenge_id = %challenge.id,
            proof_type = %proof.proof_type,
            verified,
            "proof checked"
        );
        verified
    }

    /// The proof must commit to a score and bind the exact required
    /// minimum into its public inputs.
    pub fn verify_trust_level(
        &self,
        challenge: &Challenge,
        proof: &Proof,
        min_trust_level: f64,
    ) -> bool {
        if proof.proof_type != ProofType::TrustLevel {
            return false;
        }
        if !self.structurally_sound(challenge, proof) {
            return false;
        }
        contains_number(&proof.public_inputs, min_trust_level)
    }

    /// The proof must carry a supported DID method prefix and a
    /// well-formed signature over the challenge nonce.
    pub fn verify_identity(&self, challenge: &Challenge, proof: &Proof) -> bool {
        if proof.proof_type != ProofType::Identity {
            return false;
        }
        if !self.structurally_sound(challenge, proof) {
            return false;
        }
        proof.public_inputs.iter().any(|input| match input {
            PublicInput::Text(text) => text
                .strip_prefix("did:")
                .is_some_and(|method| self.config.supports_did_method(method)),
            PublicInput::Number(_) => false,
        })
    }

    /// The proof must bind the exact requested credential type, and every
    /// requested disclosure must open against the commitment-set root.
    pub fn verify_credential(
        &self,
        challenge: &Challenge,
        proof: &Proof,
        credential_type: &str,
        disclosed_fields: &[String],
    ) -> bool {
        if proof.proof_type != ProofType::Credential {
            return false;
        }
        if !self.structurally_sound(challenge, proof) {
            return false;
        }
        if !contains_text(&proof.public_inputs, credential_type) {
            return false;
        }

        let root = match proof.commitment_digest() {
            Ok(digest) => digest,
            Err(_) => return false,
        };
        let opened = proof.merkle_proof.as_deref().unwrap_or(&[]);
        for claim in opened {
            if !verify_opened_claim(self.scheme.as_ref(), claim, &root) {
                return false;
            }
        }
        disclosed_fields.iter().all(|field| {
            opened.iter().any(|claim| {
                claim.name == *field
                    && contains_text(&proof.public_inputs, &claim_value_text(&claim.value))
            })
        })
    }

    /// The claimed value must satisfy the behavioral requirement the
    /// proof names in its public inputs.
    pub fn verify_behavior(
        &self,
        challenge: &Challenge,
        proof: &Proof,
        requirement: &BehaviorRequirement,
    ) -> bool {
        if proof.proof_type != ProofType::Behavior {
            return false;
        }
        if !self.structurally_sound(challenge, proof) {
            return false;
        }
        let claimed = match proof.claimed_value {
            Some(value) => value,
            None => return false,
        };
        if proof.interaction_count.is_none() {
            return false;
        }
        if !contains_text(&proof.public_inputs, requirement.kind()) {
            return false;
        }
        match requirement {
            BehaviorRequirement::NoViolations => claimed.abs() < f64::EPSILON,
            BehaviorRequirement::SuccessRate { threshold } => {
                (0.0..=100.0).contains(&claimed)
                    && claimed >= *threshold
                    && proof.interaction_count.is_some_and(|count| count > 0)
            }
            BehaviorRequirement::PolicyCompliance { policy_id } => {
                contains_text(&proof.public_inputs, policy_id)
                    && (claimed - 100.0).abs() < f64::EPSILON
            }
        }
    }

    /// Common structural checks: the commitment and challenge hash decode,
    /// the Fiat-Shamir transcript recomputes to the stated challenge hash,
    /// and the response parses as an Ed25519 signature.
    fn structurally_sound(&self, challenge: &Challenge, proof: &Proof) -> bool {
        let commitment = match proof.commitment_digest() {
            Ok(digest) => Commitment { hash: digest },
            Err(_) => return false,
        };
        let expected = match transcript_hash(
            self.scheme.as_ref(),
            &commitment,
            challenge,
            &proof.public_inputs,
        ) {
            Ok(digest) => digest,
            Err(_) => return false,
        };
        match proof.challenge_digest() {
            Ok(digest) if digest == expected => {}
            _ => return false,
        }
        proof.response_signature().is_ok()
    }
}

fn contains_number(inputs: &[PublicInput], expected: f64) -> bool {
    inputs
        .iter()
        .any(|input| matches!(input, PublicInput::Number(n) if (n - expected).abs() < f64::EPSILON))
}

fn contains_text(inputs: &[PublicInput], expected: &str) -> bool {
    inputs
        .iter()
        .any(|input| matches!(input, PublicInput::Text(t) if t == expected))
}
