use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atp_core::{Did, ProofType, ProtocolConfig, Requirement};
use atp_crypto::{digest_from_hex, CommitmentScheme, Digest};

use crate::error::ProofError;

/// A verifier-issued authentication challenge.
///
/// Immutable once created; expiry is evaluated lazily on use, never swept
/// by a background timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    /// Unique challenge ID.
    pub id: String,
    /// DID of the verifier that issued the challenge.
    pub verifier_did: String,
    /// DID of the prover expected to answer.
    pub prover_did: String,
    /// What the prover must demonstrate, in order.
    pub requirements: Vec<Requirement>,
    /// Proof type expected at each requirement position.
    pub proof_types: Vec<ProofType>,
    /// Random 256-bit nonce as hex, binding responses to this challenge.
    pub nonce: String,
    /// When the challenge was issued.
    pub timestamp: DateTime<Utc>,
    /// When the challenge stops being answerable.
    pub expires_at: DateTime<Utc>,
}

impl Challenge {
    /// Whether the challenge has passed its expiry.
    /// Re-evaluated against the clock on every call, never cached.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// The challenge nonce as raw bytes.
    pub fn nonce_bytes(&self) -> Result<Digest, ProofError> {
        Ok(digest_from_hex(&self.nonce)?)
    }

    /// Structural validation: DID shapes, nonce encoding, expiry ordering,
    /// requirement parameters, and position alignment between requirements
    /// and proof types.
    pub fn validate(&self, config: &ProtocolConfig) -> Result<(), ProofError> {
        Did::new(self.verifier_did.as_str())?;
        Did::new(self.prover_did.as_str())?;
        if self.requirements.is_empty() {
            return Err(ProofError::Validation(
                "challenge has no requirements".into(),
            ));
        }
        if self.requirements.len() > config.max_requirements_per_challenge {
            return Err(ProofError::Validation(format!(
                "challenge has {} requirements, limit is {}",
                self.requirements.len(),
                config.max_requirements_per_challenge
            )));
        }
        if self.proof_types.len() != self.requirements.len() {
            return Err(ProofError::Validation(
                "proof types do not align with requirements".into(),
            ));
        }
        if self.expires_at <= self.timestamp {
            return Err(ProofError::Validation(
                "challenge must expire after its issue time".into(),
            ));
        }
        self.nonce_bytes()?;
        for (requirement, proof_type) in self.requirements.iter().zip(&self.proof_types) {
            requirement.validate()?;
            if requirement.proof_type() != *proof_type {
                return Err(ProofError::UnsupportedProofType(
                    proof_type.as_str().to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Issues challenges and tracks their single-use consumption.
///
/// Thread-safe: uses `DashMap` for concurrent access.
pub struct ChallengeManager {
    scheme: Arc<dyn CommitmentScheme>,
    issued: DashMap<String, Challenge>,
    consumed: DashMap<String, DateTime<Utc>>,
    config: ProtocolConfig,
}

impl ChallengeManager {
    /// Create a manager issuing challenges under the given scheme and config.
    pub fn new(scheme: Arc<dyn CommitmentScheme>, config: ProtocolConfig) -> Self {
        Self {
            scheme,
            issued: DashMap::new(),
            consumed: DashMap::new(),
            config,
        }
    }

    /// Issue a challenge with the configured default TTL.
    pub fn create_challenge(
        &self,
        verifier_did: &Did,
        prover_did: &Did,
        requirements: Vec<Requirement>,
    ) -> Result<Challenge, ProofError> {
        let ttl = Duration::minutes(self.config.default_challenge_ttl_minutes);
        self.create_challenge_with_ttl(verifier_did, prover_did, requirements, ttl)
    }

    /// Issue a challenge that expires after the given TTL.
    pub fn create_challenge_with_ttl(
        &self,
        verifier_did: &Did,
        prover_did: &Did,
        requirements: Vec<Requirement>,
        ttl: Duration,
    ) -> Result<Challenge, ProofError> {
        let now = Utc::now();
        let proof_types = requirements.iter().map(|r| r.proof_type()).collect();
        let challenge = Challenge {
            id: Uuid::now_v7().to_string(),
            verifier_did: verifier_did.as_str().to_string(),
            prover_did: prover_did.as_str().to_string(),
            requirements,
            proof_types,
            nonce: self.scheme.nonce(),
            timestamp: now,
            expires_at: now + ttl,
        };
        challenge.validate(&self.config)?;
        self.issued.insert(challenge.id.clone(), challenge.clone());
        tracing::debug!(
            challenge_id = %challenge.id,
            prover = %challenge.prover_did,
            "challenge issued"
        );
        Ok(challenge)
    }

    /// Look up an issued challenge by ID.
    pub fn get(&self, id: &str) -> Option<Challenge> {
        self.issued.get(id).map(|e| e.clone())
    }

    /// Whether a challenge has already been answered successfully.
    pub fn is_consumed(&self, id: &str) -> bool {
        self.consumed.contains_key(id)
    }

    /// Mark a challenge as consumed so later responses to the same ID
    /// are rejected.
    pub fn mark_consumed(&self, id: &str) {
        self.consumed.insert(id.to_string(), Utc::now());
        tracing::debug!(challenge_id = %id, "challenge consumed");
    }

    /// Number of challenges issued so far.
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}
