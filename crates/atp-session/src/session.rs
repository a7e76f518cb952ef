use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use atp_core::{Did, ProtocolConfig, Requirement};
use atp_crypto::CommitmentScheme;
use atp_identity::{CredentialWallet, DidResolver, IdentityError};
use atp_proof::{Challenge, ChallengeManager, Proof, ProofBuilder, ProofError, ProofVerifier};

use crate::agent::Agent;
use crate::error::SessionError;

/// A prover's answer to a challenge: one proof per requirement, in the
/// order the challenge listed them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// ID of the challenge being answered.
    pub challenge_id: String,
    /// DID of the responding prover.
    pub prover_did: String,
    /// One proof per challenge requirement.
    pub proofs: Vec<Proof>,
    /// When the response was produced.
    pub timestamp: DateTime<Utc>,
}

/// An individual verification check.
#[derive(Debug, Clone)]
pub struct ProofCheck {
    /// Name of the check.
    pub name: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Optional detail message.
    pub detail: Option<String>,
}

/// Result of verifying an authentication response.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Whether every check passed.
    pub verified: bool,
    /// DID of the prover the result is about.
    pub prover_did: String,
    /// When verification concluded.
    pub timestamp: DateTime<Utc>,
    /// Individual check results.
    pub details: Vec<ProofCheck>,
}

/// The two directions of a mutual authentication run.
#[derive(Debug, Clone)]
pub struct MutualAuthOutcome {
    /// The peer verified against this session's requirements.
    pub peer_result: AuthenticationResult,
    /// This session's agent verified against the peer's requirements.
    pub own_result: AuthenticationResult,
}

impl MutualAuthOutcome {
    /// Mutual authentication succeeds only when both directions did.
    pub fn succeeded(&self) -> bool {
        self.peer_result.verified && self.own_result.verified
    }
}

/// Drives the authentication protocol for one agent: issues challenges
/// as a verifier, answers challenges as a prover, and checks responses
/// against the challenges it issued.
pub struct AuthenticationSession {
    agent: Agent,
    challenges: ChallengeManager,
    builder: ProofBuilder,
    verifier: ProofVerifier,
    resolver: Arc<dyn DidResolver>,
    wallet: Arc<CredentialWallet>,
    config: ProtocolConfig,
}

impl AuthenticationSession {
    /// Create a session for an agent. The resolver supplies DID documents
    /// for identity proofs and the wallet supplies credentials for
    /// credential proofs.
    pub fn new(
        agent: Agent,
        scheme: Arc<dyn CommitmentScheme>,
        resolver: Arc<dyn DidResolver>,
        wallet: Arc<CredentialWallet>,
        config: ProtocolConfig,
    ) -> Self {
        Self {
            challenges: ChallengeManager::new(scheme.clone(), config.clone()),
            builder: ProofBuilder::new(scheme.clone()),
            verifier: ProofVerifier::new(scheme, config.clone()),
            agent,
            resolver,
            wallet,
            config,
        }
    }

    /// The agent this session acts for.
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// DID of the session's agent.
    pub fn did(&self) -> &Did {
        self.agent.did()
    }

    /// Issue a challenge asking `target` to prove the given requirements.
    pub fn request_auth(
        &self,
        target: &Did,
        requirements: Vec<Requirement>,
    ) -> Result<Challenge, SessionError> {
        let challenge = self
            .challenges
            .create_challenge(self.agent.did(), target, requirements)?;
        Ok(challenge)
    }

    /// Issue a challenge with an explicit TTL instead of the configured
    /// default.
    pub fn request_auth_with_ttl(
        &self,
        target: &Did,
        requirements: Vec<Requirement>,
        ttl: Duration,
    ) -> Result<Challenge, SessionError> {
        let challenge =
            self.challenges
                .create_challenge_with_ttl(self.agent.did(), target, requirements, ttl)?;
        Ok(challenge)
    }

    /// Answer a challenge addressed to this agent with one proof per
    /// requirement.
    ///
    /// All-or-nothing: if any required proof cannot be built, the whole
    /// response fails and nothing is returned.
    pub async fn respond_to_challenge(
        &self,
        challenge: &Challenge,
    ) -> Result<AuthResponse, SessionError> {
        challenge.validate(&self.config)?;
        if challenge.is_expired() {
            return Err(ProofError::ChallengeExpired(challenge.id.clone()).into());
        }
        if challenge.prover_did != self.agent.did().as_str() {
            return Err(SessionError::Validation(format!(
                "challenge addresses {}, not this agent",
                challenge.prover_did
            )));
        }

        let mut proofs = Vec::with_capacity(challenge.requirements.len());
        for requirement in &challenge.requirements {
            proofs.push(self.build_proof(challenge, requirement).await?);
        }

        tracing::debug!(
            challenge_id = %challenge.id,
            proofs = proofs.len(),
            "authentication response built"
        );

        Ok(AuthResponse {
            challenge_id: challenge.id.clone(),
            prover_did: self.agent.did().as_str().to_string(),
            proofs,
            timestamp: Utc::now(),
        })
    }

    async fn build_proof(
        &self,
        challenge: &Challenge,
        requirement: &Requirement,
    ) -> Result<Proof, SessionError> {
        let proof = match requirement {
            Requirement::TrustLevel { min_trust_level } => self.builder.build_trust_level(
                challenge,
                self.agent.keypair(),
                self.agent.trust_score(),
                *min_trust_level,
            )?,
            Requirement::Identity => {
                let document = self.resolver.resolve(self.agent.did().as_str()).await?;
                self.builder.build_identity(
                    challenge,
                    self.agent.keypair(),
                    self.agent.did(),
                    &document,
                )?
            }
            Requirement::Credential {
                credential_type,
                disclosed_fields,
            } => {
                let credential = self
                    .wallet
                    .find_by_type(credential_type)
                    .into_iter()
                    .next()
                    .ok_or_else(|| IdentityError::CredentialNotFound(credential_type.clone()))?;
                self.builder.build_credential(
                    challenge,
                    self.agent.keypair(),
                    &credential,
                    credential_type,
                    disclosed_fields,
                )?
            }
            Requirement::Behavior(behavior) => self.builder.build_behavior(
                challenge,
                self.agent.keypair(),
                self.agent.ledger(),
                self.agent.counts(),
                behavior,
            )?,
        };
        Ok(proof)
    }

    /// Verify a response against the challenge it answers.
    ///
    /// Denial is a normal outcome: a response that fails any check comes
    /// back as `verified = false` with the failing checks named. An error
    /// is returned only when the response references no known challenge.
    pub fn verify_auth_response(
        &self,
        response: &AuthResponse,
    ) -> Result<AuthenticationResult, SessionError> {
        let challenge = self.challenges.get(&response.challenge_id).ok_or_else(|| {
            SessionError::Validation(format!("unknown challenge {}", response.challenge_id))
        })?;

        let mut checks = Vec::new();

        // Check 1: Is the challenge still active?
        let active = !challenge.is_expired();
        checks.push(ProofCheck {
            name: "challenge_active".into(),
            passed: active,
            detail: if active {
                None
            } else {
                Some("challenge has expired".into())
            },
        });

        if !active {
            return Ok(self.denied(response, checks));
        }

        // Check 2: Has the challenge been answered before?
        let unused = !self.challenges.is_consumed(&challenge.id);
        checks.push(ProofCheck {
            name: "challenge_unused".into(),
            passed: unused,
            detail: if unused {
                None
            } else {
                Some("challenge was already consumed".into())
            },
        });

        if !unused {
            return Ok(self.denied(response, checks));
        }

        // Check 3: Does the response come from the challenged prover?
        let prover_matches = response.prover_did == challenge.prover_did;
        checks.push(ProofCheck {
            name: "prover_matches".into(),
            passed: prover_matches,
            detail: if prover_matches {
                None
            } else {
                Some(format!(
                    "response from {}, challenge addressed {}",
                    response.prover_did, challenge.prover_did
                ))
            },
        });

        // Check 4: Does the response cover every requirement?
        let complete = response.proofs.len() == challenge.requirements.len();
        checks.push(ProofCheck {
            name: "proof_count".into(),
            passed: complete,
            detail: if complete {
                None
            } else {
                Some(format!(
                    "expected {} proofs, got {}",
                    challenge.requirements.len(),
                    response.proofs.len()
                ))
            },
        });

        if !complete {
            return Ok(self.denied(response, checks));
        }

        // Checks 5..: one per proof, in requirement order.
        let mut all_proofs_valid = true;
        for (index, (requirement, proof)) in challenge
            .requirements
            .iter()
            .zip(&response.proofs)
            .enumerate()
        {
            let passed = self.verifier.verify_proof(&challenge, requirement, proof);
            all_proofs_valid = all_proofs_valid && passed;
            checks.push(ProofCheck {
                name: format!("proof_{}_{}", index, proof.proof_type.as_str()),
                passed,
                detail: if passed {
                    None
                } else {
                    Some("proof verification failed".into())
                },
            });
        }

        let verified = prover_matches && all_proofs_valid;
        if verified {
            self.challenges.mark_consumed(&challenge.id);
        }

        tracing::debug!(
            challenge_id = %challenge.id,
            prover = %response.prover_did,
            verified,
            "authentication response checked"
        );

        Ok(AuthenticationResult {
            verified,
            prover_did: response.prover_did.clone(),
            timestamp: Utc::now(),
            details: checks,
        })
    }

    fn denied(&self, response: &AuthResponse, checks: Vec<ProofCheck>) -> AuthenticationResult {
        AuthenticationResult {
            verified: false,
            prover_did: response.prover_did.clone(),
            timestamp: Utc::now(),
            details: checks,
        }
    }

    /// Run one direction of authentication in-process: challenge the
    /// peer, let it respond, and verify the response.
    ///
    /// Exchange failures are folded into a failed result instead of an
    /// error so the opposite direction of a mutual run is never affected.
    pub async fn authenticate_peer(
        &self,
        peer: &AuthenticationSession,
        requirements: Vec<Requirement>,
    ) -> AuthenticationResult {
        let exchange = async {
            let challenge = self.request_auth(peer.agent.did(), requirements)?;
            let response = peer.respond_to_challenge(&challenge).await?;
            self.verify_auth_response(&response)
        };
        match exchange.await {
            Ok(result) => result,
            Err(error) => AuthenticationResult {
                verified: false,
                prover_did: peer.agent.did().as_str().to_string(),
                timestamp: Utc::now(),
                details: vec![ProofCheck {
                    name: "exchange".into(),
                    passed: false,
                    detail: Some(error.to_string()),
                }],
            },
        }
    }

    /// Authenticate both directions with a peer concurrently.
    ///
    /// `own_requirements` is what this session demands of the peer;
    /// `peer_requirements` is what the peer demands of this agent. The
    /// rounds are independent: one direction failing never blocks or
    /// corrupts the other.
    pub async fn mutual_authenticate(
        &self,
        peer: &AuthenticationSession,
        own_requirements: Vec<Requirement>,
        peer_requirements: Vec<Requirement>,
    ) -> MutualAuthOutcome {
        let (peer_result, own_result) = tokio::join!(
            self.authenticate_peer(peer, own_requirements),
            peer.authenticate_peer(self, peer_requirements),
        );

        tracing::info!(
            peer = %peer.agent.did(),
            peer_verified = peer_result.verified,
            own_verified = own_result.verified,
            "mutual authentication finished"
        );

        MutualAuthOutcome {
            peer_result,
            own_result,
        }
    }
}
