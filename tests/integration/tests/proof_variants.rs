//! Integration test: building and verifying every proof variant.
//!
//! Exercises atp-proof together with atp-crypto, atp-identity, and
//! atp-ledger: trust level, identity, credential, and behavior proofs,
//! plus tamper rejection at the verifier.

use std::sync::Arc;

use atp_core::{BehaviorRequirement, Did, ProofType, ProtocolConfig, Requirement};
use atp_crypto::{verify, AgentKeyPair, Blake3CommitmentScheme, CommitmentScheme};
use atp_identity::{verify_opened_claim, DidRegistry, VerifiableCredential};
use atp_ledger::{BehaviorLedger, InteractionCounts, InteractionOutcome};
use atp_proof::{Challenge, ChallengeManager, ProofBuilder, ProofError, ProofVerifier};

fn scheme() -> Arc<dyn CommitmentScheme> {
    Arc::new(Blake3CommitmentScheme::new())
}

/// Helper: issue a challenge for the given requirements between two
/// fixed DIDs, and hand back a builder and verifier on the same scheme.
fn setup(requirements: Vec<Requirement>) -> (Challenge, ProofBuilder, ProofVerifier) {
    let manager = ChallengeManager::new(scheme(), ProtocolConfig::default());
    let challenge = manager
        .create_challenge(
            &Did::from_parts("atp", "verifier"),
            &Did::from_parts("atp", "prover"),
            requirements,
        )
        .expect("challenge should issue");
    let builder = ProofBuilder::new(scheme());
    let verifier = ProofVerifier::new(scheme(), ProtocolConfig::default());
    (challenge, builder, verifier)
}

/// Helper: a ledger and counters with the given outcome mix.
fn history(successes: usize, violations: usize) -> (BehaviorLedger, InteractionCounts) {
    let mut ledger = BehaviorLedger::new();
    let mut counts = InteractionCounts::new();
    for i in 0..successes {
        ledger.add_commitment(&format!("ok-{}", i), InteractionOutcome::Success);
        counts.record(InteractionOutcome::Success);
    }
    for i in 0..violations {
        ledger.add_commitment(&format!("bad-{}", i), InteractionOutcome::Violation);
        counts.record(InteractionOutcome::Violation);
    }
    (ledger, counts)
}

fn flip_first_hex_char(s: &str) -> String {
    let replacement = if s.starts_with('0') { "1" } else { "0" };
    format!("{}{}", replacement, &s[1..])
}

// =========================================================================
// Trust level proofs
// =========================================================================

#[test]
fn test_trust_level_above_threshold() {
    let (challenge, builder, verifier) = setup(vec![Requirement::trust_level(0.5)]);
    let kp = AgentKeyPair::generate();

    let proof = builder
        .build_trust_level(&challenge, &kp, 0.75, 0.5)
        .expect("score above threshold should prove");

    assert_eq!(proof.proof_type, ProofType::TrustLevel);
    assert!(verifier.verify_trust_level(&challenge, &proof, 0.5));
    assert!(verifier.verify_proof(&challenge, &challenge.requirements[0], &proof));
}

#[test]
fn test_trust_level_exact_threshold() {
    let (challenge, builder, verifier) = setup(vec![Requirement::trust_level(0.5)]);
    let kp = AgentKeyPair::generate();

    let proof = builder
        .build_trust_level(&challenge, &kp, 0.5, 0.5)
        .expect("score equal to threshold should prove");
    assert!(verifier.verify_trust_level(&challenge, &proof, 0.5));
}

#[test]
fn test_trust_level_below_threshold_refused() {
    let (challenge, builder, _) = setup(vec![Requirement::trust_level(0.5)]);
    let kp = AgentKeyPair::generate();

    let err = builder
        .build_trust_level(&challenge, &kp, 0.3, 0.5)
        .expect_err("score below threshold must not prove");

    // The error names the public threshold but never the actual score.
    let message = err.to_string();
    assert!(message.contains("0.5"));
    assert!(!message.contains("0.3"));
}

#[test]
fn test_trust_level_wrong_minimum_rejected() {
    let (challenge, builder, verifier) = setup(vec![Requirement::trust_level(0.5)]);
    let kp = AgentKeyPair::generate();

    let proof = builder
        .build_trust_level(&challenge, &kp, 0.75, 0.5)
        .unwrap();

    // A proof built for one minimum does not satisfy a stricter one.
    assert!(!verifier.verify_trust_level(&challenge, &proof, 0.9));
}

// =========================================================================
// Identity proofs
// =========================================================================

#[test]
fn test_identity_proof_round_trip() {
    let registry = DidRegistry::new();
    let kp = AgentKeyPair::generate();
    let (did, document) = registry.register_key("atp", &kp.public_key()).unwrap();

    let manager = ChallengeManager::new(scheme(), ProtocolConfig::default());
    let challenge = manager
        .create_challenge(
            &Did::from_parts("atp", "verifier"),
            &did,
            vec![Requirement::identity()],
        )
        .unwrap();

    let builder = ProofBuilder::new(scheme());
    let proof = builder
        .build_identity(&challenge, &kp, &did, &document)
        .expect("identity proof should build");

    let verifier = ProofVerifier::new(scheme(), ProtocolConfig::default());
    assert!(verifier.verify_identity(&challenge, &proof));

    // The response is a real signature over the challenge nonce, so the
    // prover stays accountable to its registered key.
    let nonce = challenge.nonce_bytes().unwrap();
    let signature = proof.response_signature().unwrap();
    assert!(verify(&nonce, &signature, &kp.public_key()).is_ok());
}

#[test]
fn test_identity_unsupported_method_rejected() {
    let registry = DidRegistry::new();
    let kp = AgentKeyPair::generate();
    let (did, document) = registry.register_key("web", &kp.public_key()).unwrap();

    let manager = ChallengeManager::new(scheme(), ProtocolConfig::default());
    let challenge = manager
        .create_challenge(
            &Did::from_parts("atp", "verifier"),
            &did,
            vec![Requirement::identity()],
        )
        .unwrap();

    let builder = ProofBuilder::new(scheme());
    let proof = builder.build_identity(&challenge, &kp, &did, &document).unwrap();

    // did:web is not in the default supported method set.
    let verifier = ProofVerifier::new(scheme(), ProtocolConfig::default());
    assert!(!verifier.verify_identity(&challenge, &proof));
}

// =========================================================================
// Credential proofs with selective disclosure
// =========================================================================

fn certification_credential(issuer: &AgentKeyPair) -> VerifiableCredential {
    VerifiableCredential::new(
        "did:atp:issuer".into(),
        "did:atp:prover".into(),
        vec!["ServiceCertification".into()],
        serde_json::json!({
            "serviceLevel": "gold",
            "region": "eu-west",
            "maxConcurrency": 32
        }),
    )
    .issue(issuer)
    .expect("issuance should succeed")
}

#[test]
fn test_credential_proof_with_disclosure() {
    let issuer = AgentKeyPair::generate();
    let credential = certification_credential(&issuer);
    let disclosed = vec!["serviceLevel".to_string()];

    let (challenge, builder, verifier) = setup(vec![Requirement::credential_with_fields(
        "ServiceCertification",
        disclosed.clone(),
    )]);
    let kp = AgentKeyPair::generate();

    let proof = builder
        .build_credential(&challenge, &kp, &credential, "ServiceCertification", &disclosed)
        .expect("credential proof should build");

    assert!(verifier.verify_credential(&challenge, &proof, "ServiceCertification", &disclosed));

    // Each opened claim carries a Merkle path back to the committed root.
    let opened = proof.merkle_proof.as_ref().expect("one claim disclosed");
    assert_eq!(opened.len(), 1);
    let root = proof.commitment_digest().unwrap();
    assert!(verify_opened_claim(scheme().as_ref(), &opened[0], &root));
}

#[test]
fn test_credential_tampered_disclosure_rejected() {
    let issuer = AgentKeyPair::generate();
    let credential = certification_credential(&issuer);
    let disclosed = vec!["serviceLevel".to_string()];

    let (challenge, builder, verifier) = setup(vec![Requirement::credential_with_fields(
        "ServiceCertification",
        disclosed.clone(),
    )]);
    let kp = AgentKeyPair::generate();

    let mut proof = builder
        .build_credential(&challenge, &kp, &credential, "ServiceCertification", &disclosed)
        .unwrap();

    // Claim an upgraded tier; the Merkle path no longer matches.
    proof.merkle_proof.as_mut().unwrap()[0].value = serde_json::json!("platinum");
    assert!(!verifier.verify_credential(&challenge, &proof, "ServiceCertification", &disclosed));
}

#[test]
fn test_credential_undisclosed_claims_stay_hidden() {
    let issuer = AgentKeyPair::generate();
    let credential = certification_credential(&issuer);
    let disclosed = vec!["serviceLevel".to_string()];

    let (challenge, builder, _) = setup(vec![Requirement::credential_with_fields(
        "ServiceCertification",
        disclosed.clone(),
    )]);
    let kp = AgentKeyPair::generate();

    let proof = builder
        .build_credential(&challenge, &kp, &credential, "ServiceCertification", &disclosed)
        .unwrap();

    // The wire form reveals the disclosed claim and nothing else.
    let wire = serde_json::to_string(&proof).unwrap();
    assert!(wire.contains("serviceLevel"));
    assert!(wire.contains("gold"));
    assert!(!wire.contains("region"));
    assert!(!wire.contains("eu-west"));
    assert!(!wire.contains("maxConcurrency"));
}

#[test]
fn test_credential_wrong_type_refused() {
    let issuer = AgentKeyPair::generate();
    let credential = certification_credential(&issuer);

    let (challenge, builder, _) = setup(vec![Requirement::credential("DataProcessingAgreement")]);
    let kp = AgentKeyPair::generate();

    let result = builder.build_credential(
        &challenge,
        &kp,
        &credential,
        "DataProcessingAgreement",
        &[],
    );
    assert!(matches!(result, Err(ProofError::Validation(_))));
}

// =========================================================================
// Behavior proofs
// =========================================================================

#[test]
fn test_no_violations_proof() {
    let (ledger, counts) = history(5, 0);
    let requirement = BehaviorRequirement::NoViolations;
    let (challenge, builder, verifier) = setup(vec![Requirement::no_violations()]);
    let kp = AgentKeyPair::generate();

    let proof = builder
        .build_behavior(&challenge, &kp, &ledger, &counts, &requirement)
        .expect("clean history should prove");

    assert_eq!(proof.interaction_count, Some(5));
    assert!(verifier.verify_behavior(&challenge, &proof, &requirement));
}

#[test]
fn test_no_violations_refused_with_violation() {
    let (ledger, counts) = history(5, 1);
    let (challenge, builder, _) = setup(vec![Requirement::no_violations()]);
    let kp = AgentKeyPair::generate();

    let result = builder.build_behavior(
        &challenge,
        &kp,
        &ledger,
        &counts,
        &BehaviorRequirement::NoViolations,
    );
    assert!(matches!(result, Err(ProofError::ViolationsPresent)));
}

#[test]
fn test_success_rate_proof() {
    let (ledger, counts) = history(95, 5);
    let requirement = BehaviorRequirement::SuccessRate { threshold: 90.0 };
    let (challenge, builder, verifier) = setup(vec![Requirement::success_rate(90.0)]);
    let kp = AgentKeyPair::generate();

    let proof = builder
        .build_behavior(&challenge, &kp, &ledger, &counts, &requirement)
        .expect("95 percent should clear a 90 percent bar");

    assert_eq!(proof.claimed_value, Some(95.0));
    assert_eq!(proof.interaction_count, Some(100));
    assert!(verifier.verify_behavior(&challenge, &proof, &requirement));
}

#[test]
fn test_success_rate_below_threshold_refused() {
    let (ledger, counts) = history(95, 5);
    let (challenge, builder, _) = setup(vec![Requirement::success_rate(99.0)]);
    let kp = AgentKeyPair::generate();

    let err = builder
        .build_behavior(
            &challenge,
            &kp,
            &ledger,
            &counts,
            &BehaviorRequirement::SuccessRate { threshold: 99.0 },
        )
        .expect_err("95 percent must not clear a 99 percent bar");

    // Only the public threshold appears in the error.
    let message = err.to_string();
    assert!(message.contains("99"));
    assert!(!message.contains("95"));
}

#[test]
fn test_policy_compliance_proof() {
    let (ledger, counts) = history(3, 0);
    let requirement = BehaviorRequirement::PolicyCompliance {
        policy_id: "gdpr-2024".into(),
    };
    let (challenge, builder, verifier) =
        setup(vec![Requirement::policy_compliance("gdpr-2024")]);
    let kp = AgentKeyPair::generate();

    let proof = builder
        .build_behavior(&challenge, &kp, &ledger, &counts, &requirement)
        .unwrap();
    assert!(verifier.verify_behavior(&challenge, &proof, &requirement));

    // The proof is bound to its policy ID.
    let other = BehaviorRequirement::PolicyCompliance {
        policy_id: "soc2-2025".into(),
    };
    assert!(!verifier.verify_behavior(&challenge, &proof, &other));
}

// =========================================================================
// Tamper rejection
// =========================================================================

#[test]
fn test_tampered_commitment_rejected() {
    let (challenge, builder, verifier) = setup(vec![Requirement::trust_level(0.5)]);
    let kp = AgentKeyPair::generate();

    let mut proof = builder
        .build_trust_level(&challenge, &kp, 0.75, 0.5)
        .unwrap();
    proof.commitment = flip_first_hex_char(&proof.commitment);

    assert!(!verifier.verify_trust_level(&challenge, &proof, 0.5));
}

#[test]
fn test_tampered_challenge_hash_rejected() {
    let (challenge, builder, verifier) = setup(vec![Requirement::trust_level(0.5)]);
    let kp = AgentKeyPair::generate();

    let mut proof = builder
        .build_trust_level(&challenge, &kp, 0.75, 0.5)
        .unwrap();
    proof.challenge = flip_first_hex_char(&proof.challenge);

    assert!(!verifier.verify_trust_level(&challenge, &proof, 0.5));
}

#[test]
fn test_proof_type_substitution_rejected() {
    let (challenge, builder, verifier) = setup(vec![Requirement::trust_level(0.5)]);
    let kp = AgentKeyPair::generate();

    let mut proof = builder
        .build_trust_level(&challenge, &kp, 0.75, 0.5)
        .unwrap();
    proof.proof_type = ProofType::Identity;

    // Neither the original requirement nor the claimed type accepts it.
    assert!(!verifier.verify_proof(&challenge, &challenge.requirements[0], &proof));
    assert!(!verifier.verify_identity(&challenge, &proof));
}

#[test]
fn test_malformed_response_rejected() {
    let (challenge, builder, verifier) = setup(vec![Requirement::trust_level(0.5)]);
    let kp = AgentKeyPair::generate();

    let mut proof = builder
        .build_trust_level(&challenge, &kp, 0.75, 0.5)
        .unwrap();
    proof.response = "0011".into();

    assert!(!verifier.verify_trust_level(&challenge, &proof, 0.5));
}

// =========================================================================
// Wire format
// =========================================================================

#[test]
fn test_proof_serialization_roundtrip() {
    let (challenge, builder, verifier) = setup(vec![Requirement::trust_level(0.5)]);
    let kp = AgentKeyPair::generate();

    let proof = builder
        .build_trust_level(&challenge, &kp, 0.75, 0.5)
        .unwrap();

    let json = serde_json::to_string(&proof).expect("serialize");
    // Unused optional fields stay off the wire.
    assert!(!json.contains("merkle_proof"));
    assert!(!json.contains("claimed_value"));

    let decoded: atp_proof::Proof = serde_json::from_str(&json).expect("deserialize");
    assert!(verifier.verify_trust_level(&challenge, &decoded, 0.5));
}

#[test]
fn test_challenge_serialization_roundtrip() {
    let (challenge, _, _) = setup(vec![
        Requirement::trust_level(0.5),
        Requirement::credential_with_fields("ServiceCertification", vec!["serviceLevel".into()]),
    ]);

    let json = serde_json::to_string(&challenge).expect("serialize");
    let decoded: Challenge = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(decoded.id, challenge.id);
    assert_eq!(decoded.nonce, challenge.nonce);
    assert_eq!(decoded.requirements, challenge.requirements);
    assert_eq!(decoded.proof_types, challenge.proof_types);
}
