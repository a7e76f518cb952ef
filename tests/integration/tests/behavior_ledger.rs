//! Integration test: behavioral ledger and commitment primitives.
//!
//! Exercises atp-ledger against atp-crypto directly (commitments, Merkle
//! roots, inclusion proofs) and through atp-proof for ledger-backed
//! behavior proofs.

use std::sync::Arc;

use atp_core::{BehaviorRequirement, Did, ProtocolConfig, Requirement};
use atp_crypto::{
    digest_from_hex, verify_merkle_path, AgentKeyPair, Blake3CommitmentScheme, CommitmentScheme,
};
use atp_ledger::{BehaviorLedger, InteractionCounts, InteractionOutcome, LedgerError};
use atp_proof::{ChallengeManager, ProofBuilder, ProofVerifier};

fn scheme() -> Blake3CommitmentScheme {
    Blake3CommitmentScheme::new()
}

fn ledger_of(successes: usize, violations: usize) -> (BehaviorLedger, InteractionCounts) {
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

// =========================================================================
// Commitments and nonces
// =========================================================================

#[test]
fn test_commitment_is_deterministic_under_same_blinding() {
    let scheme = scheme();
    let blinding = scheme.random_blinding();

    let a = scheme.commit(b"trust-score", &blinding);
    let b = scheme.commit(b"trust-score", &blinding);
    assert_eq!(a, b);
    assert_eq!(a.to_hex().len(), 64);
}

#[test]
fn test_commitment_changes_with_blinding() {
    let scheme = scheme();
    let a = scheme.commit(b"trust-score", &scheme.random_blinding());
    let b = scheme.commit(b"trust-score", &scheme.random_blinding());
    assert_ne!(a, b);
}

#[test]
fn test_commitment_opening() {
    let scheme = scheme();
    let blinding = scheme.random_blinding();
    let commitment = scheme.commit(b"value", &blinding);

    assert!(commitment.verify_opening(&scheme, b"value", &blinding));
    assert!(!commitment.verify_opening(&scheme, b"other", &blinding));
    assert!(!commitment.verify_opening(&scheme, b"value", &scheme.random_blinding()));
}

#[test]
fn test_nonce_is_fresh_64_hex() {
    let scheme = scheme();
    let a = scheme.nonce();
    let b = scheme.nonce();

    assert_ne!(a, b);
    assert_eq!(a.len(), 64);
    assert_eq!(hex::decode(&a).expect("nonce should be hex").len(), 32);
}

// =========================================================================
// Ledger roots and inclusion proofs
// =========================================================================

#[test]
fn test_root_is_stable_until_append() {
    let (mut ledger, _) = ledger_of(8, 0);

    let before = ledger.root();
    assert_eq!(ledger.root(), before);

    ledger.add_commitment("ok-8", InteractionOutcome::Success);
    assert_ne!(ledger.root(), before);
}

#[test]
fn test_entry_inclusion_proof() {
    let (ledger, _) = ledger_of(8, 0);

    let path = ledger.merkle_proof(3).expect("index 3 of 8 exists");
    assert_eq!(path.len(), 3);

    let leaf = digest_from_hex(&ledger.entries()[3].commitment).unwrap();
    assert!(verify_merkle_path(&leaf, &path, &ledger.root()));

    // A path proves exactly one leaf.
    let other = digest_from_hex(&ledger.entries()[4].commitment).unwrap();
    assert!(!verify_merkle_path(&other, &path, &ledger.root()));
}

#[test]
fn test_inclusion_proof_out_of_range() {
    let (ledger, _) = ledger_of(8, 0);

    let result = ledger.merkle_proof(8);
    assert!(matches!(
        result,
        Err(LedgerError::IndexOutOfRange { index: 8, size: 8 })
    ));
}

#[test]
fn test_entries_commit_not_reveal() {
    let (ledger, _) = ledger_of(1, 1);

    // Stored entries carry opaque commitments, never the outcome.
    for entry in ledger.entries() {
        assert_eq!(entry.commitment.len(), 64);
        assert!(digest_from_hex(&entry.commitment).is_ok());
    }
    let json = serde_json::to_string(ledger.entries()).unwrap();
    assert!(!json.contains("violation"));
    assert!(!json.contains("success"));
}

#[test]
fn test_range_query_by_timestamp() {
    let start = chrono::Utc::now();
    let (ledger, _) = ledger_of(2, 0);
    let end = chrono::Utc::now();

    assert_eq!(ledger.commitments_in_range(&start, &end).len(), 2);

    let later = end + chrono::Duration::hours(1);
    let much_later = end + chrono::Duration::hours(2);
    assert!(ledger.commitments_in_range(&later, &much_later).is_empty());
}

// =========================================================================
// Counters
// =========================================================================

#[test]
fn test_counts_compute_success_rate() {
    let (_, counts) = ledger_of(95, 5);
    assert_eq!(counts.total(), 100);
    assert_eq!(counts.success_rate_percent(), Some(95.0));

    let empty = InteractionCounts::new();
    assert_eq!(empty.success_rate_percent(), None);
}

// =========================================================================
// Ledger-backed behavior proofs
// =========================================================================

fn proof_context() -> (ProofBuilder, ProofVerifier, atp_proof::Challenge) {
    let scheme: Arc<dyn CommitmentScheme> = Arc::new(Blake3CommitmentScheme::new());
    let manager = ChallengeManager::new(scheme.clone(), ProtocolConfig::default());
    let challenge = manager
        .create_challenge(
            &Did::from_parts("atp", "verifier"),
            &Did::from_parts("atp", "prover"),
            vec![Requirement::success_rate(70.0)],
        )
        .unwrap();
    (
        ProofBuilder::new(scheme.clone()),
        ProofVerifier::new(scheme, ProtocolConfig::default()),
        challenge,
    )
}

#[test]
fn test_ledger_backed_success_rate_proof() {
    let (ledger, counts) = ledger_of(3, 1);
    let (builder, verifier, challenge) = proof_context();
    let requirement = BehaviorRequirement::SuccessRate { threshold: 70.0 };

    let proof = builder
        .build_behavior(
            &challenge,
            &AgentKeyPair::generate(),
            &ledger,
            &counts,
            &requirement,
        )
        .expect("75 percent should clear a 70 percent bar");

    assert_eq!(proof.claimed_value, Some(75.0));
    assert_eq!(proof.interaction_count, Some(4));
    assert!(verifier.verify_behavior(&challenge, &proof, &requirement));
}

#[test]
fn test_violation_blocks_clean_record_proof() {
    let (ledger, counts) = ledger_of(3, 1);
    let (builder, _, challenge) = proof_context();

    let err = builder
        .build_behavior(
            &challenge,
            &AgentKeyPair::generate(),
            &ledger,
            &counts,
            &BehaviorRequirement::NoViolations,
        )
        .expect_err("a violation must block the proof");

    // The refusal does not disclose how many violations there are.
    assert_eq!(err.to_string(), "interaction history contains violations");
}
