use atp_core::CoreError;
use atp_crypto::CryptoError;
use atp_identity::IdentityError;
use atp_ledger::LedgerError;

/// Proof engine errors.
///
/// Threshold failures name only the public threshold, never the prover's
/// actual score or rate.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("trust score below required threshold {threshold}")]
    ThresholdNotMet { threshold: f64 },

    #[error("interaction history contains violations")]
    ViolationsPresent,

    #[error("success rate below required threshold {threshold}")]
    RateBelowThreshold { threshold: f64 },

    #[error("challenge {0} has expired")]
    ChallengeExpired(String),

    #[error("challenge {0} already consumed")]
    ChallengeConsumed(String),

    #[error("unsupported proof type: {0}")]
    UnsupportedProofType(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),
}
