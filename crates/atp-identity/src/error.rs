use atp_core::CoreError;
use atp_crypto::CryptoError;

/// Identity layer errors.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("DID not found: {0}")]
    DidNotFound(String),

    #[error("claim not found: {0}")]
    ClaimNotFound(String),

    #[error("credential not found: {0}")]
    CredentialNotFound(String),

    #[error("credential verification failed: {0}")]
    CredentialVerification(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
