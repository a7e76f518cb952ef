use atp_crypto::CryptoError;

/// Behavior ledger errors.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("merkle proof index {index} out of range for ledger of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
