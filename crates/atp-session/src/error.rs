use thiserror::Error;

use atp_identity::IdentityError;
use atp_proof::ProofError;

/// Errors raised while orchestrating an authentication session.
///
/// A response that fails verification is not an error; it comes back as
/// a result with `verified = false`. Errors cover malformed input and
/// failures to construct a response.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("proof error: {0}")]
    Proof(#[from] ProofError),

    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),
}
