//! ATP Session — per-agent orchestration of the authentication protocol.
//!
//! An [`AuthenticationSession`] wraps one [`Agent`] and drives both roles
//! of the protocol: as a verifier it issues challenges and checks the
//! responses, as a prover it answers challenges from its own state.
//! [`AuthenticationSession::mutual_authenticate`] runs both directions
//! against a peer concurrently.

pub mod agent;
pub mod error;
pub mod session;

pub use agent::Agent;
pub use error::SessionError;
pub use session::{
    AuthResponse, AuthenticationResult, AuthenticationSession, MutualAuthOutcome, ProofCheck,
};
