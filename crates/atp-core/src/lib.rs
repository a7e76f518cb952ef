//! ATP Core — Fundamental types, requirements, errors, and configuration
//! for the Agent Trust Protocol.

pub mod config;
pub mod error;
pub mod types;

pub use config::ProtocolConfig;
pub use error::CoreError;
pub use types::{BehaviorRequirement, Did, ProofType, PublicInput, Requirement};
