use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Decentralized Identifier (DID) of an agent.
/// Format: `did:<method>:<identifier>`, e.g. `did:atp:7Hj9...`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Did(String);

impl Did {
    /// Create a DID from a full URI string, validating its shape.
    pub fn new(uri: impl Into<String>) -> Result<Self, CoreError> {
        let uri = uri.into();
        let parts: Vec<&str> = uri.splitn(3, ':').collect();
        if parts.len() != 3 || parts[0] != "did" {
            return Err(CoreError::InvalidDid(format!(
                "DID must have format 'did:<method>:<identifier>', got: {}",
                uri
            )));
        }
        if parts[1].is_empty()
            || !parts[1]
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(CoreError::InvalidDid(format!(
                "DID method must be lowercase alphanumeric, got: {}",
                uri
            )));
        }
        if parts[2].is_empty() {
            return Err(CoreError::InvalidDid(format!(
                "DID identifier must not be empty, got: {}",
                uri
            )));
        }
        Ok(Self(uri))
    }

    /// Create a DID from method and identifier components.
    pub fn from_parts(method: &str, identifier: &str) -> Self {
        Self(format!("did:{}:{}", method, identifier))
    }

    /// Get the full DID URI.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the method (e.g. "atp", "key").
    pub fn method(&self) -> Option<&str> {
        self.0.split(':').nth(1)
    }

    /// Extract the method-specific identifier.
    pub fn identifier(&self) -> Option<&str> {
        let parts: Vec<&str> = self.0.splitn(3, ':').collect();
        parts.get(2).copied()
    }

    /// The `did:<method>` prefix, e.g. "did:atp".
    pub fn method_prefix(&self) -> Option<String> {
        self.method().map(|m| format!("did:{}", m))
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The proof variants an agent can be challenged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofType {
    /// Prove trust score >= a threshold without revealing the score.
    TrustLevel,
    /// Prove control of a DID.
    Identity,
    /// Prove possession of a credential, optionally disclosing fields.
    Credential,
    /// Prove a property of the behavioral history.
    Behavior,
}

impl ProofType {
    /// Wire label for this proof type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TrustLevel => "trust_level",
            Self::Identity => "identity",
            Self::Credential => "credential",
            Self::Behavior => "behavior",
        }
    }
}

impl fmt::Display for ProofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a verifier demands of a prover, one variant per proof type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Requirement {
    /// Trust score must meet or exceed the minimum (0.0 to 1.0).
    TrustLevel { min_trust_level: f64 },
    /// Prover must demonstrate control of its DID.
    Identity,
    /// Prover must hold a credential of the given type and may be asked
    /// to disclose specific claim fields.
    Credential {
        credential_type: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        disclosed_fields: Vec<String>,
    },
    /// Prover must demonstrate a property of its interaction history.
    Behavior(BehaviorRequirement),
}

impl Requirement {
    /// Require a minimum trust score.
    pub fn trust_level(min_trust_level: f64) -> Self {
        Self::TrustLevel { min_trust_level }
    }

    /// Require proof of DID control.
    pub fn identity() -> Self {
        Self::Identity
    }

    /// Require a credential of the given type, nothing disclosed.
    pub fn credential(credential_type: impl Into<String>) -> Self {
        Self::Credential {
            credential_type: credential_type.into(),
            disclosed_fields: Vec::new(),
        }
    }

    /// Require a credential of the given type with selected fields disclosed.
    pub fn credential_with_fields(
        credential_type: impl Into<String>,
        disclosed_fields: Vec<String>,
    ) -> Self {
        Self::Credential {
            credential_type: credential_type.into(),
            disclosed_fields,
        }
    }

    /// Require an interaction history free of violations.
    pub fn no_violations() -> Self {
        Self::Behavior(BehaviorRequirement::NoViolations)
    }

    /// Require a success rate at or above the threshold (percentage).
    pub fn success_rate(threshold: f64) -> Self {
        Self::Behavior(BehaviorRequirement::SuccessRate { threshold })
    }

    /// Require compliance with the given policy.
    pub fn policy_compliance(policy_id: impl Into<String>) -> Self {
        Self::Behavior(BehaviorRequirement::PolicyCompliance {
            policy_id: policy_id.into(),
        })
    }

    /// The proof type that satisfies this requirement.
    pub fn proof_type(&self) -> ProofType {
        match self {
            Self::TrustLevel { .. } => ProofType::TrustLevel,
            Self::Identity => ProofType::Identity,
            Self::Credential { .. } => ProofType::Credential,
            Self::Behavior(_) => ProofType::Behavior,
        }
    }

    /// Check parameter ranges and required fields.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::TrustLevel { min_trust_level } => {
                if !(0.0..=1.0).contains(min_trust_level) {
                    return Err(CoreError::ValidationError(format!(
                        "min_trust_level must be between 0.0 and 1.0, got: {}",
                        min_trust_level
                    )));
                }
                Ok(())
            }
            Self::Identity => Ok(()),
            Self::Credential {
                credential_type,
                disclosed_fields,
            } => {
                if credential_type.is_empty() {
                    return Err(CoreError::ValidationError(
                        "credential_type must not be empty".into(),
                    ));
                }
                if disclosed_fields.iter().any(|f| f.is_empty()) {
                    return Err(CoreError::ValidationError(
                        "disclosed field names must not be empty".into(),
                    ));
                }
                Ok(())
            }
            Self::Behavior(req) => req.validate(),
        }
    }
}

/// The behavioral property a verifier demands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorRequirement {
    /// No recorded violations at all.
    NoViolations,
    /// Success rate at or above the threshold, as a percentage (0 to 100).
    SuccessRate { threshold: f64 },
    /// Compliance with a named policy.
    PolicyCompliance { policy_id: String },
}

impl BehaviorRequirement {
    /// Wire label for this behavior requirement kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoViolations => "no_violations",
            Self::SuccessRate { .. } => "success_rate",
            Self::PolicyCompliance { .. } => "policy_compliance",
        }
    }

    /// Check parameter ranges and required fields.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::NoViolations => Ok(()),
            Self::SuccessRate { threshold } => {
                if !(0.0..=100.0).contains(threshold) {
                    return Err(CoreError::ValidationError(format!(
                        "success rate threshold must be between 0 and 100, got: {}",
                        threshold
                    )));
                }
                Ok(())
            }
            Self::PolicyCompliance { policy_id } => {
                if policy_id.is_empty() {
                    return Err(CoreError::ValidationError(
                        "policy_id must not be empty".into(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// A public input bound into a proof's challenge hash.
/// Serializes as a bare JSON string or number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublicInput {
    /// Numeric input (thresholds, claimed values).
    Number(f64),
    /// Textual input (DID prefixes, credential types, disclosed values).
    Text(String),
}

impl PublicInput {
    /// Textual input.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Numeric input.
    pub fn number(value: f64) -> Self {
        Self::Number(value)
    }

    /// Canonical byte encoding used when hashing public inputs.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        match self {
            Self::Number(n) => n.to_le_bytes().to_vec(),
            Self::Text(s) => s.as_bytes().to_vec(),
        }
    }
}

impl fmt::Display for PublicInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}
