use serde::{Deserialize, Serialize};

/// Protocol-level configuration shared by challenge issuance and
/// verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Challenge time-to-live in minutes when the caller does not pick one.
    pub default_challenge_ttl_minutes: i64,
    /// DID methods accepted in identity proofs.
    pub supported_did_methods: Vec<String>,
    /// Upper bound on requirements per challenge.
    pub max_requirements_per_challenge: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            default_challenge_ttl_minutes: 5,
            supported_did_methods: vec!["atp".into(), "key".into()],
            max_requirements_per_challenge: 16,
        }
    }
}

impl ProtocolConfig {
    /// Whether a DID method is accepted in identity proofs.
    pub fn supports_did_method(&self, method: &str) -> bool {
        self.supported_did_methods.iter().any(|m| m == method)
    }
}
