use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atp_core::Did;
use atp_crypto::PublicKey;

use crate::error::IdentityError;

/// W3C-shaped DID document describing an agent's verification keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    /// The DID this document describes.
    pub id: String,
    /// Public keys the subject can prove control of.
    pub verification_method: Vec<VerificationMethod>,
    /// Key ids usable for authentication.
    pub authentication: Vec<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// A single verification method (public key) entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// Key id, e.g. "did:atp:7Hj9#keys-1".
    pub id: String,
    #[serde(rename = "type")]
    pub method_type: String,
    /// DID controlling this key.
    pub controller: String,
    /// Base58-encoded Ed25519 public key.
    pub public_key_base58: String,
}

impl DidDocument {
    /// Build a document for a DID with a single Ed25519 authentication key.
    pub fn new(did: &Did, public_key: &PublicKey) -> Self {
        let now = Utc::now();
        let key_id = format!("{}#keys-1", did);
        Self {
            context: vec!["https://www.w3.org/ns/did/v1".into()],
            id: did.to_string(),
            verification_method: vec![VerificationMethod {
                id: key_id.clone(),
                method_type: "Ed25519VerificationKey2018".into(),
                controller: did.to_string(),
                public_key_base58: public_key.to_bs58(),
            }],
            authentication: vec![key_id],
            created: now,
            updated: now,
        }
    }

    /// The first authentication key as a decoded public key.
    pub fn authentication_key(&self) -> Result<PublicKey, IdentityError> {
        let method = self.verification_method.first().ok_or_else(|| {
            IdentityError::ValidationError("document has no verification method".into())
        })?;
        Ok(PublicKey::from_bs58(&method.public_key_base58)?)
    }

    /// Whether any verification method carries the given key.
    pub fn references_key(&self, public_key: &PublicKey) -> bool {
        let encoded = public_key.to_bs58();
        self.verification_method
            .iter()
            .any(|m| m.public_key_base58 == encoded)
    }
}
