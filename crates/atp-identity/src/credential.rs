use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atp_crypto::{sign, verify, AgentKeyPair, PublicKey, Signature};

use crate::error::IdentityError;

/// A W3C-inspired Verifiable Credential held by an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiableCredential {
    /// Unique credential identifier.
    pub id: String,
    /// Type(s) of the credential, "VerifiableCredential" first
    /// (e.g. ["VerifiableCredential", "ServiceCertification"]).
    pub credential_type: Vec<String>,
    /// DID of the issuer.
    pub issuer: String,
    /// DID of the subject.
    pub subject: String,
    /// When the credential was issued.
    pub issuance_date: DateTime<Utc>,
    /// Optional expiration date.
    pub expiration_date: Option<DateTime<Utc>>,
    /// Credential claims as a JSON object.
    pub claims: serde_json::Value,
    /// Detached issuer signature over the canonical payload.
    pub proof: Option<CredentialProof>,
}

/// Proof attached to a verifiable credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialProof {
    /// Proof type.
    pub proof_type: String,
    /// When the proof was created.
    pub created: DateTime<Utc>,
    /// Verification method id (e.g. "did:atp:abc#keys-1").
    pub verification_method: String,
    /// The signature value (hex-encoded).
    pub signature_hex: String,
}

impl VerifiableCredential {
    /// Create a new unsigned credential.
    pub fn new(
        issuer: String,
        subject: String,
        credential_type: Vec<String>,
        claims: serde_json::Value,
    ) -> Self {
        let mut types = vec!["VerifiableCredential".to_string()];
        for t in credential_type {
            if t != "VerifiableCredential" {
                types.push(t);
            }
        }

        Self {
            id: format!("urn:uuid:{}", Uuid::now_v7()),
            credential_type: types,
            issuer,
            subject,
            issuance_date: Utc::now(),
            expiration_date: None,
            claims,
            proof: None,
        }
    }

    /// Set the expiration date.
    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration_date = Some(expiration);
        self
    }

    /// Canonical signing payload: deterministic JSON without the proof.
    pub fn signing_payload(&self) -> Vec<u8> {
        let canonical = serde_json::json!({
            "id": self.id,
            "type": self.credential_type,
            "issuer": self.issuer,
            "subject": self.subject,
            "issuanceDate": self.issuance_date.to_rfc3339(),
            "expirationDate": self.expiration_date.map(|d| d.to_rfc3339()),
            "claims": self.claims,
        });
        serde_json::to_vec(&canonical).unwrap_or_default()
    }

    /// Issue (sign) this credential with the issuer's keypair.
    pub fn issue(mut self, keypair: &AgentKeyPair) -> Result<Self, IdentityError> {
        let payload = self.signing_payload();
        let sig = sign(&payload, keypair);

        self.proof = Some(CredentialProof {
            proof_type: "Ed25519Signature2020".to_string(),
            created: Utc::now(),
            verification_method: format!("{}#keys-1", self.issuer),
            signature_hex: sig.to_hex(),
        });

        Ok(self)
    }

    /// Verify the issuer signature against the given public key.
    /// Also rejects expired credentials.
    pub fn verify_signature(&self, public_key: &PublicKey) -> Result<(), IdentityError> {
        let proof = self.proof.as_ref().ok_or_else(|| {
            IdentityError::CredentialVerification("no proof attached".to_string())
        })?;

        if self.is_expired() {
            return Err(IdentityError::CredentialVerification(
                "credential has expired".to_string(),
            ));
        }

        let signature = Signature::from_hex(&proof.signature_hex).map_err(|e| {
            IdentityError::CredentialVerification(format!("invalid signature: {}", e))
        })?;

        verify(&self.signing_payload(), &signature, public_key).map_err(|_| {
            IdentityError::CredentialVerification("signature verification failed".to_string())
        })
    }

    /// The specific type, skipping the "VerifiableCredential" marker.
    pub fn primary_type(&self) -> Option<&str> {
        self.credential_type
            .iter()
            .map(|s| s.as_str())
            .find(|t| *t != "VerifiableCredential")
    }

    /// Whether the credential carries the given type.
    pub fn has_type(&self, credential_type: &str) -> bool {
        self.credential_type.iter().any(|t| t == credential_type)
    }

    /// Look up a claim value by field name.
    pub fn claim(&self, name: &str) -> Option<&serde_json::Value> {
        self.claims.get(name)
    }

    /// Check if the credential has been signed.
    pub fn is_signed(&self) -> bool {
        self.proof.is_some()
    }

    /// Check if the credential has expired.
    pub fn is_expired(&self) -> bool {
        self.expiration_date
            .map(|exp| Utc::now() > exp)
            .unwrap_or(false)
    }
}
