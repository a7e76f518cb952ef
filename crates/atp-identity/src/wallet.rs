use dashmap::DashMap;

use crate::credential::VerifiableCredential;
use crate::error::IdentityError;

/// Credential wallet for an agent. Stores and manages verifiable credentials.
pub struct CredentialWallet {
    /// DID of the wallet owner.
    owner_did: String,
    /// Credential ID → VerifiableCredential.
    credentials: DashMap<String, VerifiableCredential>,
}

impl CredentialWallet {
    /// Create a new credential wallet.
    pub fn new(owner_did: impl Into<String>) -> Self {
        Self {
            owner_did: owner_did.into(),
            credentials: DashMap::new(),
        }
    }

    /// Get the wallet owner's DID.
    pub fn owner_did(&self) -> &str {
        &self.owner_did
    }

    /// Store a credential in the wallet.
    pub fn store(&self, credential: VerifiableCredential) -> Result<(), IdentityError> {
        if credential.subject != self.owner_did {
            return Err(IdentityError::ValidationError(format!(
                "credential subject {} does not match wallet owner {}",
                credential.subject, self.owner_did
            )));
        }
        let id = credential.id.clone();
        self.credentials.insert(id.clone(), credential);
        tracing::debug!(credential_id = %id, "credential stored in wallet");
        Ok(())
    }

    /// Get a credential by ID.
    pub fn get(&self, id: &str) -> Option<VerifiableCredential> {
        self.credentials.get(id).map(|e| e.clone())
    }

    /// Credentials of the given type that are still valid (not expired).
    pub fn find_by_type(&self, credential_type: &str) -> Vec<VerifiableCredential> {
        self.credentials
            .iter()
            .filter(|e| e.has_type(credential_type) && !e.is_expired())
            .map(|e| e.value().clone())
            .collect()
    }

    /// List all credential IDs.
    pub fn list(&self) -> Vec<String> {
        self.credentials.iter().map(|e| e.key().clone()).collect()
    }

    /// Remove a credential from the wallet.
    pub fn remove(&self, id: &str) -> Option<VerifiableCredential> {
        self.credentials.remove(id).map(|(_, vc)| vc)
    }

    /// Number of credentials in the wallet.
    pub fn count(&self) -> usize {
        self.credentials.len()
    }

    /// Check if the wallet is empty.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}
