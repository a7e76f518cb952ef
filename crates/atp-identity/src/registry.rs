use dashmap::DashMap;
use tracing::debug;

use atp_core::Did;
use atp_crypto::PublicKey;

use crate::document::DidDocument;
use crate::error::IdentityError;

/// In-memory DID registry. All resolution stays inside the process.
#[derive(Debug, Default)]
pub struct DidRegistry {
    documents: DashMap<String, DidDocument>,
}

impl DidRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a DID from a public key (identifier = base58 of the key),
    /// build its document, and register both.
    pub fn register_key(
        &self,
        method: &str,
        public_key: &PublicKey,
    ) -> Result<(Did, DidDocument), IdentityError> {
        let did = Did::new(format!("did:{}:{}", method, public_key.to_bs58()))?;
        let document = DidDocument::new(&did, public_key);
        self.documents.insert(did.to_string(), document.clone());
        debug!(did = %did, "registered DID document");
        Ok((did, document))
    }

    /// Register an externally built document.
    pub fn register_document(&self, document: DidDocument) -> Result<(), IdentityError> {
        Did::new(document.id.clone())?;
        debug!(did = %document.id, "registered DID document");
        self.documents.insert(document.id.clone(), document);
        Ok(())
    }

    /// Look up a document by DID URI.
    pub fn resolve_local(&self, did: &str) -> Option<DidDocument> {
        self.documents.get(did).map(|e| e.clone())
    }

    pub fn contains(&self, did: &str) -> bool {
        self.documents.contains_key(did)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
