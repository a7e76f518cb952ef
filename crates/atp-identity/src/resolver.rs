use std::sync::Arc;

use async_trait::async_trait;

use crate::document::DidDocument;
use crate::error::IdentityError;
use crate::registry::DidRegistry;

/// Trait for resolving DIDs to their documents.
#[async_trait]
pub trait DidResolver: Send + Sync {
    /// Resolve a DID URI to its DID document.
    async fn resolve(&self, did: &str) -> Result<DidDocument, IdentityError>;
}

/// Resolves DIDs from a local in-memory registry.
pub struct RegistryResolver {
    registry: Arc<DidRegistry>,
}

impl RegistryResolver {
    pub fn new(registry: Arc<DidRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl DidResolver for RegistryResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, IdentityError> {
        self.registry
            .resolve_local(did)
            .ok_or_else(|| IdentityError::DidNotFound(did.to_string()))
    }
}
