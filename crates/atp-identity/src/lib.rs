//! ATP Identity — DID documents, local registry resolution, verifiable
//! credentials, and selective disclosure of credential claims.

pub mod credential;
pub mod disclosure;
pub mod document;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod wallet;

pub use credential::{CredentialProof, VerifiableCredential};
pub use disclosure::{claim_bytes, verify_opened_claim, ClaimCommitmentSet, OpenedClaim};
pub use document::{DidDocument, VerificationMethod};
pub use error::IdentityError;
pub use registry::DidRegistry;
pub use resolver::{DidResolver, RegistryResolver};
pub use wallet::CredentialWallet;
