use serde::{Deserialize, Serialize};

use atp_crypto::{
    merkle_path, merkle_root, verify_merkle_path, BlindingFactor, CommitmentScheme, Digest,
    MerklePath,
};

use crate::error::IdentityError;

/// Per-claim commitments over a credential's claims.
///
/// Each claim is committed individually under a fresh blinding; a Merkle
/// root over the commitments (in sorted claim order) binds the whole set.
/// The holder can open chosen claims while the rest stay hidden.
pub struct ClaimCommitmentSet {
    claims: Vec<CommittedClaim>,
}

struct CommittedClaim {
    name: String,
    value: serde_json::Value,
    blinding: BlindingFactor,
    leaf: Digest,
}

/// A deliberately revealed claim: value, blinding, and inclusion path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenedClaim {
    pub name: String,
    pub value: serde_json::Value,
    /// Hex blinding factor, revealed only for disclosed claims.
    pub blinding: String,
    /// Inclusion path against the commitment-set root.
    pub path: MerklePath,
}

impl ClaimCommitmentSet {
    /// Commit to every field of a JSON object under fresh blindings.
    /// Claims are ordered by name, so the root is reproducible.
    pub fn commit_claims(
        scheme: &dyn CommitmentScheme,
        claims: &serde_json::Value,
    ) -> Result<Self, IdentityError> {
        let object = claims.as_object().ok_or_else(|| {
            IdentityError::ValidationError("claims must be a JSON object".into())
        })?;

        // serde_json object iteration is key-sorted, fixing the leaf order.
        let mut committed = Vec::with_capacity(object.len());
        for (name, value) in object {
            let blinding = scheme.random_blinding();
            let leaf = scheme.commit(&claim_bytes(name, value), &blinding).hash;
            committed.push(CommittedClaim {
                name: name.clone(),
                value: value.clone(),
                blinding,
                leaf,
            });
        }
        Ok(Self { claims: committed })
    }

    /// Merkle root over all claim commitments.
    pub fn root(&self) -> Digest {
        merkle_root(&self.leaves())
    }

    /// Open one claim for disclosure.
    pub fn open(&self, name: &str) -> Result<OpenedClaim, IdentityError> {
        let index = self
            .claims
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| IdentityError::ClaimNotFound(name.to_string()))?;
        let path = merkle_path(&self.leaves(), index)?;
        let claim = &self.claims[index];
        Ok(OpenedClaim {
            name: claim.name.clone(),
            value: claim.value.clone(),
            blinding: claim.blinding.to_hex(),
            path,
        })
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    fn leaves(&self) -> Vec<Digest> {
        self.claims.iter().map(|c| c.leaf).collect()
    }
}

/// Canonical leaf preimage for a claim: `name=<compact JSON value>`.
pub fn claim_bytes(name: &str, value: &serde_json::Value) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(name.as_bytes());
    bytes.push(b'=');
    bytes.extend_from_slice(value.to_string().as_bytes());
    bytes
}

/// Verifier-side check: the opened claim re-commits under its revealed
/// blinding and its path authenticates against the set root.
pub fn verify_opened_claim(
    scheme: &dyn CommitmentScheme,
    opened: &OpenedClaim,
    root: &Digest,
) -> bool {
    let blinding = match BlindingFactor::from_hex(&opened.blinding) {
        Ok(b) => b,
        Err(_) => return false,
    };
    let leaf = scheme
        .commit(&claim_bytes(&opened.name, &opened.value), &blinding)
        .hash;
    verify_merkle_path(&leaf, &opened.path, root)
}
