use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use atp_crypto::{digest_to_hex, hash, merkle_path, merkle_root, Digest, MerklePath};

use crate::error::LedgerError;
use crate::interaction::InteractionOutcome;

/// One ledger entry: a salted commitment to an interaction.
/// The preimage (outcome and salt) is never stored or revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorCommitment {
    /// Caller-supplied interaction identifier.
    pub interaction_id: String,
    /// 64-character hex commitment over (id, outcome, timestamp, salt).
    pub commitment: String,
    /// Time the interaction was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Append-only ledger of interaction commitments.
///
/// Appends take `&mut self`: each agent is the single writer of its own
/// ledger. Entries are never mutated or removed.
#[derive(Debug, Clone, Default)]
pub struct BehaviorLedger {
    entries: Vec<BehaviorCommitment>,
    leaves: Vec<Digest>,
}

impl BehaviorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an interaction: commit to (id, outcome, timestamp, fresh
    /// 256-bit salt) and append. Returns the stored entry.
    pub fn add_commitment(
        &mut self,
        interaction_id: &str,
        outcome: InteractionOutcome,
    ) -> BehaviorCommitment {
        let timestamp = Utc::now();
        let mut salt = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut salt);

        let mut input = Vec::new();
        input.extend_from_slice(interaction_id.as_bytes());
        input.extend_from_slice(outcome.as_str().as_bytes());
        input.extend_from_slice(timestamp.to_rfc3339().as_bytes());
        input.extend_from_slice(&salt);
        let leaf = hash(&input);

        let entry = BehaviorCommitment {
            interaction_id: interaction_id.to_string(),
            commitment: digest_to_hex(&leaf),
            timestamp,
        };
        self.leaves.push(leaf);
        self.entries.push(entry.clone());
        debug!(
            interaction_id = %entry.interaction_id,
            size = self.entries.len(),
            "appended interaction commitment"
        );
        entry
    }

    /// Merkle root over all entry commitments. Zero digest when empty.
    pub fn root(&self) -> Digest {
        merkle_root(&self.leaves)
    }

    /// Root as a 64-character hex string.
    pub fn root_hex(&self) -> String {
        digest_to_hex(&self.root())
    }

    /// Entries recorded between `start` and `end`, inclusive on both ends.
    pub fn commitments_in_range(
        &self,
        start: &DateTime<Utc>,
        end: &DateTime<Utc>,
    ) -> Vec<BehaviorCommitment> {
        self.entries
            .iter()
            .filter(|e| e.timestamp >= *start && e.timestamp <= *end)
            .cloned()
            .collect()
    }

    /// Inclusion proof for the entry at `index`.
    pub fn merkle_proof(&self, index: usize) -> Result<MerklePath, LedgerError> {
        if index >= self.entries.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                size: self.entries.len(),
            });
        }
        Ok(merkle_path(&self.leaves, index)?)
    }

    /// All entries in append order.
    pub fn entries(&self) -> &[BehaviorCommitment] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
