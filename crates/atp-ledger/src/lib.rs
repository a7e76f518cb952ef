//! ATP Ledger — append-only behavioral history stored as salted
//! commitments, with a Merkle root and per-entry inclusion proofs.

pub mod error;
pub mod interaction;
pub mod ledger;

pub use error::LedgerError;
pub use interaction::{InteractionCounts, InteractionOutcome};
pub use ledger::{BehaviorCommitment, BehaviorLedger};
