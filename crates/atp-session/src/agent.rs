use atp_core::{CoreError, Did};
use atp_crypto::{AgentKeyPair, PublicKey};
use atp_ledger::{BehaviorLedger, InteractionCounts, InteractionOutcome};

/// Local state an agent brings to authentication: its DID, signing key,
/// trust score, and interaction history. Nothing here is shared or
/// process-global; each agent owns its own state.
pub struct Agent {
    did: Did,
    keypair: AgentKeyPair,
    trust_score: f64,
    ledger: BehaviorLedger,
    counts: InteractionCounts,
}

impl Agent {
    /// Create an agent with a fresh keypair; the DID identifier is the
    /// base58 encoding of the public key.
    pub fn generate(method: &str) -> Result<Self, CoreError> {
        let keypair = AgentKeyPair::generate();
        let did = Did::new(format!(
            "did:{}:{}",
            method,
            keypair.public_key().to_bs58()
        ))?;
        Ok(Self::new(did, keypair))
    }

    /// Create an agent from an existing DID and keypair. The trust score
    /// starts at zero until set explicitly.
    pub fn new(did: Did, keypair: AgentKeyPair) -> Self {
        Self {
            did,
            keypair,
            trust_score: 0.0,
            ledger: BehaviorLedger::new(),
            counts: InteractionCounts::new(),
        }
    }

    /// Set the trust score, clamped to [0.0, 1.0].
    pub fn with_trust_score(mut self, score: f64) -> Self {
        self.trust_score = score.clamp(0.0, 1.0);
        self
    }

    /// Record a completed interaction in both the commitment ledger and
    /// the outcome counters.
    pub fn record_interaction(&mut self, interaction_id: &str, outcome: InteractionOutcome) {
        self.ledger.add_commitment(interaction_id, outcome);
        self.counts.record(outcome);
    }

    pub fn did(&self) -> &Did {
        &self.did
    }

    pub fn keypair(&self) -> &AgentKeyPair {
        &self.keypair
    }

    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    pub fn trust_score(&self) -> f64 {
        self.trust_score
    }

    pub fn ledger(&self) -> &BehaviorLedger {
        &self.ledger
    }

    pub fn counts(&self) -> &InteractionCounts {
        &self.counts
    }
}
