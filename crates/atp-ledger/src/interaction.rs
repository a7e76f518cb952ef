use std::fmt;

/// Outcome of a single interaction. Only the agent itself sees outcomes;
/// the ledger stores salted commitments, never the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    Success,
    Violation,
}

impl InteractionOutcome {
    /// Label hashed into the interaction commitment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Violation => "violation",
        }
    }
}

impl fmt::Display for InteractionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Running tallies an agent keeps alongside its ledger. These stay private
/// to the agent; proofs expose at most a claimed rate and a total count.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionCounts {
    pub success_count: u64,
    pub violation_count: u64,
}

impl InteractionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally one outcome.
    pub fn record(&mut self, outcome: InteractionOutcome) {
        match outcome {
            InteractionOutcome::Success => self.success_count += 1,
            InteractionOutcome::Violation => self.violation_count += 1,
        }
    }

    /// Total recorded interactions.
    pub fn total(&self) -> u64 {
        self.success_count + self.violation_count
    }

    /// Success rate as a percentage, or `None` with no interactions.
    pub fn success_rate_percent(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(self.success_count as f64 / total as f64 * 100.0)
    }
}
