//! Simulation output.

use crate::scenario::ScenarioRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Can the quorum still sign?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Enough keys remain to meet the threshold
    Recoverable,
    /// Short of the threshold, but only for a partial/temporary condition
    Degraded,
    /// Short of the threshold
    Locked,
}

impl Outcome {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Outcome::Recoverable)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Recoverable => "RECOVERABLE",
            Outcome::Degraded => "DEGRADED",
            Outcome::Locked => "LOCKED",
        };
        f.write_str(s)
    }
}

/// Why a key was ruled out. Declaration order is resolver order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Key id listed as compromised
    Compromised,
    /// Holder's role affected
    Role,
    /// Location matched
    Location,
    /// Position in the key list affected
    Index,
    /// Holder listed by name
    Holder,
    /// Too few shares of a sharded key survived
    Shard,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Compromised,
        Dimension::Role,
        Dimension::Location,
        Dimension::Index,
        Dimension::Holder,
        Dimension::Shard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Compromised => "compromise",
            Dimension::Role => "role",
            Dimension::Location => "location",
            Dimension::Index => "key position",
            Dimension::Holder => "holder",
            Dimension::Shard => "shard shortfall",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key ruled out by a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disqualification {
    pub key_id: String,
    pub holder: String,
    pub dimension: Dimension,
}

/// Snapshot of one setup run through one scenario (or one combined run)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub scenario: ScenarioRef,
    pub outcome: Outcome,
    pub available_keys: usize,
    /// Keys actually listed in the setup
    pub total_keys: usize,
    pub threshold: usize,
    /// Holders whose keys would sign, in setup order
    pub recovery_path: Option<Vec<String>>,
    /// Unavailable keys, in setup order
    #[serde(default)]
    pub disqualified: Vec<Disqualification>,
    pub recommendation: Option<String>,
}

impl SimulationResult {
    /// Signatures missing to reach the threshold
    pub fn shortfall(&self) -> usize {
        self.threshold.saturating_sub(self.available_keys)
    }

    /// Number of keys ruled out along `dimension`
    pub fn lost_to(&self, dimension: Dimension) -> usize {
        self.disqualified
            .iter()
            .filter(|d| d.dimension == dimension)
            .count()
    }
}
