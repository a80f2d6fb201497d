//! VaultDrill Core
//!
//! Shared types for describing a multisig custody setup and the adverse
//! events it is drilled against.
//!
//! # Model
//!
//! - **Key**: one signing key, held by a named person in a role, stored on
//!   some medium at some location. A key may itself be *sharded* into
//!   k-of-m shares spread across several holders.
//! - **MultisigSetup**: an M-of-N quorum over an ordered list of keys.
//! - **Scenario**: a named adverse event that knocks keys out by role,
//!   location, position, holder name, or explicit compromise.
//! - **SimulationResult**: the snapshot produced by running a setup through
//!   one scenario (or several at once).

pub mod key;
pub mod result;
pub mod scenario;
pub mod setup;

pub use key::{Key, KeyKind, Role, ShardConfig, StorageType};
pub use result::{Dimension, Disqualification, Outcome, SimulationResult};
pub use scenario::{Scenario, ScenarioRef};
pub use setup::MultisigSetup;

use thiserror::Error;

/// A setup whose quorum cannot be evaluated meaningfully.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("Invalid threshold: a quorum needs at least 1 key")]
    ThresholdZero,

    #[error("Invalid threshold: {threshold} of {total} keys")]
    ThresholdExceedsKeys { threshold: usize, total: usize },
}

/// Lint failures for a sharded key's k-of-m configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShardError {
    #[error("Invalid shard threshold: need at least 1 share")]
    ThresholdZero,

    #[error("Shard threshold {threshold} exceeds share count {total}")]
    ThresholdExceedsShares { threshold: u8, total: u8 },

    #[error("Shard declares {declared} shares but lists {listed} holders")]
    HolderCountMismatch { declared: u8, listed: usize },
}
