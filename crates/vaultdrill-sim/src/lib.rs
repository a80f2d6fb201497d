//! VaultDrill Simulation Engine
//!
//! Drills a multisig setup against adverse events and reports whether the
//! quorum can still sign.
//!
//! # Pipeline
//!
//! - **resolver**: is this key usable under this scenario?
//! - **simulate**: one scenario, all keys, outcome and recovery path
//! - **combined**: several scenarios at once, merged before resolving
//! - **score**: share of a catalog the setup survives
//! - **recommend**: remediation advice for what it does not survive
//!
//! Everything here is pure and synchronous. Results are fresh snapshots and
//! identical inputs always produce identical results.
//!
//! # Example
//!
//! ```
//! use vaultdrill_core::{Key, MultisigSetup, Outcome, Scenario};
//! use vaultdrill_sim::simulate;
//!
//! let setup = MultisigSetup::new(
//!     "Smith Family",
//!     2,
//!     vec![
//!         Key::single("a", "Alice", "primary", "Home"),
//!         Key::single("b", "Bob", "spouse", "Home"),
//!         Key::single("c", "Charlie", "attorney", "Office"),
//!     ],
//! );
//! let fire = Scenario::new("fire", "House Fire").with_locations(["home"]);
//!
//! let result = simulate(&setup, &fire).unwrap();
//! assert_eq!(result.outcome, Outcome::Locked);
//! assert_eq!(result.available_keys, 1);
//! ```

pub mod catalog;
pub mod combined;
pub mod recommend;
pub mod report;
pub mod resolver;
pub mod score;
pub mod simulate;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-exports
pub use catalog::default_catalog;
pub use combined::{merge_scenarios, simulate_combined};
pub use report::{build_report, ResilienceReport};
pub use resolver::is_available;
pub use score::{score, ResilienceScore, ScoreBand};
pub use simulate::simulate;
