//! Resilience scoring across a scenario catalog.

use crate::simulate::simulate;
use serde::{Deserialize, Serialize};
use std::fmt;
use vaultdrill_core::{MultisigSetup, Scenario, SetupError, SimulationResult};

/// Share of catalog scenarios the setup survives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResilienceScore {
    /// 0..=100
    pub value: u8,
    pub recoverable_count: usize,
    pub total_scenarios: usize,
}

/// Qualitative bucket for a [`ResilienceScore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    NoData,
    Critical,
    AtRisk,
    Moderate,
    Strong,
    FullySecure,
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoreBand::NoData => "NO DATA",
            ScoreBand::Critical => "CRITICAL",
            ScoreBand::AtRisk => "AT RISK",
            ScoreBand::Moderate => "MODERATE",
            ScoreBand::Strong => "STRONG",
            ScoreBand::FullySecure => "SECURE",
        };
        f.write_str(s)
    }
}

impl ResilienceScore {
    /// Round-half-up percentage; zero scenarios scores 0.
    pub fn from_counts(recoverable_count: usize, total_scenarios: usize) -> Self {
        let value = if total_scenarios == 0 {
            0
        } else {
            let recoverable = recoverable_count.min(total_scenarios);
            ((200 * recoverable + total_scenarios) / (2 * total_scenarios)) as u8
        };
        Self {
            value,
            recoverable_count,
            total_scenarios,
        }
    }

    /// Score already computed simulation results
    pub fn from_results(results: &[SimulationResult]) -> Self {
        let recoverable = results
            .iter()
            .filter(|r| r.outcome.is_recoverable())
            .count();
        Self::from_counts(recoverable, results.len())
    }

    pub fn band(&self) -> ScoreBand {
        match self.value {
            _ if self.total_scenarios == 0 => ScoreBand::NoData,
            100 => ScoreBand::FullySecure,
            80..=99 => ScoreBand::Strong,
            60..=79 => ScoreBand::Moderate,
            40..=59 => ScoreBand::AtRisk,
            _ => ScoreBand::Critical,
        }
    }

    /// Every scenario recoverable
    pub fn is_fully_secure(&self) -> bool {
        self.total_scenarios > 0 && self.recoverable_count == self.total_scenarios
    }
}

impl fmt::Display for ResilienceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}% {} ({}/{} scenarios recoverable)",
            self.value,
            self.band(),
            self.recoverable_count,
            self.total_scenarios
        )
    }
}

/// Simulate each scenario on its own and score the share that stays recoverable.
pub fn score(setup: &MultisigSetup, scenarios: &[Scenario]) -> Result<ResilienceScore, SetupError> {
    // Checked up front so an empty catalog still rejects a broken setup.
    setup.validate()?;
    let results = scenarios
        .iter()
        .map(|s| simulate(setup, s))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ResilienceScore::from_results(&results))
}
