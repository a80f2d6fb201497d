//! Batch resilience report for one setup.

use crate::catalog;
use crate::combined::simulate_combined;
use crate::recommend;
use crate::score::ResilienceScore;
use crate::simulate::simulate;
use serde::{Deserialize, Serialize};
use std::fmt;
use vaultdrill_core::{MultisigSetup, Scenario, SetupError, SimulationResult};

/// Everything the presentation layer needs for one setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResilienceReport {
    pub setup_name: String,
    pub threshold: usize,
    pub total_keys: usize,
    /// One per catalog scenario, in catalog order
    pub results: Vec<SimulationResult>,
    /// One per requested combination
    pub combined: Vec<SimulationResult>,
    /// Computed from `results` only
    pub score: ResilienceScore,
    /// Distinct advice from every non-recoverable result
    pub recommendations: Vec<String>,
    /// Combinations with no known scenario id, not simulated
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_combinations: Vec<Vec<String>>,
}

/// Simulate each scenario, then each combination of scenario ids.
///
/// Ids in `combinations` that are not in `scenarios` are dropped. A
/// combination with none left is reported in `skipped_combinations`.
pub fn build_report(
    setup: &MultisigSetup,
    scenarios: &[Scenario],
    combinations: &[Vec<String>],
) -> Result<ResilienceReport, SetupError> {
    setup.validate()?;

    let results = scenarios
        .iter()
        .map(|s| simulate(setup, s))
        .collect::<Result<Vec<_>, _>>()?;

    let mut combined = Vec::with_capacity(combinations.len());
    let mut skipped_combinations = Vec::new();
    for ids in combinations {
        let mut selected = Vec::with_capacity(ids.len());
        for id in ids {
            match catalog::find(scenarios, id) {
                Some(s) => selected.push(s.clone()),
                None => log::warn!("Combination references unknown scenario '{}'", id),
            }
        }
        if selected.is_empty() {
            log::warn!("Skipping combination [{}]: no known scenarios", ids.join(", "));
            skipped_combinations.push(ids.clone());
            continue;
        }
        combined.push(simulate_combined(setup, &selected)?);
    }

    let score = ResilienceScore::from_results(&results);
    let mut recommendations = recommend::collect(&results);
    for advice in recommend::collect(&combined) {
        if !recommendations.contains(&advice) {
            recommendations.push(advice);
        }
    }

    Ok(ResilienceReport {
        setup_name: setup.name.clone(),
        threshold: setup.threshold,
        total_keys: setup.total_keys,
        results,
        combined,
        score,
        recommendations,
        skipped_combinations,
    })
}

fn write_row(f: &mut fmt::Formatter<'_>, r: &SimulationResult) -> fmt::Result {
    let path = r
        .recovery_path
        .as_ref()
        .map(|p| p.join(", "))
        .unwrap_or_else(|| "-".to_string());
    writeln!(
        f,
        "  {:<40} {:<12} {}/{}  {}",
        r.scenario.label(),
        r.outcome.to_string(),
        r.available_keys,
        r.total_keys,
        path
    )
}

impl fmt::Display for ResilienceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({}-of-{})",
            self.setup_name, self.threshold, self.total_keys
        )?;
        writeln!(f, "Resilience: {}", self.score)?;
        writeln!(f)?;
        writeln!(f, "Scenarios:")?;
        for r in &self.results {
            write_row(f, r)?;
        }
        if !self.combined.is_empty() || !self.skipped_combinations.is_empty() {
            writeln!(f)?;
            writeln!(f, "Combined:")?;
            for r in &self.combined {
                write_row(f, r)?;
            }
        }
        for ids in &self.skipped_combinations {
            writeln!(f, "  (skipped: no known scenario in [{}])", ids.join(", "))?;
        }
        if !self.recommendations.is_empty() {
            writeln!(f)?;
            writeln!(f, "Recommendations:")?;
            for advice in &self.recommendations {
                writeln!(f, "  - {}", advice)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{attorney_unreachable, family_setup, house_fire};
    use vaultdrill_core::Outcome;

    fn combo(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_report_contents() {
        let setup = family_setup();
        let scenarios = vec![house_fire(), attorney_unreachable()];
        let report = build_report(
            &setup,
            &scenarios,
            &[combo(&["house-fire", "attorney-unreachable"])],
        )
        .unwrap();

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.score.value, 50);
        assert_eq!(report.combined.len(), 1);
        assert_eq!(report.combined[0].outcome, Outcome::Locked);
        assert_eq!(report.combined[0].available_keys, 0);
        assert!(!report.recommendations.is_empty());
    }

    #[test]
    fn test_unknown_combination_ids_skipped() {
        let setup = family_setup();
        let scenarios = vec![house_fire()];
        let report = build_report(&setup, &scenarios, &[combo(&["house-fire", "meteor"])]).unwrap();
        assert_eq!(report.combined[0].scenario.scenario_count(), 1);
        assert_eq!(report.combined[0].available_keys, 1);
    }

    #[test]
    fn test_combination_without_known_ids_is_skipped() {
        let setup = family_setup();
        let combos = [combo(&["meteor", "alien-invasion"]), combo(&[])];
        let report = build_report(&setup, &[house_fire()], &combos).unwrap();

        assert!(report.combined.is_empty());
        assert_eq!(report.skipped_combinations, combos.to_vec());
        assert!(report.to_string().contains("skipped: no known scenario in [meteor, alien-invasion]"));
    }

    #[test]
    fn test_display() {
        let setup = family_setup();
        let report = build_report(&setup, &[house_fire(), attorney_unreachable()], &[]).unwrap();
        let text = report.to_string();
        assert!(text.starts_with("Smith Family (2-of-3)"));
        assert!(text.contains("50% AT RISK"));
        assert!(text.contains("LOCKED"));
        assert!(text.contains("Alice, Bob"));
        assert!(!text.contains("Combined:"));
    }

    #[test]
    fn test_json_is_stable() {
        let setup = family_setup();
        let scenarios = vec![house_fire(), attorney_unreachable()];
        let a = serde_json::to_string(&build_report(&setup, &scenarios, &[]).unwrap()).unwrap();
        let b = serde_json::to_string(&build_report(&setup, &scenarios, &[]).unwrap()).unwrap();
        assert_eq!(a, b);

        let parsed: ResilienceReport = serde_json::from_str(&a).unwrap();
        assert_eq!(parsed.score.value, 50);
    }
}
