//! Single-scenario simulation.

use crate::recommend;
use crate::resolver;
use vaultdrill_core::{
    Disqualification, Key, MultisigSetup, Outcome, Scenario, ScenarioRef, SetupError,
    SimulationResult,
};

/// Run every key of `setup` through `scenario`.
///
/// Fails only when the setup's threshold is unusable.
pub fn simulate(setup: &MultisigSetup, scenario: &Scenario) -> Result<SimulationResult, SetupError> {
    setup.validate()?;
    Ok(evaluate(
        setup,
        scenario,
        ScenarioRef::single(scenario),
        scenario.partial,
    ))
}

/// Classify an availability count.
///
/// `degraded` needs an explicitly partial scenario and at least one key left.
pub fn classify(available: usize, threshold: usize, partial: bool) -> Outcome {
    if available >= threshold {
        Outcome::Recoverable
    } else if partial && available >= 1 {
        Outcome::Degraded
    } else {
        Outcome::Locked
    }
}

/// Resolve `effects` against an already validated setup.
pub(crate) fn evaluate(
    setup: &MultisigSetup,
    effects: &Scenario,
    reference: ScenarioRef,
    partial: bool,
) -> SimulationResult {
    if setup.key_count_mismatch() {
        log::warn!(
            "Setup '{}' declares {} keys but lists {}",
            setup.name,
            setup.total_keys,
            setup.keys.len()
        );
    }

    let mut available: Vec<&Key> = Vec::with_capacity(setup.keys.len());
    let mut disqualified = Vec::new();

    for (i, key) in setup.keys.iter().enumerate() {
        match resolver::check_at(key, Some(i), effects, &setup.keys) {
            None => available.push(key),
            Some(dimension) => disqualified.push(Disqualification {
                key_id: key.id.clone(),
                holder: key.holder.clone(),
                dimension,
            }),
        }
    }

    let outcome = classify(available.len(), setup.threshold, partial);

    // First `threshold` usable keys in setup order.
    let recovery_path = outcome.is_recoverable().then(|| {
        available
            .iter()
            .take(setup.threshold)
            .map(|k| k.holder.clone())
            .collect::<Vec<_>>()
    });

    let mut result = SimulationResult {
        scenario: reference,
        outcome,
        available_keys: available.len(),
        total_keys: setup.keys.len(),
        threshold: setup.threshold,
        recovery_path,
        disqualified,
        recommendation: None,
    };
    result.recommendation = recommend::recommendation(&result);
    result
}
