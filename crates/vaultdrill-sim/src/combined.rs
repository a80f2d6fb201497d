//! Simultaneous scenarios.
//!
//! The scenarios are merged into one effect set before any key is
//! resolved. Every predicate is "some entry of the list matches", so the
//! union of lists is exactly the OR of the individual scenarios. Resolving
//! against the merged set matters for sharded keys: two scenarios that each
//! take out one share are harmless alone and fatal together.

use crate::simulate::evaluate;
use vaultdrill_core::{MultisigSetup, Scenario, ScenarioRef, SetupError, SimulationResult};

fn union_into<T: PartialEq + Clone>(acc: &mut Option<Vec<T>>, more: &Option<Vec<T>>) {
    let Some(more) = more else {
        return;
    };
    let acc = acc.get_or_insert_with(Vec::new);
    for item in more {
        if !acc.contains(item) {
            acc.push(item.clone());
        }
    }
}

/// Union of all matching fields and compromised ids, in first-seen order.
///
/// The merged scenario is partial only when every input is.
pub fn merge_scenarios(scenarios: &[Scenario]) -> Scenario {
    let mut merged = Scenario::new(
        scenarios
            .iter()
            .map(|s| s.id.as_str())
            .collect::<Vec<_>>()
            .join("+"),
        ScenarioRef::combined(scenarios).label(),
    );
    let mut holders = None;

    for s in scenarios {
        union_into(&mut merged.affected_roles, &s.affected_roles);
        union_into(&mut merged.affected_locations, &s.affected_locations);
        union_into(&mut merged.affected_indices, &s.affected_indices);
        union_into(&mut merged.compromised_keys, &s.compromised_keys);
        union_into(&mut holders, &Some(s.unavailable_holders.clone()));
    }

    merged.unavailable_holders = holders.unwrap_or_default();
    merged.partial = !scenarios.is_empty() && scenarios.iter().all(|s| s.partial);
    merged
}

/// Apply all `scenarios` at once.
///
/// An empty list yields the baseline with nothing affected.
pub fn simulate_combined(
    setup: &MultisigSetup,
    scenarios: &[Scenario],
) -> Result<SimulationResult, SetupError> {
    setup.validate()?;
    let merged = merge_scenarios(scenarios);
    Ok(evaluate(
        setup,
        &merged,
        ScenarioRef::combined(scenarios),
        merged.partial,
    ))
}
