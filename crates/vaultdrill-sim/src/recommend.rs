//! Remediation advice for scenarios the quorum does not survive.

use vaultdrill_core::{Dimension, Disqualification, SimulationResult};

/// Fixed mitigation per disqualifying dimension
pub fn mitigation(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Compromised => {
            "Move funds to a new quorum that excludes the compromised keys"
        }
        Dimension::Role => "Add a redundant signer held by someone outside the affected role",
        Dimension::Location => "Add a redundant signer stored in a different location",
        Dimension::Index => "Add a redundant key so no single quorum position is critical",
        Dimension::Holder => "Spread keys across more independent holders",
        Dimension::Shard => "Increase shard threshold redundancy with additional share holders",
    }
}

/// Dimension that ruled out the most keys.
///
/// Ties go to the dimension the resolver checks first.
pub fn dominant_dimension(disqualified: &[Disqualification]) -> Option<Dimension> {
    let mut best: Option<(Dimension, usize)> = None;
    for dimension in Dimension::ALL {
        let count = disqualified
            .iter()
            .filter(|d| d.dimension == dimension)
            .count();
        if count > 0 && best.map_or(true, |(_, n)| count > n) {
            best = Some((dimension, count));
        }
    }
    best.map(|(dimension, _)| dimension)
}

/// Advice for a non-recoverable result, `None` when the quorum holds.
pub fn recommendation(result: &SimulationResult) -> Option<String> {
    if result.outcome.is_recoverable() {
        return None;
    }

    let advice = match dominant_dimension(&result.disqualified) {
        Some(dimension) => format!(
            "{}: {} of {} keys lost to {}, {} more needed to reach {} signatures",
            mitigation(dimension),
            result.lost_to(dimension),
            result.total_keys,
            dimension,
            result.shortfall(),
            result.threshold
        ),
        // Nothing was ruled out, the key list is simply too short.
        None => format!(
            "Add keys to the setup: {} listed but {} signatures required",
            result.total_keys, result.threshold
        ),
    };
    Some(advice)
}

/// Distinct advice across a batch of results, in first-seen order
pub fn collect(results: &[SimulationResult]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for advice in results.iter().filter_map(|r| r.recommendation.as_ref()) {
        if !out.contains(advice) {
            out.push(advice.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate::simulate;
    use crate::test_utils::{family_setup, house_fire};
    use vaultdrill_core::{MultisigSetup, Outcome, Scenario};

    fn dq(dimension: Dimension) -> Disqualification {
        Disqualification {
            key_id: "k".into(),
            holder: "h".into(),
            dimension,
        }
    }

    #[test]
    fn test_dominant_dimension_by_count() {
        let list = vec![
            dq(Dimension::Role),
            dq(Dimension::Location),
            dq(Dimension::Location),
        ];
        assert_eq!(dominant_dimension(&list), Some(Dimension::Location));
    }

    #[test]
    fn test_dominant_dimension_tie_prefers_resolver_order() {
        let list = vec![dq(Dimension::Holder), dq(Dimension::Compromised)];
        assert_eq!(dominant_dimension(&list), Some(Dimension::Compromised));
        assert_eq!(dominant_dimension(&[]), None);
    }

    #[test]
    fn test_location_advice() {
        let result = simulate(&family_setup(), &house_fire()).unwrap();
        let advice = result.recommendation.unwrap();
        assert!(advice.starts_with(mitigation(Dimension::Location)));
        assert!(advice.contains("2 of 3 keys lost to location"));
        assert!(advice.contains("1 more needed to reach 2 signatures"));
    }

    #[test]
    fn test_compromise_advice() {
        let theft = Scenario::new("theft", "Theft").with_compromised(["key-a", "key-b"]);
        let result = simulate(&family_setup(), &theft).unwrap();
        assert_eq!(result.outcome, Outcome::Locked);
        assert!(result
            .recommendation
            .unwrap()
            .starts_with(mitigation(Dimension::Compromised)));
    }

    #[test]
    fn test_short_key_list_advice() {
        let setup = MultisigSetup {
            name: "Unfilled".into(),
            threshold: 2,
            total_keys: 2,
            keys: family_setup().keys[..1].to_vec(),
        };
        let result = simulate(&setup, &Scenario::new("calm", "Calm")).unwrap();
        assert!(result.recommendation.unwrap().starts_with("Add keys"));
    }

    #[test]
    fn test_deterministic() {
        let a = simulate(&family_setup(), &house_fire()).unwrap();
        let b = simulate(&family_setup(), &house_fire()).unwrap();
        assert_eq!(recommendation(&a), recommendation(&b));
    }

    #[test]
    fn test_collect_dedupes() {
        let setup = family_setup();
        let fire = simulate(&setup, &house_fire()).unwrap();
        let calm = simulate(&setup, &Scenario::new("calm", "Calm")).unwrap();
        let advice = collect(&[fire.clone(), calm, fire]);
        assert_eq!(advice.len(), 1);
    }
}
