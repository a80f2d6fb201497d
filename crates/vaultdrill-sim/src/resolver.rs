//! Key availability resolution
//!
//! Decides whether one key survives one scenario.
//!
//! # Order
//!
//! 1. Compromise: the key id is in `compromised_keys`. Always wins.
//! 2. Role, location, index, holder name: an ordered list of
//!    [`Predicate`]s, OR-reduced. The first match names the [`Dimension`].
//!
//! A sharded key skips step 2 for itself. Each share holder is instead
//! looked up by name among the setup's single keys and run through the same
//! predicates; a holder with no single key of their own falls back to the
//! `unavailable_holders` list. Compromise of a holder's own key does not
//! touch their share. The key survives when at least `k` shares do.

use vaultdrill_core::{Dimension, Key, Scenario, ShardConfig};

/// One disqualification rule
pub struct Predicate {
    pub dimension: Dimension,
    test: fn(&Key, Option<usize>, &Scenario) -> bool,
}

impl Predicate {
    pub fn matches(&self, key: &Key, index: Option<usize>, scenario: &Scenario) -> bool {
        (self.test)(key, index, scenario)
    }
}

/// Structural predicates, in evaluation order
pub const PREDICATES: [Predicate; 4] = [
    Predicate {
        dimension: Dimension::Role,
        test: role_affected,
    },
    Predicate {
        dimension: Dimension::Location,
        test: location_affected,
    },
    Predicate {
        dimension: Dimension::Index,
        test: index_affected,
    },
    Predicate {
        dimension: Dimension::Holder,
        test: holder_listed,
    },
];

fn role_affected(key: &Key, _index: Option<usize>, scenario: &Scenario) -> bool {
    scenario
        .affected_roles
        .as_ref()
        .is_some_and(|roles| roles.contains(&key.role))
}

// Blank entries are ignored: "" is a substring of every location.
fn location_affected(key: &Key, _index: Option<usize>, scenario: &Scenario) -> bool {
    let Some(locations) = scenario.affected_locations.as_ref() else {
        return false;
    };
    let location = key.location.to_lowercase();
    locations
        .iter()
        .map(|l| l.trim().to_lowercase())
        .any(|l| !l.is_empty() && location.contains(&l))
}

fn index_affected(_key: &Key, index: Option<usize>, scenario: &Scenario) -> bool {
    match (index, scenario.affected_indices.as_ref()) {
        (Some(i), Some(indices)) => indices.contains(&i),
        _ => false,
    }
}

fn holder_listed(key: &Key, _index: Option<usize>, scenario: &Scenario) -> bool {
    scenario.unavailable_holders.iter().any(|h| h == &key.holder)
}

fn is_compromised(key: &Key, scenario: &Scenario) -> bool {
    scenario
        .compromised_keys
        .as_ref()
        .is_some_and(|ids| ids.contains(&key.id))
}

/// First structural predicate matching `key`, ignoring shards
fn structural_match(key: &Key, index: Option<usize>, scenario: &Scenario) -> Option<Dimension> {
    PREDICATES
        .iter()
        .find(|p| p.matches(key, index, scenario))
        .map(|p| p.dimension)
}

// Only single keys stand in for a share holder. A sharded key's display
// holder says nothing about the person holding one of its shares.
fn share_holder_unavailable(name: &str, scenario: &Scenario, all_keys: &[Key]) -> bool {
    let own_key = all_keys
        .iter()
        .enumerate()
        .find(|(_, k)| !k.is_sharded() && k.holder == name);
    match own_key {
        Some((i, key)) => structural_match(key, Some(i), scenario).is_some(),
        None => scenario.unavailable_holders.iter().any(|h| h == name),
    }
}

/// Number of shares whose holder is still reachable
pub fn surviving_shares(shard: &ShardConfig, scenario: &Scenario, all_keys: &[Key]) -> usize {
    shard
        .holders
        .iter()
        .filter(|h| !share_holder_unavailable(h, scenario, all_keys))
        .count()
}

/// A shard with no holders or a zero threshold never reconstructs.
fn shard_available(shard: &ShardConfig, scenario: &Scenario, all_keys: &[Key]) -> bool {
    if shard.holders.is_empty() || shard.threshold == 0 {
        return false;
    }
    surviving_shares(shard, scenario, all_keys) >= shard.threshold as usize
}

/// Resolve the key at `index` of `all_keys`.
///
/// Returns the dimension that disqualified it, or `None` if it is usable.
pub fn check_at(
    key: &Key,
    index: Option<usize>,
    scenario: &Scenario,
    all_keys: &[Key],
) -> Option<Dimension> {
    let verdict = if is_compromised(key, scenario) {
        Some(Dimension::Compromised)
    } else if let Some(shard) = key.shard() {
        (!shard_available(shard, scenario, all_keys)).then_some(Dimension::Shard)
    } else {
        structural_match(key, index, scenario)
    };

    if let Some(dimension) = verdict {
        log::debug!(
            "[{}] key {} ({}) unavailable: {}",
            scenario.id,
            key.id,
            key.holder,
            dimension
        );
    }
    verdict
}

/// Resolve `key` against `scenario`, locating it in `all_keys` for
/// index matching and shard cross-references.
pub fn check(key: &Key, scenario: &Scenario, all_keys: &[Key]) -> Option<Dimension> {
    let index = all_keys
        .iter()
        .position(|k| std::ptr::eq(k, key))
        .or_else(|| all_keys.iter().position(|k| k.id == key.id));
    check_at(key, index, scenario, all_keys)
}

/// Can `key` be used to sign under `scenario`?
pub fn is_available(key: &Key, scenario: &Scenario, all_keys: &[Key]) -> bool {
    check(key, scenario, all_keys).is_none()
}
