//! Adverse event definitions.
//!
//! A scenario knocks keys out along any of five dimensions. All fields are
//! optional; a scenario with nothing populated is a valid no-op.

use crate::key::Role;
use serde::{Deserialize, Serialize};

/// One named adverse event from a scenario catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,

    /// Keys whose holder has one of these roles are unavailable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_roles: Option<Vec<Role>>,

    /// Case-insensitive substrings matched against a key's location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_locations: Option<Vec<String>>,

    /// Positions in the setup's key list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_indices: Option<Vec<usize>>,

    /// Holder names made unavailable (older catalogs only use this)
    #[serde(default)]
    pub unavailable_holders: Vec<String>,

    /// Key ids that must not be trusted at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compromised_keys: Option<Vec<String>>,

    /// Temporary or partial condition: a shortfall is `degraded`, not `locked`
    #[serde(default)]
    pub partial: bool,
}

impl Scenario {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_roles<R: Into<Role>>(mut self, roles: impl IntoIterator<Item = R>) -> Self {
        self.affected_roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_locations<S: Into<String>>(mut self, locations: impl IntoIterator<Item = S>) -> Self {
        self.affected_locations = Some(locations.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.affected_indices = Some(indices.into_iter().collect());
        self
    }

    pub fn with_holders<S: Into<String>>(mut self, holders: impl IntoIterator<Item = S>) -> Self {
        self.unavailable_holders = holders.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_compromised<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.compromised_keys = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Mark as a partial/temporary condition
    pub fn partial(mut self) -> Self {
        self.partial = true;
        self
    }

    /// True when no matching field is populated
    pub fn is_noop(&self) -> bool {
        fn empty<T>(v: &Option<Vec<T>>) -> bool {
            v.as_ref().map_or(true, Vec::is_empty)
        }
        empty(&self.affected_roles)
            && empty(&self.affected_locations)
            && empty(&self.affected_indices)
            && empty(&self.compromised_keys)
            && self.unavailable_holders.is_empty()
    }
}

/// What a [`crate::SimulationResult`] was computed against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScenarioRef {
    Single {
        id: String,
        name: String,
    },
    /// Several scenarios applied at once
    Combined {
        ids: Vec<String>,
        names: Vec<String>,
        count: usize,
    },
}

impl ScenarioRef {
    pub fn single(scenario: &Scenario) -> Self {
        ScenarioRef::Single {
            id: scenario.id.clone(),
            name: scenario.name.clone(),
        }
    }

    pub fn combined(scenarios: &[Scenario]) -> Self {
        ScenarioRef::Combined {
            ids: scenarios.iter().map(|s| s.id.clone()).collect(),
            names: scenarios.iter().map(|s| s.name.clone()).collect(),
            count: scenarios.len(),
        }
    }

    /// Display name; combined runs join their parts with " + "
    pub fn label(&self) -> String {
        match self {
            ScenarioRef::Single { name, .. } => name.clone(),
            ScenarioRef::Combined { names, .. } if names.is_empty() => "Baseline".to_string(),
            ScenarioRef::Combined { names, .. } => names.join(" + "),
        }
    }

    /// Number of scenarios that contributed
    pub fn scenario_count(&self) -> usize {
        match self {
            ScenarioRef::Single { .. } => 1,
            ScenarioRef::Combined { count, .. } => *count,
        }
    }
}
