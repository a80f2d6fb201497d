//! The M-of-N custody configuration under test.

use crate::key::Key;
use crate::SetupError;
use serde::{Deserialize, Serialize};

/// A family's multisig quorum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigSetup {
    /// Family or owner display name
    pub name: String,
    /// Signatures required (M)
    pub threshold: usize,
    /// Keys in the quorum (N)
    pub total_keys: usize,
    /// Keys in quorum order; positions are what `Scenario::affected_indices` refers to
    #[serde(default)]
    pub keys: Vec<Key>,
}

impl MultisigSetup {
    /// Build a setup whose declared key count matches the key list
    pub fn new(name: impl Into<String>, threshold: usize, keys: Vec<Key>) -> Self {
        Self {
            name: name.into(),
            threshold,
            total_keys: keys.len(),
            keys,
        }
    }

    /// Check `1 <= M <= N`.
    ///
    /// A key list whose length differs from `total_keys` is a data-quality
    /// issue, not an error; see [`MultisigSetup::key_count_mismatch`].
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.threshold == 0 {
            return Err(SetupError::ThresholdZero);
        }
        if self.threshold > self.total_keys {
            return Err(SetupError::ThresholdExceedsKeys {
                threshold: self.threshold,
                total: self.total_keys,
            });
        }
        Ok(())
    }

    pub fn key_count_mismatch(&self) -> bool {
        self.keys.len() != self.total_keys
    }

    pub fn get(&self, id: &str) -> Option<&Key> {
        self.keys.iter().find(|k| k.id == id)
    }

    /// e.g. "2-of-3"
    pub fn quorum_label(&self) -> String {
        format!("{}-of-{}", self.threshold, self.total_keys)
    }
}
