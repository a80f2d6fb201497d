//! Signing keys and the people, places and media that hold them.

use crate::ShardError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Functional role of a key holder within the family custody plan.
///
/// Parsed case-insensitively; anything outside the known set is kept
/// verbatim (lowercased) as [`Role::Other`] so catalogs can introduce new
/// roles without a code change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Owner,
    Signer,
    Protector,
    Attorney,
    Custodian,
    Spouse,
    Child,
    Primary,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Owner => "owner",
            Role::Signer => "signer",
            Role::Protector => "protector",
            Role::Attorney => "attorney",
            Role::Custodian => "custodian",
            Role::Spouse => "spouse",
            Role::Child => "child",
            Role::Primary => "primary",
            Role::Other(s) => s,
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "owner" => Role::Owner,
            "signer" => Role::Signer,
            "protector" => Role::Protector,
            "attorney" => Role::Attorney,
            "custodian" => Role::Custodian,
            "spouse" => Role::Spouse,
            "child" => Role::Child,
            "primary" => Role::Primary,
            _ => Role::Other(lower),
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::from(s.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Medium the key material lives on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageType {
    HardwareWallet,
    Paper,
    #[default]
    Other,
}

/// k-of-m share layout of a sharded key.
///
/// Each listed holder is assumed to carry exactly one share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardConfig {
    /// Shares needed to reconstruct the key (k)
    pub threshold: u8,
    /// Shares issued (m)
    pub total: u8,
    /// Names of the people holding a share
    #[serde(default)]
    pub holders: Vec<String>,
}

impl ShardConfig {
    pub fn new(threshold: u8, holders: Vec<String>) -> Self {
        let total = u8::try_from(holders.len()).unwrap_or(u8::MAX);
        Self {
            threshold,
            total,
            holders,
        }
    }

    /// Common 2-of-3 layout
    pub fn two_of_three(holders: [&str; 3]) -> Self {
        Self::new(2, holders.iter().map(|h| h.to_string()).collect())
    }

    /// Lint the configuration.
    ///
    /// Simulation never calls this: a broken shard is simply unavailable.
    pub fn validate(&self) -> Result<(), ShardError> {
        if self.threshold == 0 {
            return Err(ShardError::ThresholdZero);
        }
        if self.threshold > self.total {
            return Err(ShardError::ThresholdExceedsShares {
                threshold: self.threshold,
                total: self.total,
            });
        }
        if self.holders.len() != self.total as usize {
            return Err(ShardError::HolderCountMismatch {
                declared: self.total,
                listed: self.holders.len(),
            });
        }
        Ok(())
    }
}

/// Whether a key is held whole or split into shares
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    #[default]
    Single,
    Sharded(ShardConfig),
}

/// One signing key in a multisig quorum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    /// Stable identifier, referenced by `Scenario::compromised_keys`
    pub id: String,
    /// Display name of the person holding the key
    pub holder: String,
    pub role: Role,
    #[serde(default)]
    pub storage: StorageType,
    /// Free-text physical location ("Home safe", "Law office downtown")
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub kind: KeyKind,
}

impl Key {
    /// A key held whole by one person
    pub fn single(
        id: impl Into<String>,
        holder: impl Into<String>,
        role: impl Into<Role>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            holder: holder.into(),
            role: role.into(),
            storage: StorageType::default(),
            location: location.into(),
            kind: KeyKind::Single,
        }
    }

    /// A key reconstructed from shares
    pub fn sharded(
        id: impl Into<String>,
        holder: impl Into<String>,
        role: impl Into<Role>,
        location: impl Into<String>,
        shard: ShardConfig,
    ) -> Self {
        Self {
            kind: KeyKind::Sharded(shard),
            ..Self::single(id, holder, role, location)
        }
    }

    pub fn with_storage(mut self, storage: StorageType) -> Self {
        self.storage = storage;
        self
    }

    pub fn shard(&self) -> Option<&ShardConfig> {
        match &self.kind {
            KeyKind::Single => None,
            KeyKind::Sharded(shard) => Some(shard),
        }
    }

    pub fn is_sharded(&self) -> bool {
        self.shard().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from("Attorney"), Role::Attorney);
        assert_eq!(Role::from(" spouse "), Role::Spouse);
        assert_eq!(Role::from("Executor"), Role::Other("executor".into()));
        assert_eq!(Role::Other("executor".into()).to_string(), "executor");
    }

    #[test]
    fn test_role_serde_as_string() {
        let json = serde_json::to_string(&Role::Custodian).unwrap();
        assert_eq!(json, "\"custodian\"");
        let role: Role = serde_json::from_str("\"Trustee\"").unwrap();
        assert_eq!(role, Role::Other("trustee".into()));
    }

    #[test]
    fn test_shard_validation() {
        assert!(ShardConfig::two_of_three(["A", "B", "C"]).validate().is_ok());

        let zero = ShardConfig::new(0, vec!["A".into()]);
        assert_eq!(zero.validate(), Err(ShardError::ThresholdZero));

        let over = ShardConfig::new(3, vec!["A".into(), "B".into()]);
        assert_eq!(
            over.validate(),
            Err(ShardError::ThresholdExceedsShares {
                threshold: 3,
                total: 2
            })
        );

        let mismatch = ShardConfig {
            threshold: 2,
            total: 3,
            holders: vec!["A".into(), "B".into()],
        };
        assert!(matches!(
            mismatch.validate(),
            Err(ShardError::HolderCountMismatch { .. })
        ));
    }

    #[test]
    fn test_key_constructors() {
        let key = Key::single("k1", "Alice", "primary", "Home").with_storage(StorageType::Paper);
        assert_eq!(key.role, Role::Primary);
        assert_eq!(key.storage, StorageType::Paper);
        assert!(!key.is_sharded());

        let sharded = Key::sharded(
            "k2",
            "Family",
            "protector",
            "Distributed",
            ShardConfig::two_of_three(["Bob", "Carol", "Dave"]),
        );
        assert_eq!(sharded.shard().map(|s| s.threshold), Some(2));
    }

    #[test]
    fn test_key_toml_defaults() {
        let toml_str = r#"
id = "k1"
holder = "Alice"
role = "owner"
"#;
        let key: Key = toml::from_str(toml_str).unwrap();
        assert_eq!(key.kind, KeyKind::Single);
        assert_eq!(key.storage, StorageType::Other);
        assert!(key.location.is_empty());
    }

    #[test]
    fn test_sharded_key_toml() {
        let toml_str = r#"
id = "k3"
holder = "Estate"
role = "protector"
storage = "paper"
location = "Distributed"

[kind.sharded]
threshold = 2
total = 3
holders = ["Bob", "Carol", "Dave"]
"#;
        let key: Key = toml::from_str(toml_str).unwrap();
        assert_eq!(key.storage, StorageType::Paper);
        let shard = key.shard().unwrap();
        assert_eq!(shard.holders.len(), 3);
        assert!(shard.validate().is_ok());
    }
}
