//! Shared fixtures for vaultdrill-sim tests.

use vaultdrill_core::{Key, MultisigSetup, Scenario, ShardConfig, StorageType};

/// Alice (primary, Home), Bob (spouse, Home), Charlie (attorney, Office).
pub fn family_keys() -> Vec<Key> {
    vec![
        Key::single("key-a", "Alice", "primary", "Home")
            .with_storage(StorageType::HardwareWallet),
        Key::single("key-b", "Bob", "spouse", "Home").with_storage(StorageType::HardwareWallet),
        Key::single("key-c", "Charlie", "attorney", "Office").with_storage(StorageType::Paper),
    ]
}

/// [`family_keys`] plus a 2-of-3 sharded key split between Bob, Carol and Dave.
///
/// Carol and Dave hold no key of their own.
pub fn sharded_family_keys() -> Vec<Key> {
    let mut keys = family_keys();
    keys.push(Key::sharded(
        "key-s",
        "Estate",
        "protector",
        "Distributed",
        ShardConfig::two_of_three(["Bob", "Carol", "Dave"]),
    ));
    keys
}

/// 2-of-3 over [`family_keys`]
pub fn family_setup() -> MultisigSetup {
    MultisigSetup::new("Smith Family", 2, family_keys())
}

pub fn house_fire() -> Scenario {
    Scenario::new("house-fire", "House Fire").with_locations(["Home"])
}

pub fn attorney_unreachable() -> Scenario {
    Scenario::new("attorney-unreachable", "Attorney Unreachable").with_roles(["attorney"])
}
