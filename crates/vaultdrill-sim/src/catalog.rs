//! Built-in scenario catalog
//!
//! Generic adverse events that apply to any family setup. They match on
//! roles and location keywords only, since key ids and holder names are
//! specific to one family.

use vaultdrill_core::{Role, Scenario};

/// The default catalog, in display order
pub fn default_catalog() -> Vec<Scenario> {
    vec![
        Scenario::new("house-fire", "House Fire")
            .describe("The family home burns down with everything stored in it")
            .with_locations(["home", "house"]),
        Scenario::new("owner-death", "Death of Owner")
            .describe("The primary key owner dies unexpectedly")
            .with_roles([Role::Owner, Role::Primary]),
        Scenario::new("spouse-death", "Death of Spouse")
            .describe("The owner's spouse dies or is incapacitated")
            .with_roles([Role::Spouse]),
        Scenario::new("owner-and-spouse", "Common Accident")
            .describe("Owner and spouse are lost in the same accident")
            .with_roles([Role::Owner, Role::Primary, Role::Spouse]),
        Scenario::new("attorney-unreachable", "Attorney Unreachable")
            .describe("The family attorney retires, dies, or cannot be contacted")
            .with_roles([Role::Attorney]),
        Scenario::new("home-burglary", "Burglary")
            .describe("Hardware wallets and papers kept at home are stolen or smashed")
            .with_locations(["home", "house", "apartment", "garage"]),
        Scenario::new("divorce", "Divorce")
            .describe("A divorce removes the spouse's cooperation")
            .with_roles([Role::Spouse]),
        Scenario::new("custodian-failure", "Custodian Failure")
            .describe("A professional custodian goes bankrupt or freezes access")
            .with_roles([Role::Custodian]),
        Scenario::new("bank-closure", "Safe Deposit Box Inaccessible")
            .describe("The bank holding a safe deposit box closes or seals it")
            .with_locations(["bank", "safe deposit", "deposit box"]),
        Scenario::new("paper-backup-destroyed", "Paper Backup Destroyed")
            .describe("A drawer or filing cabinet holding paper backups is cleared out")
            .with_locations(["backup", "drawer", "filing cabinet", "notebook"]),
        Scenario::new("regional-disaster", "Regional Disaster")
            .describe("Flood or earthquake takes out everything stored locally")
            .with_locations(["home", "house", "office", "local"]),
        Scenario::new("extended-travel", "Extended Travel")
            .describe("Owner and spouse are abroad for months; keys reachable with delay")
            .with_roles([Role::Owner, Role::Primary, Role::Spouse])
            .partial(),
    ]
}

/// Look up a scenario by id
pub fn find<'a>(catalog: &'a [Scenario], id: &str) -> Option<&'a Scenario> {
    catalog.iter().find(|s| s.id == id)
}
