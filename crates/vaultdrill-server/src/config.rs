//! Server configuration, parsed from TOML file + environment variable overrides.
//!
//! Priority: environment variables > config file > defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use vaultdrill_core::{MultisigSetup, Scenario};
use vaultdrill_sim::default_catalog;

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// General server settings
    #[serde(default)]
    pub server: ServerSection,

    /// Custody setup to drill
    pub setup: MultisigSetup,

    /// Scenarios to drill it against
    #[serde(default)]
    pub catalog: CatalogSection,
}

/// General server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    /// Data directory (last score state)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Re-assessment interval in seconds (default: 24 hours)
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Report format
    #[serde(default)]
    pub output: OutputFormat,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            check_interval_secs: default_check_interval(),
            log_level: default_log_level(),
            output: OutputFormat::default(),
        }
    }
}

/// How reports are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Scenario catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSection {
    /// Start from the built-in catalog
    #[serde(default = "default_include_defaults")]
    pub include_defaults: bool,

    /// Extra scenarios; an id matching a built-in one replaces it
    #[serde(default)]
    pub scenarios: Vec<Scenario>,

    /// Groups of scenario ids to apply simultaneously
    #[serde(default)]
    pub combinations: Vec<Vec<String>>,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            include_defaults: default_include_defaults(),
            scenarios: Vec::new(),
            combinations: Vec::new(),
        }
    }
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_data_dir() -> PathBuf {
    PathBuf::from("/data")
}

fn default_check_interval() -> u64 {
    86400 // 24 hours
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_include_defaults() -> bool {
    true
}

// ============================================================================
// Loading & environment override
// ============================================================================

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: ServerConfig =
            toml::from_str(&contents).with_context(|| "Failed to parse TOML config")?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `VAULTDRILL_DATA_DIR`
    /// - `VAULTDRILL_CHECK_INTERVAL`
    /// - `VAULTDRILL_LOG_LEVEL`
    /// - `VAULTDRILL_OUTPUT`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("VAULTDRILL_DATA_DIR") {
            self.server.data_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("VAULTDRILL_CHECK_INTERVAL") {
            if let Ok(secs) = v.parse::<u64>() {
                self.server.check_interval_secs = secs;
            }
        }
        if let Ok(v) = std::env::var("VAULTDRILL_LOG_LEVEL") {
            self.server.log_level = v;
        }
        if let Ok(v) = std::env::var("VAULTDRILL_OUTPUT") {
            match v.to_lowercase().as_str() {
                "json" => self.server.output = OutputFormat::Json,
                "text" => self.server.output = OutputFormat::Text,
                _ => {}
            }
        }
    }

    /// The catalog to drill: built-ins (unless disabled) overlaid with extras.
    pub fn scenarios(&self) -> Vec<Scenario> {
        let mut scenarios: Vec<Scenario> = if self.catalog.include_defaults {
            default_catalog()
                .into_iter()
                .filter(|d| !self.catalog.scenarios.iter().any(|s| s.id == d.id))
                .collect()
        } else {
            Vec::new()
        };
        scenarios.extend(self.catalog.scenarios.iter().cloned());
        scenarios
    }

    /// Validate that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        self.setup
            .validate()
            .with_context(|| format!("setup '{}' is invalid", self.setup.name))?;

        // Check interval must be at least 60 seconds
        anyhow::ensure!(
            self.server.check_interval_secs >= 60,
            "server.check_interval_secs must be >= 60"
        );

        let mut seen = HashSet::new();
        for s in &self.catalog.scenarios {
            anyhow::ensure!(!s.id.is_empty(), "catalog.scenarios: id must not be empty");
            anyhow::ensure!(
                seen.insert(s.id.as_str()),
                "catalog.scenarios: duplicate id '{}'",
                s.id
            );
        }

        let scenarios = self.scenarios();
        for combo in &self.catalog.combinations {
            anyhow::ensure!(
                !combo.is_empty(),
                "catalog.combinations: combination must not be empty"
            );
            for id in combo {
                anyhow::ensure!(
                    scenarios.iter().any(|s| &s.id == id),
                    "catalog.combinations: unknown scenario '{}'",
                    id
                );
            }
        }

        Ok(())
    }

    /// Data-quality warnings that do not block a run
    pub fn lint(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.setup.key_count_mismatch() {
            warnings.push(format!(
                "setup declares {} keys but lists {}",
                self.setup.total_keys,
                self.setup.keys.len()
            ));
        }
        for key in &self.setup.keys {
            if let Some(shard) = key.shard() {
                if let Err(e) = shard.validate() {
                    warnings.push(format!("key '{}': {}", key.id, e));
                }
            }
        }
        warnings
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn minimal_toml() -> &'static str {
        r#"
[setup]
name = "Smith Family"
threshold = 2
total_keys = 3

[[setup.keys]]
id = "a"
holder = "Alice"
role = "primary"
location = "Home"

[[setup.keys]]
id = "b"
holder = "Bob"
role = "spouse"
location = "Home"

[[setup.keys]]
id = "c"
holder = "Charlie"
role = "attorney"
location = "Office"
"#
    }

    fn full_toml() -> &'static str {
        r#"
[server]
data_dir = "/custom/data"
check_interval_secs = 3600
log_level = "debug"
output = "json"

[setup]
name = "Estate"
threshold = 2
total_keys = 3

[[setup.keys]]
id = "k1"
holder = "Owner"
role = "owner"
storage = "hardware-wallet"
location = "Home safe"

[[setup.keys]]
id = "k2"
holder = "Lawyer"
role = "attorney"
storage = "paper"
location = "Law office"

[[setup.keys]]
id = "k3"
holder = "Kids"
role = "child"
location = "Distributed"

[setup.keys.kind.sharded]
threshold = 2
total = 3
holders = ["Ann", "Ben", "Cat"]

[catalog]
include_defaults = false
combinations = [["flood", "leak"]]

[[catalog.scenarios]]
id = "flood"
name = "Flood"
affected_locations = ["home"]

[[catalog.scenarios]]
id = "leak"
name = "Seed leak"
compromised_keys = ["k2"]
partial = false
"#
    }

    fn load(toml: &str) -> ServerConfig {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", toml).unwrap();
        ServerConfig::from_file(file.path()).unwrap()
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = load(minimal_toml());
        assert_eq!(config.setup.threshold, 2);
        assert_eq!(config.setup.keys.len(), 3);
        assert_eq!(config.server.check_interval_secs, 86400); // default
        assert_eq!(config.server.output, OutputFormat::Text); // default
        assert!(config.catalog.include_defaults);
        assert_eq!(config.scenarios().len(), default_catalog().len());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = load(full_toml());

        assert_eq!(config.server.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.server.check_interval_secs, 3600);
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.server.output, OutputFormat::Json);

        assert!(config.setup.keys[2].is_sharded());
        let scenarios = config.scenarios();
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[1].compromised_keys, Some(vec!["k2".to_string()]));
        assert_eq!(config.catalog.combinations, vec![vec!["flood", "leak"]]);
        assert!(config.validate().is_ok());
        assert!(config.lint().is_empty());
    }

    #[test]
    fn test_extra_scenario_replaces_builtin() {
        let toml = format!(
            "{}\n[[catalog.scenarios]]\nid = \"house-fire\"\nname = \"Kitchen Fire\"\naffected_locations = [\"kitchen\"]\n",
            minimal_toml()
        );
        let config = load(&toml);
        let scenarios = config.scenarios();
        assert_eq!(scenarios.len(), default_catalog().len());
        let fire: Vec<_> = scenarios.iter().filter(|s| s.id == "house-fire").collect();
        assert_eq!(fire.len(), 1);
        assert_eq!(fire[0].name, "Kitchen Fire");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = load(minimal_toml());

        std::env::set_var("VAULTDRILL_DATA_DIR", "/env/data");
        std::env::set_var("VAULTDRILL_CHECK_INTERVAL", "1800");
        std::env::set_var("VAULTDRILL_OUTPUT", "JSON");

        config.apply_env_overrides();

        assert_eq!(config.server.data_dir, PathBuf::from("/env/data"));
        assert_eq!(config.server.check_interval_secs, 1800);
        assert_eq!(config.server.output, OutputFormat::Json);

        // Clean up
        std::env::remove_var("VAULTDRILL_DATA_DIR");
        std::env::remove_var("VAULTDRILL_CHECK_INTERVAL");
        std::env::remove_var("VAULTDRILL_OUTPUT");
    }

    #[test]
    fn test_validation_threshold_exceeds_keys() {
        let toml = minimal_toml().replace("threshold = 2", "threshold = 4");
        let config = load(&toml);
        let err = config.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("4 of 3"));
    }

    #[test]
    fn test_validation_check_interval_too_low() {
        let toml = format!("[server]\ncheck_interval_secs = 30\n{}", minimal_toml());
        let config = load(&toml);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_combination() {
        let toml = format!(
            "{}\n[catalog]\ncombinations = [[\"house-fire\", \"meteor\"]]\n",
            minimal_toml()
        );
        let config = load(&toml);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("meteor"));
    }

    #[test]
    fn test_validation_duplicate_scenario() {
        let toml = format!(
            "{}\n[[catalog.scenarios]]\nid = \"x\"\nname = \"X\"\n\n[[catalog.scenarios]]\nid = \"x\"\nname = \"X again\"\n",
            minimal_toml()
        );
        assert!(load(&toml).validate().is_err());
    }

    #[test]
    fn test_lint_reports_mismatch_and_bad_shard() {
        let toml = full_toml()
            .replace("total_keys = 3", "total_keys = 4")
            .replace("threshold = 2\ntotal = 3", "threshold = 4\ntotal = 3");
        let config = load(&toml);
        let warnings = config.lint();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("declares 4 keys"));
        assert!(warnings[1].contains("k3"));
    }

    #[test]
    fn test_example_config_is_valid() {
        let config = load(include_str!("../vaultdrill.example.toml"));
        assert!(config.validate().is_ok());
        assert!(config.lint().is_empty());
        assert_eq!(config.scenarios().len(), default_catalog().len() + 1);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = load(full_toml());
        let serialized = toml::to_string_pretty(&config).unwrap();

        // Should be valid TOML that re-parses
        let reparsed: ServerConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(reparsed.setup, config.setup);
        assert_eq!(reparsed.catalog.scenarios, config.catalog.scenarios);
    }
}
