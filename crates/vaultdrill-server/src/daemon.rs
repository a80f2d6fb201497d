//! The daemon loop: periodically re-drills the setup and flags regressions.

use crate::config::{OutputFormat, ServerConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use vaultdrill_sim::{build_report, ResilienceReport};

const STATE_FILE: &str = "last_score.json";

/// Score persisted between check cycles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastScore {
    pub setup_name: String,
    pub value: u8,
    pub recoverable_count: usize,
    pub total_scenarios: usize,
    /// RFC 3339 timestamp
    pub assessed_at: String,
}

impl LastScore {
    fn from_report(report: &ResilienceReport) -> Self {
        Self {
            setup_name: report.setup_name.clone(),
            value: report.score.value,
            recoverable_count: report.score.recoverable_count,
            total_scenarios: report.score.total_scenarios,
            assessed_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

fn state_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STATE_FILE)
}

/// Read the previous score, `None` if there is none yet.
pub async fn load_last_score(data_dir: &Path) -> Result<Option<LastScore>> {
    let path = state_path(data_dir);
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Ok(None);
    }
    let contents = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read state file: {}", path.display()))?;
    let state = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse state file: {}", path.display()))?;
    Ok(Some(state))
}

pub async fn save_last_score(data_dir: &Path, state: &LastScore) -> Result<()> {
    let path = state_path(data_dir);
    let json = serde_json::to_string_pretty(state)?;
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("Failed to write state file: {}", path.display()))?;
    Ok(())
}

/// Run the daemon loop. Blocks forever (until shutdown signal).
pub async fn run(config: ServerConfig) -> Result<()> {
    log::info!("VaultDrill server starting…");
    log::info!(
        "  Setup:      {} ({})",
        config.setup.name,
        config.setup.quorum_label()
    );
    log::info!(
        "  Interval:   {} seconds ({:.1} hours)",
        config.server.check_interval_secs,
        config.server.check_interval_secs as f64 / 3600.0
    );
    log::info!("  Data dir:   {}", config.server.data_dir.display());

    let interval = Duration::from_secs(config.server.check_interval_secs);

    // Run first check immediately, then loop
    let mut first = true;
    loop {
        if !first {
            log::info!(
                "Sleeping {} seconds until next check…",
                config.server.check_interval_secs
            );
            tokio::time::sleep(interval).await;
        }
        first = false;

        match run_check_cycle(&config).await {
            Ok(_) => log::info!("Check cycle completed successfully."),
            Err(e) => log::error!("Check cycle failed: {:#}", e),
        }
    }
}

/// Execute a single check cycle: drill the catalog, print, compare with last run.
pub async fn run_check_cycle(config: &ServerConfig) -> Result<ResilienceReport> {
    log::info!("Starting check cycle…");

    let scenarios = config.scenarios();
    let report = build_report(&config.setup, &scenarios, &config.catalog.combinations)
        .with_context(|| format!("Failed to assess setup '{}'", config.setup.name))?;

    print_report(&report, config.server.output)?;

    for result in report.results.iter().filter(|r| !r.outcome.is_recoverable()) {
        log::warn!(
            "[{}] {}: {}/{} keys available",
            config.setup.name,
            result.scenario.label(),
            result.available_keys,
            result.threshold
        );
    }

    tokio::fs::create_dir_all(&config.server.data_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create data dir: {}",
                config.server.data_dir.display()
            )
        })?;

    let current = LastScore::from_report(&report);
    match load_last_score(&config.server.data_dir).await? {
        Some(previous) if previous.setup_name == current.setup_name => {
            if current.value < previous.value {
                log::warn!(
                    "⚠️  Resilience dropped from {}% to {}% since {}",
                    previous.value,
                    current.value,
                    previous.assessed_at
                );
            } else if current.value > previous.value {
                log::info!(
                    "Resilience improved from {}% to {}%",
                    previous.value,
                    current.value
                );
            }
        }
        _ => log::info!("First assessment recorded: {}", report.score),
    }
    save_last_score(&config.server.data_dir, &current).await?;

    Ok(report)
}

fn print_report(report: &ResilienceReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(report).context("Failed to serialize report")?;
            println!("{}", json);
        }
    }
    Ok(())
}
