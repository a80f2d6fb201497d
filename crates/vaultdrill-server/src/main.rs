//! VaultDrill Server: headless resilience drills for a multisig setup
//!
//! Loads one custody setup and a scenario catalog from a TOML config, prints
//! a resilience report, and re-assesses on an interval so that edits to the
//! setup that weaken it get flagged.
//!
//! # Usage
//!
//! ```bash
//! vaultdrill-server --config /path/to/vaultdrill.toml
//! vaultdrill-server --once      # Print one report and exit
//! vaultdrill-server --validate  # Validate config and exit
//! ```

mod config;
mod daemon;

use anyhow::{Context, Result};
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "/config/vaultdrill.toml";

/// What the invocation asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Re-drill on every interval until Ctrl-C
    Daemon,
    /// One report, then exit
    Once,
    /// Check the config, print a summary, exit
    Validate,
    Help,
    Version,
}

#[derive(Debug, PartialEq, Eq)]
struct Cli {
    config_path: PathBuf,
    mode: Mode,
}

impl Cli {
    /// Parse arguments, program name excluded. `--help`/`--version` win
    /// over anything after them.
    fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut cli = Cli {
            config_path: PathBuf::from(DEFAULT_CONFIG),
            mode: Mode::Daemon,
        };
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-c" | "--config" => {
                    let path = args
                        .next()
                        .with_context(|| format!("{} expects a file path", arg))?;
                    cli.config_path = PathBuf::from(path);
                }
                "--once" | "--check" => cli.mode = Mode::Once,
                "--validate" => cli.mode = Mode::Validate,
                "-h" | "--help" => return Ok(Cli { mode: Mode::Help, ..cli }),
                "-V" | "--version" => return Ok(Cli { mode: Mode::Version, ..cli }),
                other => anyhow::bail!("Unrecognized argument '{}' (try --help)", other),
            }
        }
        Ok(cli)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse(std::env::args().skip(1))?;
    match cli.mode {
        Mode::Help => {
            print_help();
            return Ok(());
        }
        Mode::Version => {
            println!("vaultdrill-server {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }
    let config_path = cli.config_path;

    let mut server_config = config::ServerConfig::from_file(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    server_config.apply_env_overrides();

    env_logger::Builder::new()
        .parse_filters(&server_config.server.log_level)
        .init();

    server_config
        .validate()
        .context("Configuration validation failed")?;

    for warning in server_config.lint() {
        log::warn!("{}", warning);
    }

    if cli.mode == Mode::Validate {
        println!("✅ Configuration is valid.");
        println!(
            "  Setup:          {} ({})",
            server_config.setup.name,
            server_config.setup.quorum_label()
        );
        println!(
            "  Sharded keys:   {}",
            server_config
                .setup
                .keys
                .iter()
                .filter(|k| k.is_sharded())
                .count()
        );
        println!("  Scenarios:      {}", server_config.scenarios().len());
        println!(
            "  Combinations:   {}",
            server_config.catalog.combinations.len()
        );
        println!(
            "  Check interval: {} secs",
            server_config.server.check_interval_secs
        );
        return Ok(());
    }

    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;

    if cli.mode == Mode::Once {
        rt.block_on(daemon::run_check_cycle(&server_config))?;
        return Ok(());
    }

    let shutdown = rt.block_on(async {
        tokio::select! {
            result = daemon::run(server_config) => result,
            _ = tokio::signal::ctrl_c() => {
                log::info!("Interrupted, stopping drills");
                Ok(())
            }
        }
    });

    if let Err(e) = shutdown {
        log::error!("Server error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"vaultdrill-server {version}
Drill a multisig custody setup against a catalog of adverse events.

Usage: vaultdrill-server [-c <FILE>] [--once | --validate]

  -c, --config <FILE>  TOML config (default {config})
      --once           Drill once, print the report, exit (alias --check)
      --validate       Check the config and print a summary
  -h, --help           This text
  -V, --version        Version

Environment (wins over the config file):
  VAULTDRILL_DATA_DIR        where last_score.json is kept
  VAULTDRILL_CHECK_INTERVAL  seconds between drills, at least 60
  VAULTDRILL_LOG_LEVEL       env_logger filter, e.g. info or vaultdrill_sim=debug
  VAULTDRILL_OUTPUT          report format: text or json

A nightly JSON report from cron:
  VAULTDRILL_OUTPUT=json vaultdrill-server -c vaultdrill.toml --once"#,
        version = env!("CARGO_PKG_VERSION"),
        config = DEFAULT_CONFIG,
    );
}
