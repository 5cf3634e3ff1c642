//! SoC interrupt smoketest CLI.
//!
//! This binary drives the smoketest suites against the modeled chip. It
//! performs:
//! 1. **Run:** Execute every suite (or a filtered subset) and report
//!    PASS/FAIL per suite.
//! 2. **List:** Print the available suite names.

use std::{fs, process};

use clap::{Parser, Subcommand};

use socsmoke_core::config::Config;
use socsmoke_core::sim::orchestrator::{run_filtered, SUITES};

#[derive(Parser, Debug)]
#[command(
    name = "socsmoke",
    author,
    version,
    about = "SoC interrupt-fabric smoketest harness",
    long_about = "Run the interrupt claim/dispatch/complete smoketests against the modeled chip.\n\nConfiguration uses built-in defaults; pass --config to override any subset of fields from a JSON file.\n\nExamples:\n  socsmoke run\n  socsmoke run --filter uart\n  socsmoke run --config harness.json\n  socsmoke list"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the smoketest suites.
    Run {
        /// JSON config file overriding the default harness settings.
        #[arg(short, long)]
        config: Option<String>,

        /// Only run suites whose name contains this substring.
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// List the available suites.
    List,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Run { config, filter }) => cmd_run(config, filter.as_deref()),
        Some(Commands::List) => {
            for (name, _) in SUITES {
                println!("{name}");
            }
        }
        None => cmd_run(None, None),
    }
}

/// Runs the suites and exits nonzero if any fails.
fn cmd_run(config_path: Option<String>, filter: Option<&str>) {
    let config = match config_path {
        Some(path) => load_config(&path),
        None => Config::default(),
    };

    tracing::debug!(?config, ?filter, "starting smoketest run");
    let report = run_filtered(&config, filter);
    if report.results.is_empty() {
        eprintln!("No suites match the filter");
        process::exit(1);
    }

    let mut failures = 0u32;
    for result in &report.results {
        match &result.outcome {
            Ok(()) => println!("PASS  {}", result.name),
            Err(err) => {
                failures += 1;
                println!("FAIL  {}: {}", result.name, err);
            }
        }
    }
    println!();
    println!(
        "{} passed, {} failed, {} total",
        report.results.len() as u32 - failures,
        failures,
        report.results.len()
    );

    if failures > 0 {
        process::exit(1);
    }
}

fn load_config(path: &str) -> Config {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading config {path}: {e}");
        process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Error parsing config {path}: {e}");
        process::exit(1);
    })
}
