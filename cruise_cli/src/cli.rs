//! CLI argument definitions and shared statics.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "cruise", version, about = "Vehicle speed control simulator")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/cruise.toml")]
    pub config: PathBuf,

    /// Log and print as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG wins if set
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the closed loop
    Run(RunArgs),
    /// Validate the config (and an optional scenario) without running
    CheckConfig {
        /// Scenario CSV to validate alongside the config
        #[arg(long, value_name = "FILE")]
        scenario: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Number of ticks to run (overrides simulation.ticks)
    #[arg(long, value_name = "N", conflicts_with = "seconds")]
    pub ticks: Option<u64>,

    /// Simulated seconds to run; converted to ticks with simulation.dt
    #[arg(long, value_name = "SECS")]
    pub seconds: Option<f64>,

    /// Target speed in km/h applied from the first tick
    #[arg(long, value_name = "KMH", conflicts_with = "scenario")]
    pub target: Option<f64>,

    /// Constant raw disturbance applied every tick
    #[arg(long, value_name = "RPM", conflicts_with = "scenario")]
    pub disturbance: Option<f64>,

    /// Scenario CSV (tick,disturbance,target) scripting the live inputs
    #[arg(long, value_name = "FILE")]
    pub scenario: Option<PathBuf>,

    /// Pace ticks on the wall clock at simulation.interval_ms
    #[arg(long, action = ArgAction::SetTrue)]
    pub realtime: bool,

    /// Override the pacing interval; implies --realtime
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Print every Nth sample while running
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub print_every: Option<u64>,

    /// Dump the retained telemetry history after the run
    #[arg(long, action = ArgAction::SetTrue)]
    pub history: bool,
}
