//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use crate::alerts::GatePolicy;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Host telemetry monitor
///
/// Polls memory, disk, power and temperature and sends email or push alerts
/// when they cross configured thresholds.
#[derive(Parser, Debug)]
#[command(name = "hostwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "HOSTWATCH_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the polling daemon
    Run(RunArgs),

    /// Poll once and print the snapshot with derived values
    Check,

    /// Print the effective configuration with secrets redacted
    Config,

    /// Send a test alert through every configured channel
    NotifyTest,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the run command
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Poll interval in milliseconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_freq: Option<u64>,

    /// Minimum interval between gated notifications, in minutes
    #[arg(long)]
    pub min_interval: Option<u64>,

    /// How the notification interval gates recovery alerts
    #[arg(long, value_enum)]
    pub gate_policy: Option<GatePolicyArg>,

    /// Poll a single time and exit
    #[arg(long)]
    pub once: bool,
}

/// Gate policy argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePolicyArg {
    /// Gated alerts fire only within the interval of the last one
    Recency,
    /// Gated alerts fire only after the interval has elapsed
    Cooldown,
}

impl From<GatePolicyArg> for GatePolicy {
    fn from(arg: GatePolicyArg) -> Self {
        match arg {
            GatePolicyArg::Recency => GatePolicy::Recency,
            GatePolicyArg::Cooldown => GatePolicy::Cooldown,
        }
    }
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
