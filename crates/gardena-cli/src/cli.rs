//! Clap derive structures for the `gardena` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// gardena -- drive a Gardena smart system robotic mower
#[derive(Debug, Parser)]
#[command(
    name = "gardena",
    version,
    about = "Control a Gardena robotic mower from the command line",
    long_about = "Reads mower status and battery state from the Gardena smart system\n\
        cloud API and sends start/park commands.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Mower profile to use
    #[arg(long, short = 'p', env = "GARDENA_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "GARDENA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GARDENA_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "GARDENA_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show mowing state, battery level, and charging state
    #[command(alias = "st")]
    Status,

    /// Start mowing now, overriding the schedule
    Start(StartArgs),

    /// Return to the charging station
    Park(ParkArgs),

    /// Hand control back to the schedule
    Resume,

    /// List locations visible to the account
    #[command(alias = "loc")]
    Locations,

    /// List devices in the mower's location
    #[command(alias = "dev")]
    Devices,

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Seconds to mow (defaults to the profile's start_duration)
    #[arg(long, short = 'd', value_parser = clap::value_parser!(u32).range(1..))]
    pub duration: Option<u32>,
}

#[derive(Debug, Args)]
pub struct ParkArgs {
    /// Stay parked and ignore the schedule until resumed
    #[arg(long)]
    pub until_further_notice: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display the loaded configuration (passwords redacted)
    Show,

    /// List configured profiles
    Profiles,

    /// Store a profile's password in the system keyring
    SetPassword,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
