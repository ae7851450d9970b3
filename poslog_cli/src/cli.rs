//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Config path used when --config is not given. Only this path may be
/// absent; an explicitly passed path must exist.
pub const DEFAULT_CONFIG: &str = "etc/poslog.toml";

#[derive(Parser, Debug)]
#[command(name = "poslog", version, about = "G-code position logger")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a recorded trace through the polling loop and build a script
    Run {
        /// Playback CSV (strict header: x,y,z,din,dout,ain,aout)
        #[arg(long, value_name = "FILE")]
        playback: PathBuf,
        /// Write the script here, overriding script.path from the config
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Arm the interval recorder from the first tick
        #[arg(long, action = ArgAction::SetTrue)]
        record: bool,
        /// Stop after this many ticks (default: one per trace row)
        #[arg(long, value_name = "N")]
        ticks: Option<usize>,
        /// Print a JSON run summary on completion
        #[arg(long, action = ArgAction::SetTrue)]
        summary: bool,
    },
    /// Compose one log line from the first trace row and print it
    Log {
        /// Playback CSV (strict header: x,y,z,din,dout,ain,aout)
        #[arg(long, value_name = "FILE")]
        playback: PathBuf,
    },
    /// Parse a script file and print its regions
    Show {
        /// Script file (.ngc or .txt)
        file: PathBuf,
    },
}
