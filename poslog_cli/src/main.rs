#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Command-line front end for the position logger.

mod cli;
mod error_fmt;
mod run;

use clap::Parser;
use cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use eyre::{Result, WrapErr};
use poslog_config::{Config, Logging};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

fn main() {
    if let Err(err) = try_main() {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", error_fmt::json_error(&err));
        } else {
            eprintln!("{}", error_fmt::humanize(&err));
        }
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    let cfg = load_config(&cli)?;
    init_tracing(cli.json, &cli.log_level, &cfg.logging)?;

    match cli.cmd {
        Commands::Run {
            playback,
            out,
            record,
            ticks,
            summary,
        } => run::run(&cfg, &playback, out, record, ticks, summary),
        Commands::Log { playback } => run::log_once(&cfg, &playback),
        Commands::Show { file } => run::show(&file),
    }
}

/// Read and validate the config. Only the untouched default path may be
/// absent (read-only commands still work then); an explicitly given
/// missing path is an error, not a silent run with everything disabled.
fn load_config(cli: &Cli) -> Result<Config> {
    if !cli.config.exists() {
        if cli.config == std::path::Path::new(cli::DEFAULT_CONFIG) {
            return Ok(Config::default());
        }
        eyre::bail!("config file not found: {}", cli.config.display());
    }
    let raw = std::fs::read_to_string(&cli.config)
        .wrap_err_with(|| format!("read config {}", cli.config.display()))?;
    let cfg: Config = toml::from_str(&raw)
        .map_err(|e| eyre::eyre!("parse config {}: {e}", cli.config.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Console layer honoring --json/--log-level, plus an optional JSON file
/// layer from the [logging] config section. Console output goes to
/// stderr so stdout stays clean for command output.
fn init_tracing(json: bool, level: &str, logging: &Logging) -> Result<()> {
    let directive = logging.level.as_deref().unwrap_or(level);
    let filter = EnvFilter::try_new(directive)
        .map_err(|e| eyre::eyre!("invalid log level '{directive}': {e}"))?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(filter.boxed());
    if json {
        layers.push(fmt::layer().json().with_writer(std::io::stderr).boxed());
    } else {
        layers.push(fmt::layer().with_writer(std::io::stderr).boxed());
    }

    if let Some(file) = &logging.file {
        let path = std::path::Path::new(file);
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => std::path::Path::new("."),
        };
        let name = path
            .file_name()
            .ok_or_else(|| eyre::eyre!("logging.file has no file name: '{file}'"))?;
        let appender = match logging.rotation.as_deref() {
            None | Some("never") => tracing_appender::rolling::never(dir, name),
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            Some(other) => {
                eyre::bail!("logging.rotation must be never|daily|hourly, got '{other}'")
            }
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        layers.push(fmt::layer().json().with_writer(writer).boxed());
    }

    tracing_subscriber::registry().with(layers).init();
    Ok(())
}
