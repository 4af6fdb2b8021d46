//! zk-decode - decode ZKTeco user-management responses from a hex dump.

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};
use zk_decode as app;

use app::config::{AppConfig, ConfigError, ConfigLoadResult, LoggingConfig};
use app::report::{ReportFormat, decode_hex_report};
use app::zk::{CommandFamily, Decoder};

/// Decode a raw ZKTeco device response into a structured result.
#[derive(Parser)]
#[command(name = "zk-decode", version)]
struct Cli {
    /// Response bytes as hex (whitespace allowed); read from stdin when omitted
    hex: Option<String>,

    /// Operation that produced the response: create, update, delete or list
    #[arg(long = "op")]
    operation: Option<CommandFamily>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Path to config.toml
    #[arg(long, conflicts_with = "dev")]
    config: Option<PathBuf>,

    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,
}

fn main() -> anyhow::Result<()> {
    run(Cli::parse())?;
    Ok(())
}

fn run(cli: Cli) -> app::Result<()> {
    // Determine config path based on mode
    let config_path = match (&cli.config, cli.dev) {
        (Some(path), _) => path.clone(),
        (None, true) => PathBuf::from("config.toml"),
        (None, false) => AppConfig::default_path(),
    };

    let (config, missing) = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => (config, false),
        ConfigLoadResult::Missing => (AppConfig::default(), true),
        ConfigLoadResult::Invalid(e) => return Err(e.into()),
    };

    let _guard = init_logging(&config.logging)?;

    if missing {
        tracing::debug!("Config not found at {:?}, using defaults", config_path);
    } else {
        tracing::debug!("Config loaded from {:?}", config_path);
    }

    let input = match cli.hex {
        Some(hex) => hex,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let format = if cli.json { ReportFormat::Json } else { ReportFormat::Text };
    let decoder = Decoder::new(config.commands.command_table());
    let report = decode_hex_report(&decoder, &input, cli.operation, format)?;

    if cli.json {
        println!("{report}");
    } else {
        print!("{report}");
    }

    Ok(())
}

/// Initialize stderr logging plus an optional daily log file.
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// must be held until exit so buffered file output is flushed.
fn init_logging(logging: &LoggingConfig) -> app::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| ConfigError::Validation(format!("Invalid log filter: {e}")))?;

    let (file_layer, guard) = match &logging.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "zk-decode.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}
