#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `sota_map`: maps of SOTA activations and chases.
//!
//! Subcommands write a static activations map, serve the live dashboard,
//! or map the summits chased in an ADIF log. Without a subcommand an
//! interactive menu asks what to do.
//!
//! Uses `indicatif-log-bridge` (via [`sota_map_cli_utils::init_logger`])
//! so that log lines and progress bars never fight for the terminal.

mod commands;
mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sota_map_config::Settings;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "sota_map", about = "Maps of SOTA activations and chases")]
struct Cli {
    /// Settings file (default: `SOTA_MAP_CONFIG`, then `sota_map.toml`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a static map of current activations
    Spots {
        /// Negative for hours back, positive for a number of recent spots
        #[arg(long, allow_hyphen_values = true)]
        lookback: Option<i32>,
        /// Summit reference CSV
        #[arg(long)]
        summits: Option<PathBuf>,
        /// Output HTML file
        #[arg(long)]
        output: Option<PathBuf>,
        /// File that unknown summit references are appended to
        #[arg(long)]
        errors: Option<PathBuf>,
    },
    /// Serve the live spots dashboard
    Dashboard {
        /// Negative for hours back, positive for a number of recent spots
        #[arg(long, allow_hyphen_values = true)]
        lookback: Option<i32>,
        /// Summit reference CSV
        #[arg(long)]
        summits: Option<PathBuf>,
        /// File that unknown summit references are appended to
        #[arg(long)]
        errors: Option<PathBuf>,
        /// Address to bind (overrides `BIND_ADDR`)
        #[arg(long)]
        bind: Option<String>,
        /// Port to bind (overrides `PORT`)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Write a map of the summits chased in an ADIF log
    Chases {
        /// ADIF log file
        #[arg(long)]
        log: PathBuf,
        /// Save the transliterated log here
        #[arg(long)]
        working_log: Option<PathBuf>,
        /// Encoding for logs that are not UTF-8 (e.g. `windows-1250`)
        #[arg(long)]
        encoding: Option<String>,
        /// Output HTML file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the effective settings as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let multi = sota_map_cli_utils::init_logger();
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;

    let Some(command) = cli.command else {
        return interactive::run(&multi, settings).await;
    };

    match command {
        Commands::Spots {
            lookback,
            summits,
            output,
            errors,
        } => {
            apply_spot_flags(&mut settings, lookback, summits, errors);
            if let Some(output) = output {
                settings.spots.output = output;
            }
            commands::run_spots(&multi, &settings).await?;
        }
        Commands::Dashboard {
            lookback,
            summits,
            errors,
            bind,
            port,
        } => {
            apply_spot_flags(&mut settings, lookback, summits, errors);
            if let Some(bind) = bind {
                settings.dashboard.bind_addr = bind;
            }
            if let Some(port) = port {
                settings.dashboard.port = port;
            }
            commands::run_dashboard(&multi, &settings, false).await?;
        }
        Commands::Chases {
            log,
            working_log,
            encoding,
            output,
        } => {
            if working_log.is_some() {
                settings.chases.working_log = working_log;
            }
            if let Some(encoding) = encoding {
                settings.chases.log_encoding = encoding;
            }
            if let Some(output) = output {
                settings.chases.output = output;
            }
            commands::run_chases(&multi, &settings, &log).await?;
        }
        Commands::Config => print!("{}", settings.to_toml()?),
    }

    Ok(())
}

fn apply_spot_flags(
    settings: &mut Settings,
    lookback: Option<i32>,
    summits: Option<PathBuf>,
    errors: Option<PathBuf>,
) {
    if let Some(lookback) = lookback {
        settings.spots.lookback = lookback;
    }
    if let Some(summits) = summits {
        settings.summits_csv = summits;
    }
    if let Some(errors) = errors {
        settings.errors_log = errors;
    }
}
