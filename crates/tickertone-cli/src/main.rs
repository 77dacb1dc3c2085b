//! Tickertone CLI - Command-line interface for market data sonification
//!
//! This binary prepares daily feature tables from raw prices and renders
//! them to WAV files.

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

use tickertone_cli::commands;
use tickertone_cli::commands::render::{RenderMode, RenderOptions};
use tickertone_spec::{DEFAULT_EVENT_LIMIT, DEFAULT_TREND_WINDOW};

/// Tickertone - Hear the market move
#[derive(Parser)]
#[command(name = "tickertone")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a daily feature table from a raw price table
    Prepare {
        /// Comma-separated price table with a header row
        #[arg(short, long)]
        input: PathBuf,

        /// Price column to use
        #[arg(short, long)]
        column: String,

        /// Rolling-mean window in days
        #[arg(long, default_value_t = DEFAULT_TREND_WINDOW)]
        window: usize,

        /// Event threshold on the absolute daily speed
        #[arg(long, default_value_t = DEFAULT_EVENT_LIMIT)]
        event_limit: f64,

        /// Output feature table path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render a feature table to a WAV file
    Render {
        /// Feature table (Trend,Speed,Speed_Norm,Event)
        #[arg(short, long)]
        input: PathBuf,

        /// Output WAV path
        #[arg(short, long)]
        output: PathBuf,

        /// JSON parameter file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Total duration in seconds (continuous mode)
        #[arg(long)]
        duration: Option<f64>,

        /// Output sample rate in Hz
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Rendering style
        #[arg(long, value_enum, default_value_t = RenderMode::Continuous)]
        mode: RenderMode,

        /// Output machine-readable JSON summary (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print default parameters as JSON
    Params {
        /// Print note-mode parameters
        #[arg(long)]
        notes: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Prepare {
            input,
            column,
            window,
            event_limit,
            output,
        } => commands::prepare::run(&input, &column, window, event_limit, &output),
        Commands::Render {
            input,
            output,
            config,
            duration,
            sample_rate,
            mode,
            json,
        } => commands::render::run(&RenderOptions {
            input: &input,
            output: &output,
            config: config.as_deref(),
            duration,
            sample_rate,
            mode,
            json,
        }),
        Commands::Params { notes } => commands::params::run(notes),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            let label = match commands::error_code(&e) {
                Some(code) => format!("error[{}]", code),
                None => "error".to_string(),
            };
            eprintln!("{}: {:#}", colored::Colorize::red(label.as_str()), e);
            ExitCode::from(1)
        }
    }
}
