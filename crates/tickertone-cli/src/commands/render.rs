//! Render command implementation
//!
//! Reads a feature table, renders it continuously or as discrete notes, and
//! writes a mono 16-bit WAV file.

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use tickertone_backend_audio::{render_notes_to_file, render_to_file, RenderResult};
use tickertone_spec::{FeatureTable, NoteParams, RenderParams};

/// Rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// One gliding voice over the whole series
    #[default]
    Continuous,
    /// One enveloped note per day
    Notes,
}

/// Options for the render command.
#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    /// Feature table path.
    pub input: &'a Path,
    /// WAV output path.
    pub output: &'a Path,
    /// Optional JSON parameter file.
    pub config: Option<&'a Path>,
    /// Overrides the configured duration (continuous mode only).
    pub duration: Option<f64>,
    /// Overrides the configured sample rate.
    pub sample_rate: Option<u32>,
    /// Rendering style.
    pub mode: RenderMode,
    /// Print a JSON summary instead of colored text.
    pub json: bool,
}

/// Machine-readable render summary.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSummary {
    /// Path of the written WAV file.
    pub output: String,
    /// Rendering style used.
    pub mode: RenderMode,
    /// Number of input days.
    pub days: usize,
    /// Number of samples written.
    pub samples: usize,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Length of the audio in seconds.
    pub duration_seconds: f64,
    /// Peak absolute sample value before quantization.
    pub peak: f64,
    /// BLAKE3 hash of the PCM payload, as hex.
    pub pcm_hash: String,
}

impl RenderSummary {
    fn new(output: &Path, mode: RenderMode, result: &RenderResult) -> Self {
        Self {
            output: output.display().to_string(),
            mode,
            days: result.days,
            samples: result.samples,
            sample_rate: result.sample_rate,
            duration_seconds: result.duration_seconds(),
            peak: result.peak,
            pcm_hash: result.pcm_hash.clone(),
        }
    }
}

/// Loads continuous-render parameters and applies command-line overrides.
pub fn load_render_params(
    config: Option<&Path>,
    duration: Option<f64>,
    sample_rate: Option<u32>,
) -> Result<RenderParams> {
    let mut params = match config {
        Some(path) => RenderParams::from_path(path)
            .with_context(|| format!("Failed to load render config: {}", path.display()))?,
        None => RenderParams::default(),
    };
    if let Some(duration) = duration {
        params.duration_seconds = duration;
    }
    if let Some(rate) = sample_rate {
        params.sample_rate = rate;
    }
    Ok(params)
}

/// Loads note-render parameters and applies command-line overrides.
pub fn load_note_params(config: Option<&Path>, sample_rate: Option<u32>) -> Result<NoteParams> {
    let mut params = match config {
        Some(path) => NoteParams::from_path(path)
            .with_context(|| format!("Failed to load note config: {}", path.display()))?,
        None => NoteParams::default(),
    };
    if let Some(rate) = sample_rate {
        params.sample_rate = rate;
    }
    Ok(params)
}

/// Run the render command
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(options: &RenderOptions<'_>) -> Result<ExitCode> {
    if !options.json {
        println!(
            "{} {} -> {}",
            "Rendering:".cyan().bold(),
            options.input.display(),
            options.output.display()
        );
    }

    let table = FeatureTable::from_csv_path(options.input)
        .with_context(|| format!("Failed to load feature table: {}", options.input.display()))?;

    let result = match options.mode {
        RenderMode::Continuous => {
            let params =
                load_render_params(options.config, options.duration, options.sample_rate)?;
            render_to_file(&table, &params, options.output)?
        }
        RenderMode::Notes => {
            if options.duration.is_some() {
                tracing::warn!("--duration is ignored in notes mode");
            }
            let params = load_note_params(options.config, options.sample_rate)?;
            render_notes_to_file(&table, &params, options.output)?
        }
    };

    let summary = RenderSummary::new(options.output, options.mode, &result);
    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(ExitCode::SUCCESS)
}

fn print_summary(summary: &RenderSummary) {
    println!(
        "{} {} days, {} samples @ {} Hz ({:.2}s)",
        "SUCCESS".green().bold(),
        summary.days,
        summary.samples,
        summary.sample_rate,
        summary.duration_seconds
    );
    println!("  {} {:.4}", "peak:".dimmed(), summary.peak);
    println!("  {} {}", "pcm hash:".dimmed(), summary.pcm_hash);
}
