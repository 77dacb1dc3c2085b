//! Prepare command implementation
//!
//! Turns a raw closing-price table into the daily feature table the renderer
//! consumes (`Trend,Speed,Speed_Norm,Event`).

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use tickertone_spec::{load_price_column, prepare_features};

/// Run the prepare command
///
/// # Arguments
/// * `input` - Comma-separated price table with a header row
/// * `column` - Name of the price column to use
/// * `window` - Rolling-mean window in days
/// * `event_limit` - Event threshold on `|speed|`
/// * `output` - Destination for the feature table
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(
    input: &Path,
    column: &str,
    window: usize,
    event_limit: f64,
    output: &Path,
) -> Result<ExitCode> {
    println!(
        "{} {} [{}]",
        "Preparing:".cyan().bold(),
        input.display(),
        column
    );

    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read price table: {}", input.display()))?;

    let prices = load_price_column(&text, column)?;
    let table = prepare_features(&prices, window, event_limit)?;
    let events = table.events().iter().filter(|&&e| e).count();

    table
        .write_csv_path(output)
        .with_context(|| format!("Failed to write feature table: {}", output.display()))?;

    tracing::info!(days = table.len(), events, "feature table written");
    println!(
        "{} {} days, {} events -> {}",
        "SUCCESS".green().bold(),
        table.len(),
        events,
        output.display()
    );

    Ok(ExitCode::SUCCESS)
}
