//! Params command implementation
//!
//! Prints the default parameter file so it can be saved and edited.

use anyhow::Result;
use std::process::ExitCode;

use tickertone_spec::{NoteParams, RenderParams};

/// Default parameters as pretty-printed JSON.
pub fn default_params_json(notes: bool) -> Result<String> {
    let json = if notes {
        serde_json::to_string_pretty(&NoteParams::default())?
    } else {
        serde_json::to_string_pretty(&RenderParams::default())?
    };
    Ok(json)
}

/// Run the params command
///
/// # Arguments
/// * `notes` - Print note-mode parameters instead of continuous ones
pub fn run(notes: bool) -> Result<ExitCode> {
    println!("{}", default_params_json(notes)?);
    Ok(ExitCode::SUCCESS)
}
