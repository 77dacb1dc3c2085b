//! Render orchestration: feature table in, waveform or WAV file out.
//!
//! Validation happens before any audio-rate work, so a bad table or bad
//! parameters never produce a file.

use std::path::Path;

use tickertone_spec::{FeatureTable, NoteParams, RenderParams};

use crate::error::AudioResult;
use crate::interpolate::{build_time_axis, interpolate};
use crate::mapping::{map_controls, DailyControlSet};
use crate::note::render_note_sequence;
use crate::oscillator::{self, ControlFrames};
use crate::wav::{write_pcm16_with, WriteMode};

/// A rendered mono waveform.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Samples, nominally in `[-1, 1]`.
    pub samples: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Waveform {
    /// Wraps samples at `sample_rate`.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the waveform has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f64 {
        oscillator::peak(&self.samples)
    }
}

/// Summary of a render written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    /// Number of input days.
    pub days: usize,
    /// Number of samples written.
    pub samples: usize,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Peak absolute sample value before quantization.
    pub peak: f64,
    /// BLAKE3 hash of the PCM payload, as hex.
    pub pcm_hash: String,
}

impl RenderResult {
    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples as f64 / self.sample_rate as f64
    }
}

fn validate_inputs(table: &FeatureTable, params: &RenderParams) -> AudioResult<()> {
    params.validate()?;
    table.validate_for_render()?;
    Ok(())
}

/// Maps the table to daily controls after validating both inputs.
pub fn daily_controls(table: &FeatureTable, params: &RenderParams) -> AudioResult<DailyControlSet> {
    validate_inputs(table, params)?;
    map_controls(table, params)
}

/// Audio-rate control tracks for a continuous render.
///
/// Frequency is reported after the 50 Hz floor.
pub fn render_controls(table: &FeatureTable, params: &RenderParams) -> AudioResult<ControlFrames> {
    let daily = daily_controls(table, params)?;
    let axis = build_time_axis(daily.len(), params.duration_seconds)?;

    let frequency = interpolate(&axis, &daily.frequency_hz, params.extrapolation)?;
    let amplitude = interpolate(&axis, &daily.amplitude, params.extrapolation)?;
    let brightness = interpolate(&axis, &daily.brightness, params.extrapolation)?;

    oscillator::sample_controls(
        &frequency,
        &amplitude,
        &brightness,
        params.duration_seconds,
        params.sample_rate,
    )
}

/// Renders the continuous sonification of `table`.
pub fn render_waveform(table: &FeatureTable, params: &RenderParams) -> AudioResult<Waveform> {
    let frames = render_controls(table, params)?;
    let samples = oscillator::synthesize(&frames, params.sample_rate);

    tracing::debug!(
        days = table.len(),
        samples = samples.len(),
        duration = params.duration_seconds,
        "rendered continuous waveform"
    );
    Ok(Waveform::new(samples, params.sample_rate))
}

/// Renders `table` and writes it to `path` as 16-bit mono WAV.
pub fn render_to_file(
    table: &FeatureTable,
    params: &RenderParams,
    path: &Path,
) -> AudioResult<RenderResult> {
    let waveform = render_waveform(table, params)?;
    write_waveform(&waveform, table.len(), WriteMode::from_atomic(params.atomic_write), path)
}

/// Renders `table` as discrete notes and writes it to `path`.
pub fn render_notes_to_file(
    table: &FeatureTable,
    params: &NoteParams,
    path: &Path,
) -> AudioResult<RenderResult> {
    let waveform = render_note_sequence(table, params)?;
    write_waveform(&waveform, table.len(), WriteMode::from_atomic(params.atomic_write), path)
}

fn write_waveform(
    waveform: &Waveform,
    days: usize,
    mode: WriteMode,
    path: &Path,
) -> AudioResult<RenderResult> {
    let wav = write_pcm16_with(&waveform.samples, waveform.sample_rate, path, mode)?;
    Ok(RenderResult {
        days,
        samples: wav.num_samples,
        sample_rate: wav.sample_rate,
        peak: waveform.peak(),
        pcm_hash: wav.pcm_hash,
    })
}
