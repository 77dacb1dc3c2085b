//! Daily feature values to daily control values.
//!
//! Every function here is pure and works on whole columns, because the trend
//! normalization needs the range of the full series. Inputs must be non-empty
//! and equally long; NaN entries count as zero.

mod scale;

#[cfg(test)]
mod tests;

pub use scale::{
    major_scale, midi_to_frequency, speed_norm_to_note_duration, speed_to_note_frequency,
    trend_to_scale_notes, MAJOR_SCALE_STEPS, NOTE_FREQUENCY_FLOOR_HZ,
};

use tickertone_spec::features::min_max_normalize;
use tickertone_spec::{
    AmplitudeMapping, BrightnessMapping, FeatureTable, FrequencyMapping, RenderParams,
};

use crate::error::{AudioError, AudioResult};

/// Lowest daily frequency the mapper emits (Hz).
pub const MIN_CONTROL_FREQUENCY_HZ: f64 = 100.0;

/// Highest daily frequency the mapper emits (Hz).
pub const MAX_CONTROL_FREQUENCY_HZ: f64 = 1000.0;

/// The three daily control columns, one entry per record.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyControlSet {
    /// Pitch per day, in `[100, 1000]` Hz.
    pub frequency_hz: Vec<f64>,
    /// Loudness per day, in `[min_amp, max_amp]`.
    pub amplitude: Vec<f64>,
    /// Harmonic weight per day, in `[0, 1]`.
    pub brightness: Vec<f64>,
}

impl DailyControlSet {
    /// Number of days.
    pub fn len(&self) -> usize {
        self.frequency_hz.len()
    }

    /// Returns true if there are no days.
    pub fn is_empty(&self) -> bool {
        self.frequency_hz.is_empty()
    }
}

/// Maps a feature table to its daily controls.
pub fn map_controls(table: &FeatureTable, params: &RenderParams) -> AudioResult<DailyControlSet> {
    let speed_norm = table.speed_norms();

    let frequency_hz = trend_speed_to_frequency(
        &table.trends(),
        &speed_norm,
        &table.speed_signs(),
        &params.frequency,
    )?;
    let amplitude = speed_norm_to_amplitude(&speed_norm, &params.amplitude)?;
    let brightness = speed_and_event_to_brightness(&speed_norm, &table.events(), &params.brightness)?;

    tracing::debug!(
        days = frequency_hz.len(),
        freq_min = fold_min(&frequency_hz),
        freq_max = fold_max(&frequency_hz),
        "mapped daily controls"
    );

    Ok(DailyControlSet {
        frequency_hz,
        amplitude,
        brightness,
    })
}

/// Trend sets the base pitch, signed speed bends it.
///
/// `base = base_min + norm(trend) * (base_max - base_min)` where a flat trend
/// normalizes to 0, then `speed_sign * speed_norm * delta_max` is added and
/// the result clamped to `[100, 1000]` Hz.
pub fn trend_speed_to_frequency(
    trend: &[f64],
    speed_norm: &[f64],
    speed_sign: &[f64],
    mapping: &FrequencyMapping,
) -> AudioResult<Vec<f64>> {
    check_columns(&[
        ("trend", trend.len()),
        ("speed_norm", speed_norm.len()),
        ("speed_sign", speed_sign.len()),
    ])?;

    let trend: Vec<f64> = trend.iter().copied().map(nan_to_zero).collect();
    let norm_trend = min_max_normalize(&trend);
    let span = mapping.base_max - mapping.base_min;

    Ok(norm_trend
        .iter()
        .zip(speed_norm)
        .zip(speed_sign)
        .map(|((&nt, &sn), &sign)| {
            let base = mapping.base_min + nt * span;
            let delta = nan_to_zero(sign) * nan_to_zero(sn) * mapping.delta_max;
            (base + delta).clamp(MIN_CONTROL_FREQUENCY_HZ, MAX_CONTROL_FREQUENCY_HZ)
        })
        .collect())
}

/// `amp = min_amp + (max_amp - min_amp) * clamp(speed_norm, 0, 1)`.
pub fn speed_norm_to_amplitude(
    speed_norm: &[f64],
    mapping: &AmplitudeMapping,
) -> AudioResult<Vec<f64>> {
    check_columns(&[("speed_norm", speed_norm.len())])?;
    Ok(speed_norm
        .iter()
        .map(|&sn| scale_unit(sn, mapping.min_amp, mapping.max_amp))
        .collect())
}

/// `brightness = clamp(speed_norm * base_weight + event * event_boost, 0, 1)`.
pub fn speed_and_event_to_brightness(
    speed_norm: &[f64],
    event: &[bool],
    mapping: &BrightnessMapping,
) -> AudioResult<Vec<f64>> {
    check_columns(&[("speed_norm", speed_norm.len()), ("event", event.len())])?;
    Ok(speed_norm
        .iter()
        .zip(event)
        .map(|(&sn, &ev)| {
            let boost = if ev { mapping.event_boost } else { 0.0 };
            (nan_to_zero(sn) * mapping.base_weight + boost).clamp(0.0, 1.0)
        })
        .collect())
}

/// Linear map of a clamped unit value onto `[lo, hi]`.
pub(crate) fn scale_unit(value: f64, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * nan_to_zero(value).clamp(0.0, 1.0)
}

pub(crate) fn nan_to_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Rejects empty columns and columns whose lengths disagree.
fn check_columns(columns: &[(&str, usize)]) -> AudioResult<()> {
    let Some(&(first_name, expected)) = columns.first() else {
        return Ok(());
    };
    for &(name, len) in columns {
        if len == 0 {
            return Err(AudioError::invalid_input(name, "must not be empty"));
        }
        if len != expected {
            return Err(AudioError::invalid_input(
                name,
                format!("length {} does not match {} length {}", len, first_name, expected),
            ));
        }
    }
    Ok(())
}

fn fold_min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn fold_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
