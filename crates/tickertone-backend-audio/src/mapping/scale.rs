//! Per-day note mappings for discrete-note rendering.

use tickertone_spec::features::min_max_normalize;

use crate::error::{AudioError, AudioResult};

use super::nan_to_zero;

/// Pitch classes of the major scale, relative to C.
pub const MAJOR_SCALE_STEPS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Speed-mapped notes never drop below this (Hz).
pub const NOTE_FREQUENCY_FLOOR_HZ: f64 = 50.0;

/// Equal-tempered frequency of a MIDI note, A4 (69) = 440 Hz.
pub fn midi_to_frequency(midi: u8) -> f64 {
    440.0 * 2.0_f64.powf((midi as f64 - 69.0) / 12.0)
}

/// MIDI notes in `[midi_low, midi_high]` that belong to C major.
///
/// A range too narrow to contain any scale degree falls back to every note
/// in the range, so the result is only empty when `midi_low > midi_high`.
pub fn major_scale(midi_low: u8, midi_high: u8) -> Vec<u8> {
    let notes: Vec<u8> = (midi_low..=midi_high)
        .filter(|m| MAJOR_SCALE_STEPS.contains(&(m % 12)))
        .collect();
    if notes.is_empty() {
        (midi_low..=midi_high).collect()
    } else {
        notes
    }
}

/// Quantizes each trend value onto `scale` by its position in the series range.
///
/// A flat series maps every day to `scale[0]`.
pub fn trend_to_scale_notes(trend: &[f64], scale: &[u8]) -> AudioResult<Vec<u8>> {
    if trend.is_empty() {
        return Err(AudioError::invalid_input("trend", "must not be empty"));
    }
    if scale.is_empty() {
        return Err(AudioError::invalid_input("scale", "must contain at least one note"));
    }

    let trend: Vec<f64> = trend.iter().copied().map(nan_to_zero).collect();
    let top = (scale.len() - 1) as f64;
    Ok(min_max_normalize(&trend)
        .into_iter()
        .map(|norm| {
            let index = (norm * top).round() as usize;
            scale[index.min(scale.len() - 1)]
        })
        .collect())
}

/// Calm days ring longer: `min + (max - min) * (1 - clamp(speed_norm, 0, 1))`.
pub fn speed_norm_to_note_duration(speed_norm: f64, min_duration: f64, max_duration: f64) -> f64 {
    let inverse = 1.0 - nan_to_zero(speed_norm).clamp(0.0, 1.0);
    min_duration + (max_duration - min_duration) * inverse
}

/// Offsets `base_freq` by `speed_norm * range_freq` in the direction of `speed_sign`.
pub fn speed_to_note_frequency(
    speed_norm: f64,
    speed_sign: f64,
    base_freq: f64,
    range_freq: f64,
) -> f64 {
    let sign = nan_to_zero(speed_sign);
    if sign == 0.0 {
        return base_freq;
    }
    let delta = nan_to_zero(speed_norm) * range_freq * sign;
    (base_freq + delta).max(NOTE_FREQUENCY_FLOOR_HZ)
}
