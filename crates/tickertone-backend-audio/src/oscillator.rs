//! Phase-continuous oscillator with brightness-weighted harmonics.
//!
//! Instantaneous frequency is integrated into an unwrapped phase (a prefix
//! sum over the frequency track), so pitch can glide freely without clicks.
//! Each sample is the fundamental plus second and third harmonics whose
//! weights follow the brightness curve, divided by the total harmonic weight
//! so a bright timbre is not louder than a pure one.

use std::f64::consts::TAU;

use tickertone_spec::MAX_PCM16_MONO_SAMPLES;

use crate::error::{AudioError, AudioResult};
use crate::interpolate::ContinuousControl;

/// Instantaneous frequency floor (Hz).
pub const MIN_FREQUENCY_HZ: f64 = 50.0;

/// Second harmonic weight at full brightness.
pub const SECOND_HARMONIC_WEIGHT: f64 = 0.3;

/// Third harmonic weight at full brightness.
pub const THIRD_HARMONIC_WEIGHT: f64 = 0.15;

/// Number of samples in a render: `round(sample_rate * duration)`.
pub fn num_samples_for(duration_seconds: f64, sample_rate: u32) -> usize {
    (sample_rate as f64 * duration_seconds).round() as usize
}

/// Sample grid `t_k = k / sample_rate`.
pub fn sample_times(num_samples: usize, sample_rate: u32) -> Vec<f64> {
    let sr = sample_rate as f64;
    (0..num_samples).map(|k| k as f64 / sr).collect()
}

/// Unwrapped phase track for a frequency track.
///
/// `phase[0] = 0` and `phase[k] = 2π / sample_rate * Σ freq[1..=k]`.
/// Phase is never wrapped.
pub fn integrate_phase(frequencies: &[f64], sample_rate: u32) -> Vec<f64> {
    let step = TAU / sample_rate as f64;
    let increments = frequencies.iter().skip(1).scan(0.0, |cycles_hz, &f| {
        *cycles_hz += f;
        Some(*cycles_hz * step)
    });
    std::iter::once(0.0)
        .chain(increments)
        .take(frequencies.len())
        .collect()
}

/// `sin(p) + second * sin(2p) + third * sin(3p)`.
#[inline]
pub fn harmonic_stack(phase: f64, second: f64, third: f64) -> f64 {
    phase.sin() + second * (2.0 * phase).sin() + third * (3.0 * phase).sin()
}

/// One timbre sample at `brightness`, normalized by the summed harmonic weight.
#[inline]
pub fn timbre_sample(phase: f64, brightness: f64) -> f64 {
    let second = SECOND_HARMONIC_WEIGHT * brightness;
    let third = THIRD_HARMONIC_WEIGHT * brightness;
    harmonic_stack(phase, second, third) / (1.0 + second + third)
}

/// Largest absolute sample value, 0 for an empty buffer.
pub fn peak(samples: &[f64]) -> f64 {
    samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max)
}

/// Scales the buffer down to a peak of 1.0 if it exceeds it.
///
/// Returns the divisor when the buffer was rescaled. Buffers already within
/// `[-1, 1]` are left untouched.
pub fn normalize_peak(samples: &mut [f64]) -> Option<f64> {
    let current = peak(samples);
    if current <= 1.0 {
        return None;
    }
    tracing::warn!(peak = current, "output exceeded full scale, normalizing");
    for sample in samples.iter_mut() {
        *sample /= current;
    }
    Some(current)
}

/// Audio-rate control tracks for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlFrames {
    /// Instantaneous frequency after the 50 Hz floor.
    pub frequency: Vec<f64>,
    /// Amplitude.
    pub amplitude: Vec<f64>,
    /// Brightness.
    pub brightness: Vec<f64>,
}

impl ControlFrames {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    /// Returns true if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }
}

/// Evaluates the three curves on the sample grid of a render.
pub fn sample_controls(
    frequency: &ContinuousControl<'_>,
    amplitude: &ContinuousControl<'_>,
    brightness: &ContinuousControl<'_>,
    duration_seconds: f64,
    sample_rate: u32,
) -> AudioResult<ControlFrames> {
    validate_render_timing(duration_seconds, sample_rate)?;

    let times = sample_times(num_samples_for(duration_seconds, sample_rate), sample_rate);
    let frequency = times
        .iter()
        .map(|&t| frequency.eval(t).max(MIN_FREQUENCY_HZ))
        .collect();

    Ok(ControlFrames {
        frequency,
        amplitude: amplitude.sample(&times),
        brightness: brightness.sample(&times),
    })
}

/// Turns control tracks into a waveform, peak-normalized into `[-1, 1]`.
pub fn synthesize(frames: &ControlFrames, sample_rate: u32) -> Vec<f64> {
    let phase = integrate_phase(&frames.frequency, sample_rate);
    let mut samples: Vec<f64> = phase
        .iter()
        .zip(&frames.brightness)
        .zip(&frames.amplitude)
        .map(|((&p, &b), &a)| a * timbre_sample(p, b))
        .collect();
    normalize_peak(&mut samples);
    samples
}

/// Renders `duration_seconds` of audio from three control curves.
///
/// The output holds exactly `round(sample_rate * duration_seconds)` samples.
///
/// # Errors
/// - [`AudioError::InvalidDuration`] for a non-finite or non-positive duration
/// - [`AudioError::InvalidSampleRate`] for a zero sample rate
pub fn render(
    frequency: &ContinuousControl<'_>,
    amplitude: &ContinuousControl<'_>,
    brightness: &ContinuousControl<'_>,
    duration_seconds: f64,
    sample_rate: u32,
) -> AudioResult<Vec<f64>> {
    let frames = sample_controls(frequency, amplitude, brightness, duration_seconds, sample_rate)?;
    let samples = synthesize(&frames, sample_rate);
    tracing::debug!(
        samples = samples.len(),
        sample_rate,
        peak = peak(&samples),
        "oscillator render complete"
    );
    Ok(samples)
}

pub(crate) fn validate_render_timing(duration_seconds: f64, sample_rate: u32) -> AudioResult<()> {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return Err(AudioError::InvalidDuration {
            duration: duration_seconds,
        });
    }
    if sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate { rate: sample_rate });
    }
    let samples = (duration_seconds * sample_rate as f64).round();
    if samples > MAX_PCM16_MONO_SAMPLES as f64 {
        return Err(AudioError::invalid_input(
            "duration_seconds",
            format!(
                "{} s at {} Hz needs {} samples, more than a 16-bit mono WAV holds",
                duration_seconds, sample_rate, samples
            ),
        ));
    }
    Ok(())
}
