//! Discrete-note rendering: one enveloped note per trading day.

use tickertone_spec::{Envelope, FeatureTable, NoteParams, NotePitch, MAX_PCM16_MONO_SAMPLES};

use crate::envelope::adsr;
use crate::error::{AudioError, AudioResult};
use crate::mapping::{
    major_scale, midi_to_frequency, scale_unit, speed_norm_to_note_duration,
    speed_to_note_frequency, trend_to_scale_notes,
};
use crate::oscillator::{harmonic_stack, integrate_phase, normalize_peak};
use crate::render::Waveform;

/// Second harmonic weight of a note.
pub const NOTE_SECOND_HARMONIC: f64 = 0.35;

/// Third harmonic weight of a note.
pub const NOTE_THIRD_HARMONIC: f64 = 0.12;

/// Pitch, loudness and length of one day's note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    /// Frequency in Hz.
    pub frequency: f64,
    /// Peak amplitude before the envelope.
    pub amplitude: f64,
    /// Length in seconds.
    pub duration: f64,
}

/// Number of samples in a note: `floor(sample_rate * duration)`.
pub fn note_samples(duration_seconds: f64, sample_rate: u32) -> usize {
    (sample_rate as f64 * duration_seconds).max(0.0) as usize
}

/// Renders one note with the fixed harmonic blend and an ADSR envelope.
pub fn render_note(
    frequency: f64,
    amplitude: f64,
    duration_seconds: f64,
    sample_rate: u32,
    envelope: &Envelope,
) -> AudioResult<Vec<f64>> {
    if !duration_seconds.is_finite() || duration_seconds < 0.0 {
        return Err(AudioError::InvalidDuration {
            duration: duration_seconds,
        });
    }
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(AudioError::invalid_input(
            "frequency",
            format!("must be a finite value > 0, got {}", frequency),
        ));
    }

    let n = note_samples(duration_seconds, sample_rate);
    let gain = adsr(n, sample_rate, envelope)?;
    let phase = integrate_phase(&vec![frequency; n], sample_rate);

    Ok(phase
        .iter()
        .zip(&gain)
        .map(|(&p, &g)| amplitude * g * harmonic_stack(p, NOTE_SECOND_HARMONIC, NOTE_THIRD_HARMONIC))
        .collect())
}

/// Derives one note per day from the feature table.
pub fn note_events(table: &FeatureTable, params: &NoteParams) -> AudioResult<Vec<NoteEvent>> {
    if table.is_empty() {
        return Err(AudioError::invalid_input("features", "need at least one day"));
    }
    params.validate()?;

    let speed_norm = table.speed_norms();
    let frequencies: Vec<f64> = match params.pitch {
        NotePitch::Scale {
            midi_low,
            midi_high,
        } => trend_to_scale_notes(&table.trends(), &major_scale(midi_low, midi_high))?
            .into_iter()
            .map(midi_to_frequency)
            .collect(),
        NotePitch::Speed {
            base_freq,
            range_freq,
        } => speed_norm
            .iter()
            .zip(table.speed_signs())
            .map(|(&sn, sign)| speed_to_note_frequency(sn, sign, base_freq, range_freq))
            .collect(),
    };

    Ok(frequencies
        .into_iter()
        .zip(&speed_norm)
        .map(|(frequency, &sn)| NoteEvent {
            frequency,
            amplitude: scale_unit(sn, params.min_amp, params.max_amp),
            duration: speed_norm_to_note_duration(sn, params.min_duration, params.max_duration),
        })
        .collect())
}

/// Renders every day's note back to back, then peak-normalizes.
pub fn render_note_sequence(table: &FeatureTable, params: &NoteParams) -> AudioResult<Waveform> {
    let events = note_events(table, params)?;

    let total = events
        .iter()
        .map(|e| note_samples(e.duration, params.sample_rate))
        .fold(0usize, usize::saturating_add);
    if total > MAX_PCM16_MONO_SAMPLES {
        return Err(AudioError::invalid_input(
            "features",
            format!(
                "{} notes need {} samples, more than a 16-bit mono WAV holds",
                events.len(),
                total
            ),
        ));
    }

    let mut samples = Vec::with_capacity(total);
    for event in &events {
        samples.extend(render_note(
            event.frequency,
            event.amplitude,
            event.duration,
            params.sample_rate,
            &params.envelope,
        )?);
    }
    normalize_peak(&mut samples);

    tracing::debug!(notes = events.len(), samples = samples.len(), "rendered note sequence");
    Ok(Waveform::new(samples, params.sample_rate))
}
