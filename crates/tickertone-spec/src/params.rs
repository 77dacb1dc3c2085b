//! Render parameters for continuous and discrete-note sonification.
//!
//! Every field has a default, so an empty JSON object is a valid config:
//!
//! ```
//! use tickertone_spec::RenderParams;
//!
//! let params = RenderParams::from_json_str("{}").unwrap();
//! assert_eq!(params.sample_rate, 44100);
//! assert_eq!(params.duration_seconds, 180.0);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};

/// How a control curve behaves for query times outside the daily axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolation {
    /// Extend the slope of the nearest segment.
    #[default]
    Linear,
    /// Hold the first or last daily value.
    Clamp,
}

/// Trend/speed to pitch mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrequencyMapping {
    /// Base frequency for the lowest trend value (Hz).
    pub base_min: f64,
    /// Base frequency for the highest trend value (Hz).
    pub base_max: f64,
    /// Largest signed offset contributed by speed (Hz).
    pub delta_max: f64,
}

impl Default for FrequencyMapping {
    fn default() -> Self {
        Self {
            base_min: 200.0,
            base_max: 600.0,
            delta_max: 40.0,
        }
    }
}

/// Normalized speed to loudness mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AmplitudeMapping {
    /// Amplitude at zero speed.
    pub min_amp: f64,
    /// Amplitude at full speed.
    pub max_amp: f64,
}

impl Default for AmplitudeMapping {
    fn default() -> Self {
        Self {
            min_amp: 0.2,
            max_amp: 0.8,
        }
    }
}

/// Speed and event to timbre brightness mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrightnessMapping {
    /// Weight applied to normalized speed.
    pub base_weight: f64,
    /// Brightness added on event days.
    pub event_boost: f64,
}

impl Default for BrightnessMapping {
    fn default() -> Self {
        Self {
            base_weight: 0.7,
            event_boost: 0.5,
        }
    }
}

/// Parameters for a continuous render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderParams {
    /// Total output duration in seconds.
    pub duration_seconds: f64,
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Pitch mapping.
    pub frequency: FrequencyMapping,
    /// Loudness mapping.
    pub amplitude: AmplitudeMapping,
    /// Timbre mapping.
    pub brightness: BrightnessMapping,
    /// Out-of-range policy shared by all three control curves.
    pub extrapolation: Extrapolation,
    /// Write output through a temporary file and rename on success.
    pub atomic_write: bool,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            duration_seconds: 180.0,
            sample_rate: 44100,
            frequency: FrequencyMapping::default(),
            amplitude: AmplitudeMapping::default(),
            brightness: BrightnessMapping::default(),
            extrapolation: Extrapolation::Linear,
            atomic_write: true,
        }
    }
}

impl RenderParams {
    /// Parses parameters from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> SpecResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads parameters from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> SpecResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    /// [`SpecError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> SpecResult<()> {
        validate_timing(self.duration_seconds, self.sample_rate)?;

        let f = &self.frequency;
        for (name, value) in [
            ("frequency.base_min", f.base_min),
            ("frequency.base_max", f.base_max),
            ("frequency.delta_max", f.delta_max),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SpecError::invalid_input(
                    name,
                    format!("must be a finite, non-negative frequency, got {}", value),
                ));
            }
        }
        if f.base_min > f.base_max {
            return Err(SpecError::invalid_input(
                "frequency.base_min",
                format!("must be <= base_max ({} > {})", f.base_min, f.base_max),
            ));
        }

        validate_unit_range(
            "amplitude.min_amp",
            "amplitude.max_amp",
            self.amplitude.min_amp,
            self.amplitude.max_amp,
        )?;

        let b = &self.brightness;
        for (name, value) in [
            ("brightness.base_weight", b.base_weight),
            ("brightness.event_boost", b.event_boost),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SpecError::invalid_input(
                    name,
                    format!("must be finite and non-negative, got {}", value),
                ));
            }
        }

        Ok(())
    }
}

/// ADSR envelope stage times (seconds) and sustain level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Envelope {
    /// Attack time in seconds.
    pub attack: f64,
    /// Decay time in seconds.
    pub decay: f64,
    /// Sustain level (0.0 to 1.0).
    pub sustain: f64,
    /// Release time in seconds.
    pub release: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            attack: 0.01,
            decay: 0.04,
            sustain: 0.85,
            release: 0.06,
        }
    }
}

impl Envelope {
    /// Checks stage times are non-negative and sustain lies in [0, 1].
    pub fn validate(&self) -> SpecResult<()> {
        for (name, value) in [
            ("envelope.attack", self.attack),
            ("envelope.decay", self.decay),
            ("envelope.release", self.release),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SpecError::invalid_input(
                    name,
                    format!("must be a finite, non-negative time, got {}", value),
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.sustain) {
            return Err(SpecError::invalid_input(
                "envelope.sustain",
                format!("must be in [0, 1], got {}", self.sustain),
            ));
        }
        Ok(())
    }
}

/// Where each discrete note takes its pitch from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotePitch {
    /// Trend quantized onto a major scale between two MIDI notes.
    Scale {
        /// Lowest MIDI note (inclusive).
        midi_low: u8,
        /// Highest MIDI note (inclusive).
        midi_high: u8,
    },
    /// Signed speed offset around a base frequency.
    Speed {
        /// Frequency for a flat day (Hz).
        base_freq: f64,
        /// Largest offset up or down (Hz).
        range_freq: f64,
    },
}

impl Default for NotePitch {
    fn default() -> Self {
        NotePitch::Scale {
            midi_low: 60,
            midi_high: 84,
        }
    }
}

/// Parameters for a discrete-note render: one note per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoteParams {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Pitch source.
    pub pitch: NotePitch,
    /// Note amplitude at zero speed.
    pub min_amp: f64,
    /// Note amplitude at full speed.
    pub max_amp: f64,
    /// Note length at full speed (seconds).
    pub min_duration: f64,
    /// Note length at zero speed (seconds).
    pub max_duration: f64,
    /// Per-note envelope.
    pub envelope: Envelope,
    /// Write output through a temporary file and rename on success.
    pub atomic_write: bool,
}

impl Default for NoteParams {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            pitch: NotePitch::default(),
            min_amp: 0.08,
            max_amp: 0.55,
            min_duration: 0.12,
            max_duration: 0.25,
            envelope: Envelope::default(),
            atomic_write: true,
        }
    }
}

impl NoteParams {
    /// Parses parameters from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> SpecResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads parameters from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> SpecResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Checks that every parameter is usable.
    pub fn validate(&self) -> SpecResult<()> {
        if self.sample_rate == 0 {
            return Err(SpecError::invalid_input("sample_rate", "must be > 0"));
        }
        match self.pitch {
            NotePitch::Scale {
                midi_low,
                midi_high,
            } => {
                if midi_low > midi_high || midi_high > 127 {
                    return Err(SpecError::invalid_input(
                        "pitch",
                        format!(
                            "MIDI range must satisfy low <= high <= 127, got {}..={}",
                            midi_low, midi_high
                        ),
                    ));
                }
            }
            NotePitch::Speed {
                base_freq,
                range_freq,
            } => {
                if !(base_freq.is_finite() && base_freq > 0.0 && range_freq.is_finite()) {
                    return Err(SpecError::invalid_input(
                        "pitch",
                        format!(
                            "base_freq must be > 0 and range finite, got {} / {}",
                            base_freq, range_freq
                        ),
                    ));
                }
            }
        }
        validate_unit_range("min_amp", "max_amp", self.min_amp, self.max_amp)?;
        if !(self.min_duration.is_finite()
            && self.min_duration > 0.0
            && self.max_duration.is_finite()
            && self.min_duration <= self.max_duration)
        {
            return Err(SpecError::invalid_input(
                "min_duration",
                format!(
                    "durations must satisfy 0 < min <= max, got {} / {}",
                    self.min_duration, self.max_duration
                ),
            ));
        }
        validate_timing(self.max_duration, self.sample_rate)?;
        self.envelope.validate()
    }
}

/// Most samples a mono 16-bit WAV can hold (the RIFF size field is 32 bits).
pub const MAX_PCM16_MONO_SAMPLES: usize = ((u32::MAX - 36) / 2) as usize;

/// Checks a duration / sample-rate pair.
///
/// The implied sample count `round(duration_seconds * sample_rate)` must fit
/// in a mono 16-bit WAV.
pub fn validate_timing(duration_seconds: f64, sample_rate: u32) -> SpecResult<()> {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return Err(SpecError::invalid_input(
            "duration_seconds",
            format!("must be a finite value > 0, got {}", duration_seconds),
        ));
    }
    if sample_rate == 0 {
        return Err(SpecError::invalid_input("sample_rate", "must be > 0"));
    }
    let samples = (duration_seconds * sample_rate as f64).round();
    if samples > MAX_PCM16_MONO_SAMPLES as f64 {
        return Err(SpecError::invalid_input(
            "duration_seconds",
            format!(
                "{} s at {} Hz needs {} samples, a 16-bit mono WAV holds at most {}",
                duration_seconds, sample_rate, samples, MAX_PCM16_MONO_SAMPLES
            ),
        ));
    }
    Ok(())
}

fn validate_unit_range(min_name: &str, max_name: &str, min: f64, max: f64) -> SpecResult<()> {
    for (name, value) in [(min_name, min), (max_name, max)] {
        if !(0.0..=1.0).contains(&value) {
            return Err(SpecError::invalid_input(
                name,
                format!("must be in [0, 1], got {}", value),
            ));
        }
    }
    if min > max {
        return Err(SpecError::invalid_input(
            min_name,
            format!("must be <= {} ({} > {})", max_name, min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_defaults() {
        let params = RenderParams::default();
        assert_eq!(params.duration_seconds, 180.0);
        assert_eq!(params.sample_rate, 44100);
        assert_eq!(params.frequency.base_min, 200.0);
        assert_eq!(params.frequency.base_max, 600.0);
        assert_eq!(params.frequency.delta_max, 40.0);
        assert_eq!(params.amplitude.min_amp, 0.2);
        assert_eq!(params.amplitude.max_amp, 0.8);
        assert_eq!(params.brightness.base_weight, 0.7);
        assert_eq!(params.brightness.event_boost, 0.5);
        assert_eq!(params.extrapolation, Extrapolation::Linear);
        assert!(params.atomic_write);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let params = RenderParams::from_json_str(
            r#"{"duration_seconds": 3.0, "frequency": {"delta_max": 10.0}, "extrapolation": "clamp"}"#,
        )
        .unwrap();
        assert_eq!(params.duration_seconds, 3.0);
        assert_eq!(params.frequency.delta_max, 10.0);
        assert_eq!(params.frequency.base_min, 200.0);
        assert_eq!(params.extrapolation, Extrapolation::Clamp);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RenderParams::from_json_str(r#"{"sample_rte": 8000}"#).unwrap_err();
        assert!(matches!(err, SpecError::Json(_)));
    }

    #[test]
    fn test_serde_round_trip() {
        let params = RenderParams {
            duration_seconds: 12.5,
            sample_rate: 22050,
            ..Default::default()
        };
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(RenderParams::from_json_str(&json).unwrap(), params);
    }

    #[test]
    fn test_validate_rejects_bad_timing() {
        let mut params = RenderParams {
            duration_seconds: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SpecError::InvalidInput { ref name, .. }) if name == "duration_seconds"
        ));

        params.duration_seconds = f64::NAN;
        assert!(params.validate().is_err());

        params.duration_seconds = 1.0;
        params.sample_rate = 0;
        assert!(matches!(
            params.validate(),
            Err(SpecError::InvalidInput { ref name, .. }) if name == "sample_rate"
        ));
    }

    #[test]
    fn test_validate_rejects_durations_too_long_for_wav() {
        let mut params = RenderParams {
            duration_seconds: 1e300,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SpecError::InvalidInput { ref name, .. }) if name == "duration_seconds"
        ));

        // One sample past the limit, at 1 Hz.
        params.sample_rate = 1;
        params.duration_seconds = (MAX_PCM16_MONO_SAMPLES + 1) as f64;
        assert!(params.validate().is_err());
        params.duration_seconds = MAX_PCM16_MONO_SAMPLES as f64;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_ranges() {
        let mut params = RenderParams::default();
        params.amplitude.min_amp = 0.9;
        assert!(params.validate().is_err());

        let mut params = RenderParams::default();
        params.amplitude.max_amp = 1.5;
        assert!(params.validate().is_err());

        let mut params = RenderParams::default();
        params.frequency.base_min = 700.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_note_defaults() {
        let params = NoteParams::default();
        assert_eq!(
            params.pitch,
            NotePitch::Scale {
                midi_low: 60,
                midi_high: 84
            }
        );
        assert_eq!(params.envelope.sustain, 0.85);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_note_pitch_json() {
        let params = NoteParams::from_json_str(
            r#"{"pitch": {"kind": "speed", "base_freq": 440.0, "range_freq": 220.0}}"#,
        )
        .unwrap();
        assert_eq!(
            params.pitch,
            NotePitch::Speed {
                base_freq: 440.0,
                range_freq: 220.0
            }
        );
    }

    #[test]
    fn test_note_validate() {
        let mut params = NoteParams {
            pitch: NotePitch::Scale {
                midi_low: 90,
                midi_high: 60,
            },
            ..Default::default()
        };
        assert!(params.validate().is_err());

        params.pitch = NotePitch::default();
        params.envelope.sustain = 1.2;
        assert!(params.validate().is_err());

        params.envelope.sustain = 0.5;
        params.min_duration = 0.0;
        assert!(params.validate().is_err());

        params.min_duration = 0.1;
        params.max_duration = 1e300;
        assert!(params.validate().is_err());
    }
}
