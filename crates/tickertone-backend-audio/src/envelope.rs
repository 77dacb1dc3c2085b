//! Fixed-length ADSR gain curves for discrete notes.
//!
//! Unlike a gate-driven envelope, the note length is known up front: the
//! curve always has exactly `n` samples, and the stage times shrink
//! proportionally when they do not fit in the note.

use tickertone_spec::Envelope;

use crate::error::{AudioError, AudioResult};

/// Sample counts of the four envelope stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageLengths {
    /// Attack samples (0 to 1).
    pub attack: usize,
    /// Decay samples (1 to sustain).
    pub decay: usize,
    /// Sustain samples.
    pub sustain: usize,
    /// Release samples (sustain to 0).
    pub release: usize,
}

impl StageLengths {
    /// Computes stage lengths for an `n_samples` note.
    ///
    /// When `attack + decay + release` exceeds the note duration, all three
    /// are scaled by the same factor. Sustain takes whatever remains. A
    /// non-zero attack never rounds down to zero samples.
    pub fn for_note(n_samples: usize, sample_rate: u32, envelope: &Envelope) -> Self {
        let sr = sample_rate as f64;
        let note_seconds = n_samples as f64 / sr;

        let (mut attack, mut decay, mut release) = (
            envelope.attack.max(0.0),
            envelope.decay.max(0.0),
            envelope.release.max(0.0),
        );
        let stages = attack + decay + release;
        if stages > note_seconds {
            let factor = note_seconds / stages;
            attack *= factor;
            decay *= factor;
            release *= factor;
        }

        let mut attack = (attack * sr) as usize;
        let mut decay = (decay * sr) as usize;
        let mut release = (release * sr) as usize;

        // A non-zero attack keeps its first sample so the note starts on 0.
        if envelope.attack > 0.0 && n_samples > 0 && attack == 0 {
            attack = 1;
            if attack + decay + release > n_samples {
                if decay > 0 {
                    decay -= 1;
                } else {
                    release = release.saturating_sub(1);
                }
            }
        }
        let sustain = n_samples.saturating_sub(attack + decay + release);

        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }
}

/// Builds an ADSR gain curve of exactly `n_samples` samples.
///
/// Stages in order: linear 0 to 1 over attack, linear 1 to `sustain` over
/// decay, constant `sustain`, then linear `sustain` to 0 over release. The
/// release ramp ends on an exact 0. If rounding leaves fewer samples than the
/// stages need, the release is cut short.
///
/// # Errors
/// - [`AudioError::InvalidSampleRate`] for a zero sample rate
/// - [`AudioError::Spec`] if the envelope itself is invalid
pub fn adsr(n_samples: usize, sample_rate: u32, envelope: &Envelope) -> AudioResult<Vec<f64>> {
    if sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate { rate: sample_rate });
    }
    envelope.validate()?;

    let stages = StageLengths::for_note(n_samples, sample_rate, envelope);
    let sustain = envelope.sustain;
    let mut gain = Vec::with_capacity(n_samples);

    gain.extend((0..stages.attack).map(|i| i as f64 / stages.attack as f64));
    gain.extend((0..stages.decay).map(|i| 1.0 + (sustain - 1.0) * i as f64 / stages.decay as f64));
    gain.extend(std::iter::repeat_n(sustain, stages.sustain));
    gain.truncate(n_samples);

    let release_len = n_samples - gain.len();
    if stages.release > 0 && release_len > 0 {
        let span = release_len.saturating_sub(1).max(1) as f64;
        gain.extend((0..release_len).map(|i| sustain * (1.0 - i as f64 / span)));
        if let Some(last) = gain.last_mut() {
            *last = 0.0;
        }
    } else {
        gain.extend(std::iter::repeat_n(sustain, release_len));
    }

    Ok(gain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn env(attack: f64, decay: f64, sustain: f64, release: f64) -> Envelope {
        Envelope {
            attack,
            decay,
            sustain,
            release,
        }
    }

    #[test]
    fn test_stage_lengths_fit_without_scaling() {
        let stages = StageLengths::for_note(1000, 1000, &env(0.1, 0.2, 0.5, 0.3));
        assert_eq!(
            stages,
            StageLengths {
                attack: 100,
                decay: 200,
                sustain: 400,
                release: 300,
            }
        );
    }

    #[test]
    fn test_stage_lengths_scaled_when_note_is_short() {
        // 0.6s of stages squeezed into 0.3s: every stage halves.
        let stages = StageLengths::for_note(300, 1000, &env(0.1, 0.2, 0.5, 0.3));
        assert!(stages.attack.abs_diff(50) <= 1);
        assert!(stages.decay.abs_diff(100) <= 1);
        assert!(stages.release.abs_diff(150) <= 1);
        assert!(stages.attack + stages.decay + stages.release <= 300);
    }

    #[test]
    fn test_adsr_shape() {
        let gain = adsr(10, 10, &env(0.2, 0.2, 0.5, 0.3)).unwrap();
        assert_eq!(gain.len(), 10);
        // attack
        assert_eq!(&gain[0..2], &[0.0, 0.5]);
        // decay
        assert_eq!(&gain[2..4], &[1.0, 0.75]);
        // sustain
        assert_eq!(&gain[4..7], &[0.5, 0.5, 0.5]);
        // release
        assert_eq!(&gain[7..], &[0.5, 0.25, 0.0]);
    }

    #[test]
    fn test_adsr_exact_length_when_scaled() {
        let envelope = env(0.01, 0.04, 0.85, 0.06);
        for n in [0usize, 1, 2, 7, 50, 441, 4410] {
            let gain = adsr(n, 44100, &envelope).unwrap();
            assert_eq!(gain.len(), n);
            if n > 1 {
                assert!(gain[n - 1].abs() < 1e-12);
            }
            if n > 0 {
                assert_eq!(gain[0], 0.0);
            }
            assert!(gain.iter().all(|g| (0.0..=1.0).contains(g)));
        }
    }

    #[test]
    fn test_adsr_short_note_starts_silent() {
        let gain = adsr(7, 44100, &Envelope::default()).unwrap();
        assert_eq!(gain.len(), 7);
        assert_eq!(gain[0], 0.0);
        assert_eq!(gain[6], 0.0);

        let stages = StageLengths::for_note(1, 44100, &Envelope::default());
        assert_eq!(stages.attack, 1);
        assert_eq!(adsr(1, 44100, &Envelope::default()).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_adsr_without_release_holds_sustain() {
        let gain = adsr(8, 8, &env(0.0, 0.0, 0.6, 0.0)).unwrap();
        assert_eq!(gain, vec![0.6; 8]);
    }

    #[test]
    fn test_adsr_rejects_bad_input() {
        assert!(matches!(
            adsr(10, 0, &Envelope::default()),
            Err(AudioError::InvalidSampleRate { rate: 0 })
        ));
        assert!(matches!(
            adsr(10, 100, &env(0.1, 0.1, 1.5, 0.1)),
            Err(AudioError::Spec(_))
        ));
    }
}
