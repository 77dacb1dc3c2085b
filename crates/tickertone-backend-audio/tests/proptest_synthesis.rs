//! Property-based tests for the synthesis engine using proptest.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tickertone-backend-audio --test proptest_synthesis
//! ```

use std::f64::consts::TAU;

use proptest::prelude::*;

use tickertone_backend_audio::envelope::adsr;
use tickertone_backend_audio::interpolate::{build_time_axis, interpolate};
use tickertone_backend_audio::mapping::{
    speed_and_event_to_brightness, speed_norm_to_amplitude, trend_speed_to_frequency,
    MAX_CONTROL_FREQUENCY_HZ, MIN_CONTROL_FREQUENCY_HZ,
};
use tickertone_backend_audio::oscillator::{self, integrate_phase, num_samples_for};
use tickertone_spec::{
    AmplitudeMapping, BrightnessMapping, Envelope, Extrapolation, FrequencyMapping,
};

fn sign() -> impl Strategy<Value = f64> {
    prop_oneof![Just(-1.0), Just(0.0), Just(1.0)]
}

/// Daily (frequency, amplitude, brightness) triples.
fn daily_controls() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
    prop::collection::vec((20.0f64..2000.0, 0.0f64..=1.0, 0.0f64..=1.0), 2..12)
}

// ============================================================================
// Feature mapper ranges
// ============================================================================

proptest! {
    #[test]
    fn amplitude_stays_in_range(
        speed_norm in prop::collection::vec(-5.0f64..5.0, 1..64),
        lo in 0.0f64..0.5,
        width in 0.0f64..0.5,
    ) {
        let mapping = AmplitudeMapping { min_amp: lo, max_amp: lo + width };
        let amp = speed_norm_to_amplitude(&speed_norm, &mapping).unwrap();
        prop_assert_eq!(amp.len(), speed_norm.len());
        for a in amp {
            prop_assert!(a >= mapping.min_amp - 1e-12 && a <= mapping.max_amp + 1e-12);
        }
    }

    #[test]
    fn frequency_stays_in_range(
        rows in prop::collection::vec((-10.0f64..10.0, 0.0f64..=1.0, sign()), 1..64),
    ) {
        let trend: Vec<f64> = rows.iter().map(|r| r.0).collect();
        let speed_norm: Vec<f64> = rows.iter().map(|r| r.1).collect();
        let speed_sign: Vec<f64> = rows.iter().map(|r| r.2).collect();

        let freq = trend_speed_to_frequency(
            &trend, &speed_norm, &speed_sign, &FrequencyMapping::default(),
        ).unwrap();
        for f in freq {
            prop_assert!((MIN_CONTROL_FREQUENCY_HZ..=MAX_CONTROL_FREQUENCY_HZ).contains(&f));
        }
    }

    #[test]
    fn flat_trend_maps_to_base_min_plus_delta(
        level in -10.0f64..10.0,
        rows in prop::collection::vec((0.0f64..=1.0, sign()), 1..32),
    ) {
        let trend = vec![level; rows.len()];
        let speed_norm: Vec<f64> = rows.iter().map(|r| r.0).collect();
        let speed_sign: Vec<f64> = rows.iter().map(|r| r.1).collect();
        let mapping = FrequencyMapping::default();

        let freq = trend_speed_to_frequency(&trend, &speed_norm, &speed_sign, &mapping).unwrap();
        for ((f, sn), sg) in freq.iter().zip(&speed_norm).zip(&speed_sign) {
            let expected = mapping.base_min + sg * sn * mapping.delta_max;
            prop_assert!((f - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn brightness_stays_in_unit_range(
        rows in prop::collection::vec((-2.0f64..2.0, any::<bool>()), 1..64),
    ) {
        let speed_norm: Vec<f64> = rows.iter().map(|r| r.0).collect();
        let event: Vec<bool> = rows.iter().map(|r| r.1).collect();
        let bright = speed_and_event_to_brightness(
            &speed_norm, &event, &BrightnessMapping::default(),
        ).unwrap();
        for b in bright {
            prop_assert!((0.0..=1.0).contains(&b));
        }
    }
}

// ============================================================================
// Interpolation
// ============================================================================

proptest! {
    #[test]
    fn knots_round_trip_exactly(
        values in prop::collection::vec(-1000.0f64..1000.0, 2..40),
        duration in 0.1f64..600.0,
    ) {
        let axis = build_time_axis(values.len(), duration).unwrap();
        for policy in [Extrapolation::Linear, Extrapolation::Clamp] {
            let curve = interpolate(&axis, &values, policy).unwrap();
            for (&t, &v) in axis.knots().iter().zip(&values) {
                prop_assert_eq!(curve.eval(t), v);
            }
        }
    }

    #[test]
    fn interpolated_values_stay_within_daily_range(
        values in prop::collection::vec(-1000.0f64..1000.0, 2..40),
        frac in 0.0f64..=1.0,
    ) {
        let axis = build_time_axis(values.len(), 10.0).unwrap();
        let curve = interpolate(&axis, &values, Extrapolation::Linear).unwrap();
        let t = frac * 10.0;
        let v = curve.eval(t);
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
    }
}

// ============================================================================
// Oscillator
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn output_length_is_rounded_duration(
        duration in 0.001f64..0.5,
        sample_rate in prop_oneof![Just(8000u32), Just(11025), Just(22050), Just(44100)],
    ) {
        let axis = build_time_axis(2, duration).unwrap();
        let c = interpolate(&axis, &[440.0, 440.0], Extrapolation::Linear).unwrap();
        let samples = oscillator::render(&c, &c, &c, duration, sample_rate).unwrap();
        prop_assert_eq!(samples.len(), (sample_rate as f64 * duration).round() as usize);
        prop_assert_eq!(samples.len(), num_samples_for(duration, sample_rate));
    }

    #[test]
    fn output_never_exceeds_full_scale(
        days in daily_controls(),
        duration in 0.05f64..0.3,
    ) {
        let axis = build_time_axis(days.len(), duration).unwrap();
        let freq: Vec<f64> = days.iter().map(|d| d.0).collect();
        let amp: Vec<f64> = days.iter().map(|d| d.1).collect();
        let bright: Vec<f64> = days.iter().map(|d| d.2).collect();

        let f = interpolate(&axis, &freq, Extrapolation::Linear).unwrap();
        let a = interpolate(&axis, &amp, Extrapolation::Linear).unwrap();
        let b = interpolate(&axis, &bright, Extrapolation::Linear).unwrap();

        let samples = oscillator::render(&f, &a, &b, duration, 8000).unwrap();
        prop_assert!(oscillator::peak(&samples) <= 1.0);
    }

    #[test]
    fn phase_steps_never_exceed_max_frequency(
        freqs in prop::collection::vec(50.0f64..4000.0, 2..2000),
    ) {
        let phase = integrate_phase(&freqs, 8000);
        let max_freq = freqs.iter().copied().fold(0.0, f64::max);
        let max_step = TAU * max_freq / 8000.0;
        prop_assert_eq!(phase[0], 0.0);
        for w in phase.windows(2) {
            let step = w[1] - w[0];
            prop_assert!(step > 0.0);
            prop_assert!(step <= max_step + 1e-9);
        }
    }
}

// ============================================================================
// Envelope
// ============================================================================

proptest! {
    #[test]
    fn adsr_has_exact_length_and_closes(
        n in 0usize..5000,
        attack in 0.0f64..0.2,
        decay in 0.0f64..0.2,
        sustain in 0.0f64..=1.0,
        release in 0.001f64..0.3,
    ) {
        let envelope = Envelope { attack, decay, sustain, release };
        let gain = adsr(n, 8000, &envelope).unwrap();
        prop_assert_eq!(gain.len(), n);
        prop_assert!(gain.iter().all(|g| (0.0..=1.0).contains(g)));
        if n > 0 && attack > 0.0 {
            prop_assert_eq!(gain[0], 0.0);
        }
        if let Some(&last) = gain.last() {
            // a release that got at least one sample ends the note on silence
            let scaled_release = if attack + decay + release > n as f64 / 8000.0 {
                release * (n as f64 / 8000.0) / (attack + decay + release)
            } else {
                release
            };
            if scaled_release * 8000.0 >= 1.0 {
                prop_assert!(last.abs() < 1e-12);
            }
        }
    }
}
