//! Tests for the feature mapper.

use pretty_assertions::assert_eq;
use tickertone_spec::{
    AmplitudeMapping, BrightnessMapping, DailyFeatureRecord, FeatureTable, FrequencyMapping,
    RenderParams,
};

use super::*;
use crate::error::AudioError;

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{actual:?} != {expected:?}");
    }
}

// =========================================================================
// Frequency
// =========================================================================

#[test]
fn test_frequency_spans_base_range() {
    let freq = trend_speed_to_frequency(
        &[0.0, 0.5, 1.0],
        &[0.0, 0.0, 0.0],
        &[0.0, 0.0, 0.0],
        &FrequencyMapping::default(),
    )
    .unwrap();
    assert_close(&freq, &[200.0, 400.0, 600.0]);
}

#[test]
fn test_frequency_adds_signed_speed_delta() {
    let freq = trend_speed_to_frequency(
        &[0.0, 0.5, 1.0],
        &[0.0, 1.0, 0.5],
        &[0.0, 1.0, -1.0],
        &FrequencyMapping::default(),
    )
    .unwrap();
    assert_close(&freq, &[200.0, 440.0, 580.0]);
}

#[test]
fn test_flat_trend_maps_to_base_min() {
    let freq = trend_speed_to_frequency(
        &[4.2, 4.2, 4.2, 4.2],
        &[0.0, 0.5, 1.0, 0.25],
        &[0.0, 1.0, -1.0, 0.0],
        &FrequencyMapping::default(),
    )
    .unwrap();
    assert_close(&freq, &[200.0, 220.0, 160.0, 200.0]);
}

#[test]
fn test_frequency_is_clamped() {
    let mapping = FrequencyMapping {
        base_min: 50.0,
        base_max: 2000.0,
        delta_max: 40.0,
    };
    let freq = trend_speed_to_frequency(&[0.0, 1.0], &[1.0, 1.0], &[-1.0, 1.0], &mapping).unwrap();
    assert_eq!(freq, vec![MIN_CONTROL_FREQUENCY_HZ, MAX_CONTROL_FREQUENCY_HZ]);
}

#[test]
fn test_frequency_treats_nan_as_zero() {
    let freq = trend_speed_to_frequency(
        &[f64::NAN, 1.0],
        &[f64::NAN, 0.0],
        &[1.0, 0.0],
        &FrequencyMapping::default(),
    )
    .unwrap();
    assert_close(&freq, &[200.0, 600.0]);
}

// =========================================================================
// Amplitude and brightness
// =========================================================================

#[test]
fn test_amplitude_is_linear_and_clamped() {
    let amp = speed_norm_to_amplitude(&[0.0, 0.5, 1.0, -3.0, 7.0, f64::NAN], &AmplitudeMapping::default())
        .unwrap();
    assert_close(&amp, &[0.2, 0.5, 0.8, 0.2, 0.8, 0.2]);
}

#[test]
fn test_brightness_combines_speed_and_event() {
    let bright = speed_and_event_to_brightness(
        &[0.0, 1.0, 0.5, 1.0],
        &[false, true, false, false],
        &BrightnessMapping::default(),
    )
    .unwrap();
    assert_close(&bright, &[0.0, 1.0, 0.35, 0.7]);
}

#[test]
fn test_event_alone_is_audible() {
    let bright =
        speed_and_event_to_brightness(&[0.0], &[true], &BrightnessMapping::default()).unwrap();
    assert_close(&bright, &[0.5]);
}

// =========================================================================
// Input validation
// =========================================================================

#[test]
fn test_empty_inputs_rejected() {
    let err = speed_norm_to_amplitude(&[], &AmplitudeMapping::default()).unwrap_err();
    assert!(matches!(err, AudioError::InvalidInput { ref name, .. } if name == "speed_norm"));

    assert!(trend_speed_to_frequency(&[], &[], &[], &FrequencyMapping::default()).is_err());
    assert!(speed_and_event_to_brightness(&[], &[], &BrightnessMapping::default()).is_err());
}

#[test]
fn test_mismatched_lengths_rejected() {
    let err = trend_speed_to_frequency(&[0.0, 1.0], &[0.0], &[0.0, 0.0], &FrequencyMapping::default())
        .unwrap_err();
    assert!(matches!(err, AudioError::InvalidInput { ref name, .. } if name == "speed_norm"));

    let err = speed_and_event_to_brightness(&[0.0, 1.0], &[true], &BrightnessMapping::default())
        .unwrap_err();
    assert!(matches!(err, AudioError::InvalidInput { ref name, .. } if name == "event"));
}

#[test]
fn test_map_controls_from_table() {
    let table = FeatureTable::new(vec![
        DailyFeatureRecord::new(0.0, 0.0, 0.0, false),
        DailyFeatureRecord::new(0.5, 0.5, 1.0, true),
        DailyFeatureRecord::new(1.0, 0.5, 0.5, false),
    ]);
    let controls = map_controls(&table, &RenderParams::default()).unwrap();
    assert_eq!(controls.len(), 3);
    assert_close(&controls.frequency_hz, &[200.0, 440.0, 620.0]);
    assert_close(&controls.amplitude, &[0.2, 0.8, 0.5]);
    assert_close(&controls.brightness, &[0.0, 1.0, 0.35]);
}

// =========================================================================
// Note mappings
// =========================================================================

#[test]
fn test_midi_to_frequency() {
    assert!((midi_to_frequency(69) - 440.0).abs() < 1e-12);
    assert!((midi_to_frequency(81) - 880.0).abs() < 1e-9);
    assert!((midi_to_frequency(60) - 261.625_565).abs() < 1e-5);
}

#[test]
fn test_major_scale_default_range() {
    let scale = major_scale(60, 84);
    assert_eq!(
        scale,
        vec![60, 62, 64, 65, 67, 69, 71, 72, 74, 76, 77, 79, 81, 83, 84]
    );
}

#[test]
fn test_major_scale_falls_back_to_chromatic() {
    // C#..D# contains D only, F#..F# contains nothing
    assert_eq!(major_scale(61, 63), vec![62]);
    assert_eq!(major_scale(66, 66), vec![66]);
}

#[test]
fn test_trend_to_scale_notes() {
    let scale = major_scale(60, 84);
    let notes = trend_to_scale_notes(&[1.0, 1.5, 2.0], &scale).unwrap();
    assert_eq!(notes, vec![60, 72, 84]);

    let flat = trend_to_scale_notes(&[3.0, 3.0], &scale).unwrap();
    assert_eq!(flat, vec![60, 60]);

    assert!(trend_to_scale_notes(&[], &scale).is_err());
    assert!(trend_to_scale_notes(&[1.0], &[]).is_err());
}

#[test]
fn test_note_duration_is_inverse_to_speed() {
    assert!((speed_norm_to_note_duration(0.0, 0.12, 0.25) - 0.25).abs() < 1e-12);
    assert!((speed_norm_to_note_duration(1.0, 0.12, 0.25) - 0.12).abs() < 1e-12);
    assert!((speed_norm_to_note_duration(2.0, 0.12, 0.25) - 0.12).abs() < 1e-12);
}

#[test]
fn test_speed_to_note_frequency() {
    assert_eq!(speed_to_note_frequency(0.9, 0.0, 440.0, 220.0), 440.0);
    assert_eq!(speed_to_note_frequency(0.5, 1.0, 440.0, 220.0), 550.0);
    assert_eq!(speed_to_note_frequency(1.0, -1.0, 440.0, 220.0), 220.0);
    assert_eq!(
        speed_to_note_frequency(1.0, -1.0, 100.0, 220.0),
        NOTE_FREQUENCY_FLOOR_HZ
    );
}
