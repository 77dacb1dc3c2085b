//! Tickertone Audio Backend
//!
//! Turns a table of daily market features into sound. Trend and momentum
//! become pitch, volatility becomes loudness and timbre brightness, and
//! anomalous days become audible brightness spikes.
//!
//! # Pipeline
//!
//! daily features → [`mapping`] → daily controls → [`interpolate`] →
//! continuous control curves → [`oscillator`] → waveform → [`wav`] → file
//!
//! A secondary [`note`] mode renders one enveloped note per day instead of a
//! continuous glide.
//!
//! # Determinism
//!
//! Rendering is a pure function of the feature table and the parameters.
//! The PCM hash reported for every written file is a BLAKE3 digest of the
//! sample data, so two renders can be compared without diffing audio.
//!
//! # Example
//!
//! ```
//! use tickertone_backend_audio::render_waveform;
//! use tickertone_spec::{DailyFeatureRecord, FeatureTable, RenderParams};
//!
//! let table = FeatureTable::new(vec![
//!     DailyFeatureRecord::new(4.50, 0.00, 0.0, false),
//!     DailyFeatureRecord::new(4.52, 0.02, 1.0, true),
//! ]);
//! let params = RenderParams {
//!     duration_seconds: 1.0,
//!     sample_rate: 8000,
//!     ..Default::default()
//! };
//!
//! let wave = render_waveform(&table, &params).unwrap();
//! assert_eq!(wave.samples.len(), 8000);
//! assert!(wave.peak() <= 1.0);
//! ```
//!
//! # Crate Structure
//!
//! - [`render`] - Orchestration from feature table to waveform or file
//! - [`mapping`] - Daily feature to control value mappings
//! - [`interpolate`] - Time axis and piecewise-linear control curves
//! - [`oscillator`] - Phase-continuous oscillator with harmonic blending
//! - [`envelope`] - Fixed-length ADSR gain curves
//! - [`note`] - Discrete-note rendering
//! - [`wav`] - Deterministic WAV writer and file sink

pub mod envelope;
pub mod error;
pub mod interpolate;
pub mod mapping;
pub mod note;
pub mod oscillator;
pub mod render;
pub mod wav;

// Re-export main types at crate root
pub use error::{AudioError, AudioResult};
pub use render::{
    daily_controls, render_controls, render_notes_to_file, render_to_file, render_waveform,
    RenderResult, Waveform,
};
pub use wav::{write_pcm16, WavResult, WriteMode};
