//! Tickertone spec library
//!
//! Types shared by every stage of the sonification pipeline: the daily
//! feature records the engine consumes, the text format they travel in, and
//! the render parameters that drive the synthesis backend.
//!
//! # Example
//!
//! ```
//! use tickertone_spec::{FeatureTable, RenderParams};
//!
//! let csv = "Trend,Speed,Speed_Norm,Event\n4.50,,0.0,0\n4.52,0.02,1.0,1\n";
//! let table = FeatureTable::from_csv_str(csv).unwrap();
//! assert_eq!(table.len(), 2);
//!
//! let params = RenderParams::default();
//! assert!(params.validate().is_ok());
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error type and the backend error reporting trait
//! - [`record`]: Daily feature records and the feature table
//! - [`table`]: Comma-separated reader and writer for feature tables
//! - [`params`]: Render and note parameters with defaults and validation
//! - [`features`]: Price series to feature table preprocessing

pub mod error;
pub mod features;
pub mod params;
pub mod record;
pub mod table;

// Re-export commonly used types at the crate root
pub use error::{BackendError, SpecError, SpecResult};
pub use features::{load_price_column, prepare_features, DEFAULT_EVENT_LIMIT, DEFAULT_TREND_WINDOW};
pub use params::{
    validate_timing, AmplitudeMapping, BrightnessMapping, Envelope, Extrapolation,
    FrequencyMapping, NoteParams, NotePitch, RenderParams, MAX_PCM16_MONO_SAMPLES,
};
pub use record::{DailyFeatureRecord, FeatureTable, MIN_DAYS_FOR_INTERPOLATION};
pub use table::REQUIRED_COLUMNS;
