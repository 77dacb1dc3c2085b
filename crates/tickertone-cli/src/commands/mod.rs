//! CLI command implementations.

pub mod params;
pub mod prepare;
pub mod render;

use tickertone_backend_audio::AudioError;
use tickertone_spec::{BackendError, SpecError};

/// Stable error code of the library error behind `err`, if there is one.
pub fn error_code(err: &anyhow::Error) -> Option<&'static str> {
    if let Some(e) = err.downcast_ref::<AudioError>() {
        return Some(e.code());
    }
    err.downcast_ref::<SpecError>().map(|e| e.code())
}
