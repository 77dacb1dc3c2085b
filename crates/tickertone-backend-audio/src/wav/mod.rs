//! Mono 16-bit PCM WAV output.
//!
//! Output is deterministic: no timestamps or metadata chunks, so identical
//! samples always produce identical bytes and the same PCM hash.

mod encode;
mod format;
mod result;
mod sink;


pub use encode::{encode_wav, quantize_pcm16, samples_to_pcm16, write_wav};
pub use format::{WavFormat, WAV_HEADER_LEN};
pub use result::WavResult;
pub use sink::{write_atomic, write_pcm16, write_pcm16_with, WriteMode};
