//! Float to 16-bit PCM quantization and in-memory WAV encoding.

use std::io::{self, Write};

use super::format::{WavFormat, WAV_HEADER_LEN};

/// Quantizes one sample: `round(clamp(x, -1, 1) * 32767)`. NaN becomes 0.
#[inline]
pub fn quantize_pcm16(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16
}

/// Converts samples to little-endian 16-bit PCM bytes.
pub fn samples_to_pcm16(samples: &[f64]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|&s| quantize_pcm16(s).to_le_bytes())
        .collect()
}

/// Writes a complete WAV stream: header followed by `pcm_data`.
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    let data_len = u32::try_from(pcm_data.len()).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, "PCM data too large for a WAV file")
    })?;
    format.write_header(writer, data_len)?;
    writer.write_all(pcm_data)
}

/// Encodes a complete WAV file into memory.
pub fn encode_wav(format: &WavFormat, pcm_data: &[u8]) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(WAV_HEADER_LEN + pcm_data.len());
    write_wav(&mut buffer, format, pcm_data)?;
    Ok(buffer)
}
