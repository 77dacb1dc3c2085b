//! Canonical 44-byte RIFF/WAVE header for 16-bit PCM.

use std::io::{self, Write};

/// Size of the header written before the sample data.
pub const WAV_HEADER_LEN: usize = 44;

/// PCM stream layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of channels (always 1 for sonification output).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample (always 16).
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// Mono 16-bit PCM at `sample_rate`.
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
        }
    }

    /// Bytes per sample frame.
    pub fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    /// Bytes per second of audio.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    /// Writes the RIFF, fmt and data chunk headers for `data_len` bytes of PCM.
    pub fn write_header<W: Write>(&self, writer: &mut W, data_len: u32) -> io::Result<()> {
        let riff_len = data_len.checked_add(36).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "PCM data too large for a WAV file")
        })?;

        writer.write_all(b"RIFF")?;
        writer.write_all(&riff_len.to_le_bytes())?;
        writer.write_all(b"WAVE")?;

        writer.write_all(b"fmt ")?;
        writer.write_all(&16u32.to_le_bytes())?;
        writer.write_all(&1u16.to_le_bytes())?; // PCM
        writer.write_all(&self.channels.to_le_bytes())?;
        writer.write_all(&self.sample_rate.to_le_bytes())?;
        writer.write_all(&self.byte_rate().to_le_bytes())?;
        writer.write_all(&self.block_align().to_le_bytes())?;
        writer.write_all(&self.bits_per_sample.to_le_bytes())?;

        writer.write_all(b"data")?;
        writer.write_all(&data_len.to_le_bytes())
    }
}
