//! Writing encoded audio to disk.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::AudioResult;

use super::result::WavResult;

/// How the output file is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Write a temporary file next to the destination and rename it into
    /// place on success. A failed write leaves neither file behind.
    #[default]
    Atomic,
    /// Create the destination and write straight into it. A failed write
    /// may leave a partial file.
    Direct,
}

impl WriteMode {
    /// `Atomic` when `atomic` is set, `Direct` otherwise.
    pub fn from_atomic(atomic: bool) -> Self {
        if atomic {
            WriteMode::Atomic
        } else {
            WriteMode::Direct
        }
    }
}

/// Quantizes `samples` to mono 16-bit PCM and writes a WAV file atomically.
///
/// # Errors
/// - [`AudioError::Io`](crate::AudioError::Io) if the destination is not writable
/// - [`AudioError::InvalidSampleRate`](crate::AudioError::InvalidSampleRate) for a zero rate
pub fn write_pcm16(samples: &[f64], sample_rate: u32, path: &Path) -> AudioResult<WavResult> {
    write_pcm16_with(samples, sample_rate, path, WriteMode::Atomic)
}

/// [`write_pcm16`] with an explicit commit mode.
pub fn write_pcm16_with(
    samples: &[f64],
    sample_rate: u32,
    path: &Path,
    mode: WriteMode,
) -> AudioResult<WavResult> {
    let wav = WavResult::from_mono(samples, sample_rate)?;

    match mode {
        WriteMode::Atomic => write_atomic(path, &wav.wav_data),
        WriteMode::Direct => write_direct(path, &wav.wav_data),
    }
    .inspect_err(|e| tracing::error!(path = %path.display(), error = %e, "failed to write wav"))?;

    tracing::info!(
        path = %path.display(),
        samples = wav.num_samples,
        sample_rate,
        bytes = wav.wav_data.len(),
        "wrote wav"
    );
    Ok(wav)
}

/// Writes `bytes` to `path` through a temporary sibling file.
///
/// The temporary file is removed on every failure path, including a failed
/// rename. The committed file gets the permissions a direct write would
/// give it.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".tickertone-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Same creation mode as `File::create`; the umask still applies.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir)?;

    // Replacing a file keeps its permissions, as a direct write would.
    if let Ok(existing) = fs::metadata(path) {
        if existing.is_file() {
            tmp.as_file().set_permissions(existing.permissions())?;
        }
    }

    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn write_direct(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(bytes)?;
    writer.flush()
}
