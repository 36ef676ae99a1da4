use std::io::{self, Write};
use std::path::Path;

use super::{AudioError, SAMPLE_RATE};

/// Size of the canonical RIFF/WAVE header in bytes.
pub const HEADER_LEN: usize = 44;

const NUM_CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const AUDIO_FORMAT_PCM: u16 = 1;
const FMT_CHUNK_SIZE: u32 = 16;
/// Bytes of header that follow the RIFF size field, excluding the data itself.
const RIFF_OVERHEAD: u32 = 36;

/// Write a complete WAV file (header + samples) for mono PCM16 at 22050 Hz.
pub fn write_wav_to<W: Write>(writer: &mut W, samples: &[i16]) -> Result<(), AudioError> {
    let data_size = data_size(samples.len())?;
    let block_align = NUM_CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = SAMPLE_RATE * u32::from(block_align);

    // RIFF header
    field(writer, "RIFF", b"RIFF")?;
    field(writer, "chunk size", &(RIFF_OVERHEAD + data_size).to_le_bytes())?;
    field(writer, "WAVE", b"WAVE")?;

    // fmt chunk
    field(writer, "fmt", b"fmt ")?;
    field(writer, "fmt size", &FMT_CHUNK_SIZE.to_le_bytes())?;
    field(writer, "audio format", &AUDIO_FORMAT_PCM.to_le_bytes())?;
    field(writer, "num channels", &NUM_CHANNELS.to_le_bytes())?;
    field(writer, "sample rate", &SAMPLE_RATE.to_le_bytes())?;
    field(writer, "byte rate", &byte_rate.to_le_bytes())?;
    field(writer, "block align", &block_align.to_le_bytes())?;
    field(writer, "bits per sample", &BITS_PER_SAMPLE.to_le_bytes())?;

    // data chunk
    field(writer, "data", b"data")?;
    field(writer, "data size", &data_size.to_le_bytes())?;

    for (index, sample) in samples.iter().enumerate() {
        writer
            .write_all(&sample.to_le_bytes())
            .map_err(|source| AudioError::Sample { index, source })?;
    }
    Ok(())
}

/// Create (or truncate) `path` and write a WAV file to it.
pub fn write_wav(path: &Path, samples: &[i16]) -> Result<(), AudioError> {
    let mut writer = super::create(path)?;
    write_wav_to(&mut writer, samples)?;
    super::finish(writer, path)
}

fn field<W: Write>(writer: &mut W, name: &'static str, bytes: &[u8]) -> Result<(), AudioError> {
    writer
        .write_all(bytes)
        .map_err(|source| AudioError::WavField { field: name, source })
}

/// Byte length of the data chunk; must leave room for the RIFF overhead in a u32.
fn data_size(sample_count: usize) -> Result<u32, AudioError> {
    sample_count
        .checked_mul(2)
        .and_then(|bytes| u32::try_from(bytes).ok())
        .filter(|bytes| bytes.checked_add(RIFF_OVERHEAD).is_some())
        .ok_or_else(|| AudioError::WavField {
            field: "data size",
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{sample_count} samples do not fit in a RIFF container"),
            ),
        })
}
