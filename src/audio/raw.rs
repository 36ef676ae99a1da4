use std::io::Write;
use std::path::Path;

use super::AudioError;

/// Write each sample as 4 little-endian bytes, in order, with no header.
pub fn write_raw_to<W: Write>(writer: &mut W, samples: &[f32]) -> Result<(), AudioError> {
    for (index, sample) in samples.iter().enumerate() {
        writer
            .write_all(&sample.to_le_bytes())
            .map_err(|source| AudioError::Sample { index, source })?;
    }
    Ok(())
}

/// Create (or truncate) `path` and write raw samples to it.
pub fn write_raw(path: &Path, samples: &[f32]) -> Result<(), AudioError> {
    let mut writer = super::create(path)?;
    write_raw_to(&mut writer, samples)?;
    super::finish(writer, path)
}

/// Decode a raw little-endian f32 stream. Trailing partial samples are ignored.
pub fn read_raw(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_round_trips_bit_for_bit() {
        let samples = [
            0.0f32,
            -0.0,
            1.0,
            -1.0,
            1.5,
            f32::MIN_POSITIVE,
            0.123_456_79,
            -0.999_999,
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.raw");
        write_raw(&path, &samples).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), samples.len() * 4);
        let decoded = read_raw(&bytes);
        let expected: Vec<u32> = samples.iter().map(|s| s.to_bits()).collect();
        let actual: Vec<u32> = decoded.iter().map(|s| s.to_bits()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn empty_stream_writes_nothing() {
        let mut out = Vec::new();
        write_raw_to(&mut out, &[]).unwrap();
        assert!(out.is_empty());
    }
}
