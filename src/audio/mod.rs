//! Sample accumulation and output containers.
//!
//! Two containers are supported:
//! - [`wav`]: canonical 44-byte RIFF header followed by mono 16-bit PCM at
//!   [`SAMPLE_RATE`].
//! - [`raw`]: headerless little-endian `f32` samples.

pub mod raw;
pub mod wav;

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::ConfigError;

/// Sample rate declared in the WAV header.
pub const SAMPLE_RATE: u32 = 22050;

/// Scale applied to a clamped sample when quantizing to PCM16.
const PCM16_SCALE: f32 = 32767.0;

#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("failed to open {}: {source}", path.display())]
    Create { path: PathBuf, source: io::Error },
    #[error("failed to write {field}: {source}")]
    WavField {
        field: &'static str,
        source: io::Error,
    },
    #[error("failed to write sample {index}: {source}")]
    Sample { index: usize, source: io::Error },
    #[error("failed to flush {}: {source}", path.display())]
    Flush { path: PathBuf, source: io::Error },
}

/// Container written at the end of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 22050 Hz mono PCM16 WAV
    #[default]
    Wav,
    /// Headerless little-endian f32
    Raw,
}

impl OutputFormat {
    /// File extension used for the default output name.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Wav => "wav",
            OutputFormat::Raw => "raw",
        }
    }

    /// Default output file name, `output.wav` or `output.raw`.
    pub fn default_file_name(self) -> String {
        format!("output.{}", self.extension())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wav" => Ok(OutputFormat::Wav),
            "raw" | "f32" => Ok(OutputFormat::Raw),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

/// Clamp to `[-1.0, 1.0]`, scale by 32767 and truncate toward zero.
pub fn quantize(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * PCM16_SCALE) as i16
}

/// Append-only samples collected over one request.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleBuffer {
    Pcm16(Vec<i16>),
    Float32(Vec<f32>),
}

impl SampleBuffer {
    pub fn new(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Wav => SampleBuffer::Pcm16(Vec::new()),
            OutputFormat::Raw => SampleBuffer::Float32(Vec::new()),
        }
    }

    pub fn format(&self) -> OutputFormat {
        match self {
            SampleBuffer::Pcm16(_) => OutputFormat::Wav,
            SampleBuffer::Float32(_) => OutputFormat::Raw,
        }
    }

    /// Copy `samples` onto the end of the buffer, quantizing for PCM16.
    pub fn append(&mut self, samples: &[f32]) {
        match self {
            SampleBuffer::Pcm16(out) => out.extend(samples.iter().copied().map(quantize)),
            SampleBuffer::Float32(out) => out.extend_from_slice(samples),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SampleBuffer::Pcm16(out) => out.len(),
            SampleBuffer::Float32(out) => out.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Duration of the buffered audio in seconds at [`SAMPLE_RATE`].
    pub fn duration_secs(&self) -> f64 {
        self.len() as f64 / SAMPLE_RATE as f64
    }

    /// Serialize the buffer in its container format.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), AudioError> {
        match self {
            SampleBuffer::Pcm16(samples) => wav::write_wav_to(writer, samples),
            SampleBuffer::Float32(samples) => raw::write_raw_to(writer, samples),
        }
    }

    /// Create (or truncate) `path` and write the buffer to it.
    pub fn write_to_path(&self, path: &Path) -> Result<(), AudioError> {
        let mut writer = create(path)?;
        self.write_to(&mut writer)?;
        finish(writer, path)
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, AudioError> {
    let file = File::create(path).map_err(|source| AudioError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

fn finish(mut writer: BufWriter<File>, path: &Path) -> Result<(), AudioError> {
    writer.flush().map_err(|source| AudioError::Flush {
        path: path.to_path_buf(),
        source,
    })
}
