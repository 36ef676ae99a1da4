//! # piper-stage
//!
//! Stages bundled Piper voice assets onto disk, drives the native libpiper
//! synthesizer through its C API, and writes the streamed audio to a WAV or
//! raw float file.
//!
//! ## Features
//!
//! - `piper`: link against `libpiper` / `onnxruntime` and enable
//!   [`engines::piper::PiperEngine`] plus the `piper-stage` binary.
//! - `bundled`: compile the asset archive named by `PIPER_BUNDLE_ZIP` into the
//!   crate, exposed through [`assets::embedded`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use piper_stage::{assets, engines::piper::PiperEngine, pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::builder().text("Привет, мир!").build()?;
//! let mut source = assets::open("voices/ru_RU-dmitri-medium.zip")?;
//! let output = pipeline::run(&config, source.as_mut(), PiperEngine::load)?;
//! println!("Saved to {}", output.display());
//! # Ok::<(), piper_stage::Error>(())
//! ```

pub mod assets;
pub mod audio;
pub mod config;
pub mod engines;
pub mod error;
pub mod pipeline;

use std::path::Path;

pub use audio::{OutputFormat, SampleBuffer};
pub use config::{PipelineConfig, PipelineConfigBuilder, VoicePaths};
pub use error::{Error, Result};

/// One batch of audio handed out by an engine's pull call.
///
/// The samples borrow engine-owned memory that is only valid until the next
/// pull, so the view is tied to the engine's mutable borrow.
#[derive(Debug, Clone, Copy)]
pub struct AudioChunk<'a> {
    /// Samples nominally in `[-1.0, 1.0]`
    pub samples: &'a [f32],
    /// Sample rate reported by the engine for this chunk
    pub sample_rate: u32,
}

impl AudioChunk<'_> {
    /// Duration of the chunk in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Options applied to the engine before a request starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOptions {
    /// Phoneme length multiplier. Larger is slower speech, default 1.0.
    pub length_scale: f32,
    /// Speaker index for multi-speaker voices. `None` keeps the voice default.
    pub speaker_id: Option<i32>,
    /// Generator noise. `None` keeps the voice default.
    pub noise_scale: Option<f32>,
    /// Phoneme width noise. `None` keeps the voice default.
    pub noise_w_scale: Option<f32>,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            length_scale: 1.0,
            speaker_id: None,
            noise_scale: None,
            noise_w_scale: None,
        }
    }
}

/// Common interface for pull-based synthesis engines.
///
/// A request is one [`start`](SynthesisEngine::start) followed by
/// [`next_chunk`](SynthesisEngine::next_chunk) calls until it yields `None`.
/// Implementations are not reentrant: only one request is in flight at a time.
pub trait SynthesisEngine {
    /// Error reported by the engine for any failed call.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Apply options to the engine's options record. Takes effect on the next `start`.
    fn configure(&mut self, options: &SynthesisOptions);

    /// Begin synthesizing `text`.
    fn start(&mut self, text: &str) -> std::result::Result<(), Self::Error>;

    /// Pull the next chunk, or `None` once the engine reports it is done.
    fn next_chunk(&mut self) -> std::result::Result<Option<AudioChunk<'_>>, Self::Error>;

    /// Synthesize `text` and write it to `path` in the given format.
    ///
    /// Default implementation runs [`pipeline::synthesize_to_buffer`] then
    /// [`SampleBuffer::write_to_path`].
    fn synthesize_to_file(
        &mut self,
        text: &str,
        options: &SynthesisOptions,
        format: OutputFormat,
        path: &Path,
    ) -> Result<()>
    where
        Self: Sized,
    {
        let buffer = pipeline::synthesize_to_buffer(self, text, options, format)?;
        buffer.write_to_path(path)?;
        Ok(())
    }
}
