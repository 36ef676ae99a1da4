//! Piper text-to-speech through the native `libpiper` C API.
//!
//! The engine is consumed as an opaque capability: this module only checks
//! the voice files, sequences the five C calls and copies audio out.
//!
//! # Native Requirements
//!
//! Build with `--features piper`. `libpiper` and `onnxruntime` must be
//! linkable; set `PIPER_LIB_DIR` to the directory holding them if they are not
//! on the default search path.
//!
//! # Voice Layout
//!
//! ```text
//! onnx/
//! ├── ru_RU-dmitri-medium.onnx        # VITS acoustic model
//! └── ru_RU-dmitri-medium.onnx.json   # voice config (sample rate, speakers)
//! espeak-ng-data/                     # phonemizer data directory
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use piper_stage::{engines::piper::PiperEngine, OutputFormat, SynthesisEngine, SynthesisOptions, VoicePaths};
//! use std::path::Path;
//!
//! let paths = VoicePaths::new(
//!     "onnx/ru_RU-dmitri-medium.onnx",
//!     "onnx/ru_RU-dmitri-medium.onnx.json",
//!     "espeak-ng-data",
//! );
//! let mut engine = PiperEngine::load(&paths)?;
//! engine.synthesize_to_file(
//!     "Привет, мир!",
//!     &SynthesisOptions::default(),
//!     OutputFormat::Wav,
//!     Path::new("output.wav"),
//! )?;
//! # Ok::<(), piper_stage::Error>(())
//! ```

pub mod error;
pub mod voice;

#[cfg(feature = "piper")]
pub mod engine;
#[cfg(feature = "piper")]
mod ffi;

pub use error::PiperError;
pub use voice::VoiceConfig;

#[cfg(feature = "piper")]
pub use engine::PiperEngine;
