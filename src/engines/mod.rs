//! Speech synthesis engines.
//!
//! # Available Engines
//!
//! - [`piper`] - libpiper (ONNX VITS voices, espeak-ng phonemizer). The
//!   native session requires the `piper` cargo feature.

pub mod piper;
