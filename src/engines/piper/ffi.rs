//! Raw declarations for the `libpiper` C API (`piper.h`).

#![allow(non_camel_case_types)]

use std::os::raw::{c_char, c_float, c_int};
use std::ptr;

pub const PIPER_OK: c_int = 0;
pub const PIPER_DONE: c_int = 1;

/// Opaque synthesizer owned by libpiper.
#[repr(C)]
pub struct piper_synthesizer {
    _private: [u8; 0],
}

/// One chunk of synthesized audio. Every pointer is owned by the
/// synthesizer and only valid until the next `piper_synthesize_next`.
#[repr(C)]
pub struct piper_audio_chunk {
    pub samples: *const c_float,
    pub num_samples: usize,
    pub sample_rate: c_int,
    pub is_last: bool,
    pub phonemes: *const u32,
    pub num_phonemes: usize,
    pub phoneme_ids: *const c_int,
    pub num_phoneme_ids: usize,
    pub alignments: *const c_int,
    pub num_alignments: usize,
}

impl piper_audio_chunk {
    pub fn empty() -> Self {
        Self {
            samples: ptr::null(),
            num_samples: 0,
            sample_rate: 0,
            is_last: false,
            phonemes: ptr::null(),
            num_phonemes: 0,
            phoneme_ids: ptr::null(),
            num_phoneme_ids: 0,
            alignments: ptr::null(),
            num_alignments: 0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct piper_synthesize_options {
    pub speaker_id: c_int,
    pub length_scale: c_float,
    pub noise_scale: c_float,
    pub noise_w_scale: c_float,
}

#[link(name = "piper")]
#[link(name = "onnxruntime")]
extern "C" {
    pub fn piper_create(
        model_path: *const c_char,
        config_path: *const c_char,
        espeak_data_path: *const c_char,
    ) -> *mut piper_synthesizer;

    pub fn piper_free(synth: *mut piper_synthesizer);

    pub fn piper_default_synthesize_options(
        synth: *mut piper_synthesizer,
    ) -> piper_synthesize_options;

    pub fn piper_synthesize_start(
        synth: *mut piper_synthesizer,
        text: *const c_char,
        options: *const piper_synthesize_options,
    ) -> c_int;

    pub fn piper_synthesize_next(
        synth: *mut piper_synthesizer,
        chunk: *mut piper_audio_chunk,
    ) -> c_int;
}
