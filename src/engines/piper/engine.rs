use std::ffi::CString;
use std::path::Path;
use std::ptr::NonNull;

use crate::config::VoicePaths;
use crate::{AudioChunk, SynthesisEngine, SynthesisOptions};

use super::error::PiperError;
use super::ffi;
use super::voice::{self, VoiceConfig};

/// A loaded libpiper synthesizer.
///
/// Owns the native handle and its options record. The handle is released
/// exactly once when the engine is dropped, on every exit path.
///
/// ```rust,ignore
/// use piper_stage::{engines::piper::PiperEngine, SynthesisEngine, SynthesisOptions, VoicePaths};
///
/// let paths = VoicePaths::new(
///     "onnx/ru_RU-dmitri-medium.onnx",
///     "onnx/ru_RU-dmitri-medium.onnx.json",
///     "espeak-ng-data",
/// );
/// let mut engine = PiperEngine::load(&paths)?;
/// engine.configure(&SynthesisOptions { length_scale: 1.2, ..Default::default() });
/// engine.start("Привет, мир!")?;
/// while let Some(chunk) = engine.next_chunk()? {
///     println!("{} samples", chunk.samples.len());
/// }
/// # Ok::<(), piper_stage::engines::piper::PiperError>(())
/// ```
pub struct PiperEngine {
    synth: NonNull<ffi::piper_synthesizer>,
    options: ffi::piper_synthesize_options,
    voice: VoiceConfig,
    /// Text of the request in flight, kept alive until it is drained.
    text: Option<CString>,
}

impl PiperEngine {
    /// Create a synthesizer from a voice model, its config and espeak-ng data.
    pub fn load(paths: &VoicePaths) -> Result<Self, PiperError> {
        let voice = voice::prepare(paths)?;

        let model = c_path(&paths.model)?;
        let config = c_path(&paths.config)?;
        let espeak = c_path(&paths.espeak_data)?;

        log::info!("Loading Piper voice from {}", paths.model.display());
        // SAFETY: all three strings are valid NUL-terminated C strings for the call.
        let raw = unsafe { ffi::piper_create(model.as_ptr(), config.as_ptr(), espeak.as_ptr()) };
        let synth = NonNull::new(raw).ok_or(PiperError::CreateFailed)?;
        // SAFETY: `synth` was just returned non-null by piper_create.
        let options = unsafe { ffi::piper_default_synthesize_options(synth.as_ptr()) };

        Ok(Self {
            synth,
            options,
            voice,
            text: None,
        })
    }

    /// Phoneme length multiplier for subsequent requests.
    pub fn set_length_scale(&mut self, length_scale: f32) {
        self.options.length_scale = length_scale;
    }

    /// The voice config read at load time.
    pub fn voice(&self) -> &VoiceConfig {
        &self.voice
    }

    fn finish_request(&mut self) {
        self.text = None;
    }
}

impl Drop for PiperEngine {
    fn drop(&mut self) {
        log::debug!("Releasing Piper synthesizer");
        // SAFETY: the handle came from piper_create and is freed only here.
        unsafe { ffi::piper_free(self.synth.as_ptr()) };
    }
}

impl SynthesisEngine for PiperEngine {
    type Error = PiperError;

    fn configure(&mut self, options: &SynthesisOptions) {
        self.set_length_scale(options.length_scale);
        if let Some(speaker_id) = options.speaker_id {
            self.options.speaker_id = speaker_id;
        }
        if let Some(noise_scale) = options.noise_scale {
            self.options.noise_scale = noise_scale;
        }
        if let Some(noise_w_scale) = options.noise_w_scale {
            self.options.noise_w_scale = noise_w_scale;
        }
    }

    fn start(&mut self, text: &str) -> Result<(), PiperError> {
        let text = CString::new(text).map_err(|_| PiperError::InvalidText)?;

        // SAFETY: handle is live, text and options outlive the call.
        let status = unsafe {
            ffi::piper_synthesize_start(self.synth.as_ptr(), text.as_ptr(), &self.options)
        };
        if status != ffi::PIPER_OK {
            self.finish_request();
            return Err(PiperError::StartFailed(status));
        }

        log::debug!("Started synthesis (length_scale={})", self.options.length_scale);
        self.text = Some(text);
        Ok(())
    }

    fn next_chunk(&mut self) -> Result<Option<AudioChunk<'_>>, PiperError> {
        if self.text.is_none() {
            return Err(PiperError::NotStarted);
        }

        let mut chunk = ffi::piper_audio_chunk::empty();
        // SAFETY: handle is live and `chunk` is a valid out-pointer.
        let status = unsafe { ffi::piper_synthesize_next(self.synth.as_ptr(), &mut chunk) };
        match status {
            ffi::PIPER_DONE => {
                self.finish_request();
                Ok(None)
            }
            ffi::PIPER_OK => {
                let samples = if chunk.samples.is_null() || chunk.num_samples == 0 {
                    &[][..]
                } else {
                    // SAFETY: libpiper guarantees `num_samples` floats at `samples`
                    // until the next call, which needs `&mut self` and so cannot
                    // happen while this borrow is alive.
                    unsafe { std::slice::from_raw_parts(chunk.samples, chunk.num_samples) }
                };
                Ok(Some(AudioChunk {
                    samples,
                    sample_rate: u32::try_from(chunk.sample_rate).unwrap_or(0),
                }))
            }
            code => {
                self.finish_request();
                Err(PiperError::NextFailed(code))
            }
        }
    }
}

fn c_path(path: &Path) -> Result<CString, PiperError> {
    path.to_str()
        .and_then(|s| CString::new(s).ok())
        .ok_or_else(|| PiperError::InvalidPath {
            path: path.to_path_buf(),
        })
}
