use std::path::Path;

use serde::Deserialize;

use super::error::PiperError;
use crate::audio::SAMPLE_RATE;
use crate::config::VoicePaths;

/// The subset of a Piper voice's `.onnx.json` this crate reads.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    pub audio: AudioConfig,
    #[serde(default = "default_num_speakers")]
    pub num_speakers: u32,
    #[serde(default)]
    pub espeak: Option<EspeakVoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    #[serde(default)]
    pub quality: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EspeakVoice {
    pub voice: String,
}

fn default_num_speakers() -> u32 {
    1
}

impl VoiceConfig {
    pub fn load(path: &Path) -> Result<Self, PiperError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Check that all three voice paths exist and read the voice config.
///
/// Runs before any native call so a bad staging directory surfaces as a
/// readable error instead of a null synthesizer.
pub fn prepare(paths: &VoicePaths) -> Result<VoiceConfig, PiperError> {
    require(&paths.model, "Voice model", Path::is_file)?;
    require(&paths.config, "Voice config", Path::is_file)?;
    require(&paths.espeak_data, "espeak-ng data directory", Path::is_dir)?;

    let config = VoiceConfig::load(&paths.config)?;
    log::info!(
        "Voice: sample_rate={}, speakers={}, espeak={}, quality={}",
        config.audio.sample_rate,
        config.num_speakers,
        config.espeak.as_ref().map_or("?", |e| e.voice.as_str()),
        config.audio.quality.as_deref().unwrap_or("?"),
    );
    if config.audio.sample_rate != SAMPLE_RATE {
        log::warn!(
            "Voice sample rate {} Hz differs from the {} Hz written to WAV headers",
            config.audio.sample_rate,
            SAMPLE_RATE
        );
    }
    Ok(config)
}

fn require(path: &Path, what: &'static str, exists: fn(&Path) -> bool) -> Result<(), PiperError> {
    if exists(path) {
        Ok(())
    } else {
        Err(PiperError::MissingPath {
            what,
            path: path.to_path_buf(),
        })
    }
}
