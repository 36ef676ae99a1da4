use std::path::{Path, PathBuf};

use derive_builder::Builder;

use crate::audio::OutputFormat;
use crate::SynthesisOptions;

/// Utterance used when none is given on the command line.
pub const DEFAULT_TEXT: &str = "Привет, мир!";
pub const DEFAULT_MODEL: &str = "onnx/ru_RU-dmitri-medium.onnx";
pub const DEFAULT_MODEL_CONFIG: &str = "onnx/ru_RU-dmitri-medium.onnx.json";
pub const DEFAULT_ESPEAK_DATA: &str = "espeak-ng-data";

pub const ENV_OUTPUT_FORMAT: &str = "PIPER_OUTPUT_FORMAT";
pub const ENV_LENGTH_SCALE: &str = "PIPER_LENGTH_SCALE";
pub const ENV_WORK_DIR: &str = "PIPER_WORK_DIR";
pub const ENV_ASSETS: &str = "PIPER_ASSETS";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0:?} is not a valid output format (expected `wav` or `raw`)")]
    InvalidFormat(String),
    #[error("PIPER_LENGTH_SCALE={0:?} is not a positive number")]
    InvalidLengthScale(String),
    #[error(transparent)]
    Builder(#[from] PipelineConfigBuilderError),
}

/// Everything one run of the pipeline needs.
///
/// Voice paths are relative to `work_dir`, where assets are staged. The
/// output path is relative to the process working directory.
#[derive(Debug, Clone, Builder)]
#[builder(default, setter(into))]
pub struct PipelineConfig {
    pub text: String,
    pub work_dir: PathBuf,
    pub model_path: PathBuf,
    pub model_config_path: PathBuf,
    pub espeak_data_path: PathBuf,
    pub output_format: OutputFormat,
    /// Overrides `output.<ext>` when set.
    #[builder(setter(into, strip_option))]
    pub output_path: Option<PathBuf>,
    /// Zip archive or directory to stage from. `None` uses the compiled-in bundle if any.
    #[builder(setter(into, strip_option))]
    pub assets: Option<PathBuf>,
    pub options: SynthesisOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            work_dir: PathBuf::from("."),
            model_path: PathBuf::from(DEFAULT_MODEL),
            model_config_path: PathBuf::from(DEFAULT_MODEL_CONFIG),
            espeak_data_path: PathBuf::from(DEFAULT_ESPEAK_DATA),
            output_format: OutputFormat::default(),
            output_path: None,
            assets: None,
            options: SynthesisOptions::default(),
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Paths handed to the engine, resolved against `work_dir`.
    pub fn voice_paths(&self) -> VoicePaths {
        VoicePaths {
            model: self.work_dir.join(&self.model_path),
            config: self.work_dir.join(&self.model_config_path),
            espeak_data: self.work_dir.join(&self.espeak_data_path),
        }
    }

    /// Where the audio container is written.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.output_format.default_file_name()))
    }

    /// Apply `PIPER_*` environment overrides.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up by variable name.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(format) = lookup(ENV_OUTPUT_FORMAT) {
            self.output_format = format.parse()?;
        }
        if let Some(scale) = lookup(ENV_LENGTH_SCALE) {
            self.options.length_scale = scale
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .ok_or(ConfigError::InvalidLengthScale(scale))?;
        }
        if let Some(dir) = lookup(ENV_WORK_DIR) {
            self.work_dir = PathBuf::from(dir);
        }
        if let Some(assets) = lookup(ENV_ASSETS) {
            self.assets = Some(PathBuf::from(assets));
        }
        Ok(self)
    }
}

/// The three paths libpiper is created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoicePaths {
    /// Acoustic model (`.onnx`)
    pub model: PathBuf,
    /// Model config (`.onnx.json`)
    pub config: PathBuf,
    /// espeak-ng data directory
    pub espeak_data: PathBuf,
}

impl VoicePaths {
    pub fn new(
        model: impl AsRef<Path>,
        config: impl AsRef<Path>,
        espeak_data: impl AsRef<Path>,
    ) -> Self {
        Self {
            model: model.as_ref().to_path_buf(),
            config: config.as_ref().to_path_buf(),
            espeak_data: espeak_data.as_ref().to_path_buf(),
        }
    }
}
