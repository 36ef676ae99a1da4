use crate::assets::AssetError;
use crate::audio::AudioError;
use crate::config::ConfigError;

/// Top-level error. Each variant names the step that failed.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to prepare assets: {0}")]
    Assets(#[from] AssetError),
    #[error("synthesis engine failed: {0}")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to write output: {0}")]
    Audio(#[from] AudioError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Wrap an engine-specific error.
    pub fn engine<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Engine(Box::new(err))
    }
}

impl From<crate::engines::piper::PiperError> for Error {
    fn from(err: crate::engines::piper::PiperError) -> Self {
        Error::engine(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
