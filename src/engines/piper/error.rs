use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum PiperError {
    #[error("{what} not found at {}", path.display())]
    MissingPath { what: &'static str, path: PathBuf },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid voice config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Path {} cannot be passed to libpiper", path.display())]
    InvalidPath { path: PathBuf },
    #[error("Text contains an interior NUL byte")]
    InvalidText,
    #[error("piper_create failed to load the voice")]
    CreateFailed,
    #[error("piper_synthesize_start returned status {0}")]
    StartFailed(i32),
    #[error("piper_synthesize_next returned status {0}")]
    NextFailed(i32),
    #[error("Synthesis not started. Call start() first.")]
    NotStarted,
}
