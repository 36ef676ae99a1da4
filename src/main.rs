//! `piper-stage` entry point.
//!
//! Stages the voice bundle into the working directory, synthesizes one
//! utterance with libpiper and writes `output.wav` (or `output.raw` when
//! `PIPER_OUTPUT_FORMAT=raw`).

use std::process;

use clap::Parser;
use piper_stage::assets::{self, AssetSource};
use piper_stage::config::DEFAULT_TEXT;
use piper_stage::engines::piper::PiperEngine;
use piper_stage::{pipeline, PipelineConfig, Result};

/// Synthesize speech with a bundled Piper voice
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Text to synthesize
    #[arg(short, long, default_value = DEFAULT_TEXT)]
    text: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = PipelineConfig::builder()
        .text(cli.text)
        .build()
        .map_err(piper_stage::config::ConfigError::from)?
        .apply_env()?;

    let mut source = asset_source(&config)?;
    let output = pipeline::run(&config, source.as_mut(), PiperEngine::load)?;
    log::info!("Saved to {}", output.display());
    Ok(())
}

fn asset_source(config: &PipelineConfig) -> Result<Box<dyn AssetSource>> {
    if let Some(path) = &config.assets {
        return Ok(assets::open(path)?);
    }

    #[cfg(feature = "bundled")]
    {
        Ok(Box::new(assets::embedded()?))
    }

    #[cfg(not(feature = "bundled"))]
    {
        log::warn!(
            "No asset bundle configured; expecting voice files under {}",
            config.work_dir.display()
        );
        Ok(Box::new(assets::StaticAssets::new(&[])))
    }
}
