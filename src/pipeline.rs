//! The staged synthesis pipeline.
//!
//! ```text
//! stage assets -> open engine -> configure -> start -> pull chunks -> write container
//! ```

use std::path::PathBuf;
use std::time::Instant;

use crate::assets::{self, AssetSource};
use crate::audio::{OutputFormat, SampleBuffer};
use crate::config::{PipelineConfig, VoicePaths};
use crate::error::{Error, Result};
use crate::{SynthesisEngine, SynthesisOptions};

/// Drain the current request into `buffer`. Returns the number of chunks read.
///
/// Stops only when the engine reports it is done. Each chunk is copied out
/// before the next pull, in arrival order.
pub fn consume_chunks<E>(
    engine: &mut E,
    buffer: &mut SampleBuffer,
) -> std::result::Result<usize, E::Error>
where
    E: SynthesisEngine + ?Sized,
{
    let mut chunks = 0;
    while let Some(chunk) = engine.next_chunk()? {
        log::debug!(
            "Chunk {}: {} samples ({:.2}s)",
            chunks,
            chunk.samples.len(),
            chunk.duration_secs()
        );
        buffer.append(chunk.samples);
        chunks += 1;
    }
    Ok(chunks)
}

/// Run one request against an already created engine.
pub fn synthesize_to_buffer<E>(
    engine: &mut E,
    text: &str,
    options: &SynthesisOptions,
    format: OutputFormat,
) -> Result<SampleBuffer>
where
    E: SynthesisEngine + ?Sized,
{
    engine.configure(options);
    engine.start(text).map_err(Error::engine)?;

    let mut buffer = SampleBuffer::new(format);
    let chunks = consume_chunks(engine, &mut buffer).map_err(Error::engine)?;
    log::debug!("Collected {} samples from {} chunks", buffer.len(), chunks);
    Ok(buffer)
}

/// Stage assets, synthesize `config.text` and write the output file.
///
/// `open` creates the engine from the staged voice paths; the engine is
/// dropped (and its native resources released) before this returns, on
/// success and on every error path. Returns the written output path.
pub fn run<S, E, F>(config: &PipelineConfig, source: &mut S, open: F) -> Result<PathBuf>
where
    S: AssetSource + ?Sized,
    E: SynthesisEngine,
    F: FnOnce(&VoicePaths) -> std::result::Result<E, E::Error>,
{
    assets::stage(source, &config.work_dir)?;

    let load_start = Instant::now();
    let mut engine = open(&config.voice_paths()).map_err(Error::engine)?;
    log::info!("Engine loaded in {:.2?}", load_start.elapsed());

    let synth_start = Instant::now();
    let buffer =
        synthesize_to_buffer(&mut engine, &config.text, &config.options, config.output_format)?;
    let synth_dur = synth_start.elapsed();

    let audio_duration = buffer.duration_secs();
    let speedup = audio_duration / synth_dur.as_secs_f64().max(f64::EPSILON);
    log::info!(
        "Synthesized {:.2}s audio in {:.2?} ({:.1}x real-time)",
        audio_duration,
        synth_dur,
        speedup
    );

    let output = config.output_path();
    buffer.write_to_path(&output)?;
    log::info!("Saved {} output to {}", config.output_format, output.display());
    Ok(output)
}
