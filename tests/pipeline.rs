use std::cell::Cell;
use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;

use piper_stage::assets::{AssetError, StaticAssets};
use piper_stage::audio::wav::HEADER_LEN;
use piper_stage::audio::raw::read_raw;
use piper_stage::{
    pipeline, AudioChunk, Error, OutputFormat, PipelineConfig, SynthesisEngine,
    SynthesisOptions, VoicePaths,
};

const VOICE: &[(&str, &[u8])] = &[
    ("onnx/ru_RU-dmitri-medium.onnx", b"weights".as_slice()),
    (
        "onnx/ru_RU-dmitri-medium.onnx.json",
        br#"{"audio":{"sample_rate":22050}}"#.as_slice(),
    ),
    ("espeak-ng-data/phontab", b"phonemes".as_slice()),
];

/// Stands in for libpiper: replays chunks and counts how often it is released.
struct FakeEngine {
    chunks: Vec<Vec<f32>>,
    cursor: usize,
    fail_at: Option<usize>,
    scratch: Vec<f32>,
    released: Rc<Cell<usize>>,
}

impl FakeEngine {
    fn open(
        paths: &VoicePaths,
        chunks: Vec<Vec<f32>>,
        released: &Rc<Cell<usize>>,
    ) -> io::Result<Self> {
        for path in [&paths.model, &paths.config, &paths.espeak_data] {
            if !path.exists() {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} was not staged", path.display()),
                ));
            }
        }
        Ok(Self {
            chunks,
            cursor: 0,
            fail_at: None,
            scratch: Vec::new(),
            released: Rc::clone(released),
        })
    }
}

impl Drop for FakeEngine {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

impl SynthesisEngine for FakeEngine {
    type Error = io::Error;

    fn configure(&mut self, _options: &SynthesisOptions) {}

    fn start(&mut self, _text: &str) -> io::Result<()> {
        self.cursor = 0;
        Ok(())
    }

    fn next_chunk(&mut self) -> io::Result<Option<AudioChunk<'_>>> {
        if self.fail_at == Some(self.cursor) {
            return Err(io::Error::new(io::ErrorKind::Other, "synthesis fault"));
        }
        let Some(next) = self.chunks.get(self.cursor) else {
            return Ok(None);
        };
        self.scratch.clear();
        self.scratch.extend_from_slice(next);
        self.cursor += 1;
        Ok(Some(AudioChunk {
            samples: &self.scratch,
            sample_rate: 22050,
        }))
    }
}

fn config(work_dir: &Path, output: &Path, format: OutputFormat) -> PipelineConfig {
    PipelineConfig::builder()
        .text("Привет, мир!")
        .work_dir(work_dir)
        .output_path(output)
        .output_format(format)
        .build()
        .unwrap()
}

#[test]
fn stages_synthesizes_and_writes_wav() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.wav");
    let released = Rc::new(Cell::new(0));

    let written = pipeline::run(
        &config(dir.path(), &output, OutputFormat::Wav),
        &mut StaticAssets::new(VOICE),
        |paths| FakeEngine::open(paths, vec![vec![0.5, -0.5], vec![1.0, 2.0, -2.0]], &released),
    )
    .unwrap();

    assert_eq!(written, output);
    assert_eq!(released.get(), 1);
    assert!(dir.path().join("espeak-ng-data/phontab").is_file());

    let mut reader = hound::WavReader::open(&output).unwrap();
    assert_eq!(reader.spec().sample_rate, 22050);
    assert_eq!(reader.spec().channels, 1);
    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples, vec![16383, -16383, 32767, 32767, -32767]);
}

#[test]
fn empty_synthesis_writes_header_only_wav() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.wav");
    let released = Rc::new(Cell::new(0));

    pipeline::run(
        &config(dir.path(), &output, OutputFormat::Wav),
        &mut StaticAssets::new(VOICE),
        |paths| FakeEngine::open(paths, vec![], &released),
    )
    .unwrap();

    let bytes = fs::read(&output).unwrap();
    assert_eq!(bytes.len(), HEADER_LEN);
    assert_eq!(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 36);
    assert_eq!(u32::from_le_bytes([bytes[40], bytes[41], bytes[42], bytes[43]]), 0);
}

#[test]
fn raw_output_preserves_samples_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.raw");
    let released = Rc::new(Cell::new(0));
    let chunks = vec![vec![0.25, -0.75, 1.5], vec![-0.000_1]];

    pipeline::run(
        &config(dir.path(), &output, OutputFormat::Raw),
        &mut StaticAssets::new(VOICE),
        |paths| FakeEngine::open(paths, chunks.clone(), &released),
    )
    .unwrap();

    let decoded = read_raw(&fs::read(&output).unwrap());
    assert_eq!(decoded, chunks.concat());
}

#[test]
fn staging_failure_happens_before_the_engine_is_opened() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("work");
    fs::write(&blocker, b"regular file").unwrap();
    let opened = Cell::new(false);

    let err = pipeline::run(
        &config(&blocker, &dir.path().join("output.wav"), OutputFormat::Wav),
        &mut StaticAssets::new(VOICE),
        |paths| {
            opened.set(true);
            FakeEngine::open(paths, vec![], &Rc::new(Cell::new(0)))
        },
    )
    .unwrap_err();

    assert!(matches!(err, Error::Assets(AssetError::CreateDir { .. })), "{err:?}");
    assert!(!opened.get());
    assert!(!dir.path().join("output.wav").exists());
}

#[test]
fn engine_is_released_once_when_synthesis_fails() {
    let dir = tempfile::tempdir().unwrap();
    let released = Rc::new(Cell::new(0));

    let err = pipeline::run(
        &config(dir.path(), &dir.path().join("output.wav"), OutputFormat::Wav),
        &mut StaticAssets::new(VOICE),
        |paths| -> io::Result<FakeEngine> {
            let mut engine = FakeEngine::open(paths, vec![vec![0.1], vec![0.2]], &released)?;
            engine.fail_at = Some(1);
            Ok(engine)
        },
    )
    .unwrap_err();

    assert!(matches!(err, Error::Engine(_)));
    assert_eq!(released.get(), 1);
}

#[test]
fn engine_is_released_once_when_output_cannot_be_written() {
    let dir = tempfile::tempdir().unwrap();
    let released = Rc::new(Cell::new(0));
    let output = dir.path().join("missing").join("output.wav");

    let err = pipeline::run(
        &config(dir.path(), &output, OutputFormat::Wav),
        &mut StaticAssets::new(VOICE),
        |paths| FakeEngine::open(paths, vec![vec![0.1]], &released),
    )
    .unwrap_err();

    assert!(matches!(err, Error::Audio(_)), "{err:?}");
    assert_eq!(released.get(), 1);
}

#[test]
fn missing_voice_files_fail_engine_creation() {
    let dir = tempfile::tempdir().unwrap();
    let partial: &[(&str, &[u8])] = &[("espeak-ng-data/phontab", b"phonemes".as_slice())];

    let err = pipeline::run(
        &config(dir.path(), &dir.path().join("output.wav"), OutputFormat::Wav),
        &mut StaticAssets::new(partial),
        |paths| FakeEngine::open(paths, vec![], &Rc::new(Cell::new(0))),
    )
    .unwrap_err();

    assert!(matches!(err, Error::Engine(_)));
    assert!(err.to_string().contains("was not staged"));
}

#[test]
fn trait_default_writes_file_directly() {
    let dir = tempfile::tempdir().unwrap();
    let released = Rc::new(Cell::new(0));
    piper_stage::assets::stage(&mut StaticAssets::new(VOICE), dir.path()).unwrap();

    let paths = PipelineConfig::builder()
        .work_dir(dir.path())
        .build()
        .unwrap()
        .voice_paths();
    let mut engine = FakeEngine::open(&paths, vec![vec![0.0; 10]], &released).unwrap();
    let output = dir.path().join("direct.wav");
    engine
        .synthesize_to_file("text", &SynthesisOptions::default(), OutputFormat::Wav, &output)
        .unwrap();

    assert_eq!(fs::metadata(&output).unwrap().len(), (HEADER_LEN + 20) as u64);
}
