//! Staging of bundled voice assets onto the filesystem.
//!
//! libpiper opens its model, config and espeak-ng data by path, so bundled
//! files are copied out to a working directory before the engine is created.
//!
//! # Bundle layout
//!
//! ```text
//! onnx/
//! ├── ru_RU-dmitri-medium.onnx        # acoustic model
//! └── ru_RU-dmitri-medium.onnx.json   # model config
//! espeak-ng-data/                     # phonemizer data
//! ```

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek};
use std::path::{Component, Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to read bundled entry {name}: {source}")]
    Read { name: String, source: io::Error },
    #[error("invalid asset archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("bundled entry {0:?} escapes the destination directory")]
    UnsafePath(String),
}

/// Visitor invoked with each file's relative path and contents.
pub type Visitor<'v> = dyn FnMut(&Path, &[u8]) -> Result<(), AssetError> + 'v;

/// A read-only tree of bundled files.
pub trait AssetSource {
    /// Call `visit` once per regular file, stopping at the first error.
    fn visit(&mut self, visit: &mut Visitor<'_>) -> Result<(), AssetError>;
}

/// Files compiled into the binary, e.g. with `include_bytes!`.
#[derive(Debug, Clone, Copy)]
pub struct StaticAssets<'a> {
    entries: &'a [(&'a str, &'a [u8])],
}

impl<'a> StaticAssets<'a> {
    pub fn new(entries: &'a [(&'a str, &'a [u8])]) -> Self {
        Self { entries }
    }
}

impl AssetSource for StaticAssets<'_> {
    fn visit(&mut self, visit: &mut Visitor<'_>) -> Result<(), AssetError> {
        for (name, data) in self.entries {
            let path = relative_path(name)?;
            visit(&path, data)?;
        }
        Ok(())
    }
}

/// Files stored in a zip archive.
pub struct ZipAssets<R> {
    archive: zip::ZipArchive<R>,
}

impl<R: Read + Seek> ZipAssets<R> {
    pub fn new(reader: R) -> Result<Self, AssetError> {
        Ok(Self {
            archive: zip::ZipArchive::new(reader)?,
        })
    }
}

impl<R: Read + Seek> AssetSource for ZipAssets<R> {
    fn visit(&mut self, visit: &mut Visitor<'_>) -> Result<(), AssetError> {
        let mut data = Vec::new();
        for i in 0..self.archive.len() {
            let mut entry = self.archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }

            let name = entry.name().to_string();
            let path = entry
                .enclosed_name()
                .ok_or_else(|| AssetError::UnsafePath(name.clone()))?;
            let path = relative_path(&path.to_string_lossy())?;

            data.clear();
            entry
                .read_to_end(&mut data)
                .map_err(|source| AssetError::Read { name, source })?;
            visit(&path, &data)?;
        }
        Ok(())
    }
}

/// Files in an unpacked directory on disk.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn walk(&self, dir: &Path, visit: &mut Visitor<'_>) -> Result<(), AssetError> {
        let read_err = |source| AssetError::Read {
            name: dir.display().to_string(),
            source,
        };
        let mut entries = fs::read_dir(dir)
            .map_err(read_err)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_err)?;
        // Stable order keeps staging logs reproducible.
        entries.sort();

        for path in entries {
            if path.is_dir() {
                self.walk(&path, visit)?;
                continue;
            }
            let data = fs::read(&path).map_err(|source| AssetError::Read {
                name: path.display().to_string(),
                source,
            })?;
            let relative = path.strip_prefix(&self.root).unwrap_or(&path);
            visit(relative, &data)?;
        }
        Ok(())
    }
}

impl AssetSource for DirAssets {
    fn visit(&mut self, visit: &mut Visitor<'_>) -> Result<(), AssetError> {
        let root = self.root.clone();
        self.walk(&root, visit)
    }
}

/// Open a bundle from disk: a directory is walked, anything else is read as a zip archive.
pub fn open(path: impl AsRef<Path>) -> Result<Box<dyn AssetSource>, AssetError> {
    let path = path.as_ref();
    if path.is_dir() {
        log::info!("Using asset directory {}", path.display());
        return Ok(Box::new(DirAssets::new(path)));
    }

    log::info!("Using asset archive {}", path.display());
    let file = File::open(path).map_err(|source| AssetError::Read {
        name: path.display().to_string(),
        source,
    })?;
    Ok(Box::new(ZipAssets::new(BufReader::new(file))?))
}

/// The archive compiled in from `PIPER_BUNDLE_ZIP` at build time.
#[cfg(feature = "bundled")]
pub fn embedded() -> Result<ZipAssets<io::Cursor<&'static [u8]>>, AssetError> {
    static BUNDLE: &[u8] = include_bytes!(env!("PIPER_BUNDLE_ZIP"));
    ZipAssets::new(io::Cursor::new(BUNDLE))
}

/// Write every file of `source` under `dest`, creating directories as needed.
///
/// Existing files are overwritten, so staging twice is harmless. Returns the
/// written paths in visit order.
pub fn stage<S>(source: &mut S, dest: &Path) -> Result<Vec<PathBuf>, AssetError>
where
    S: AssetSource + ?Sized,
{
    fs::create_dir_all(dest).map_err(|source| AssetError::CreateDir {
        path: dest.to_path_buf(),
        source,
    })?;

    let mut saved = Vec::new();
    source.visit(&mut |relative: &Path, data: &[u8]| -> Result<(), AssetError> {
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| AssetError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&target, data).map_err(|source| AssetError::Write {
            path: target.clone(),
            source,
        })?;
        log::debug!("Staged {} ({} bytes)", target.display(), data.len());
        saved.push(target);
        Ok(())
    })?;

    log::info!("Staged {} asset files into {}", saved.len(), dest.display());
    Ok(saved)
}

/// Reject absolute paths and `..` so entries stay under the destination.
fn relative_path(name: &str) -> Result<PathBuf, AssetError> {
    let mut out = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => return Err(AssetError::UnsafePath(name.to_string())),
        }
    }
    if out.as_os_str().is_empty() {
        return Err(AssetError::UnsafePath(name.to_string()));
    }
    Ok(out)
}
