use std::path::{Path, PathBuf};

use trellis_script::{encode, parse_str, Frame};

use crate::manifest::Manifest;
use crate::package::{create_dir, write_file, Package, PackageError};

/// One parsed script of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    /// Location relative to the package directory, as listed in the manifest.
    pub path: String,
    pub frame: Frame,
}

/// A package with every script parsed into a frame tree, in manifest order.
#[derive(Debug, Clone)]
pub struct Document {
    dir: PathBuf,
    manifest: Manifest,
    stack: Vec<FrameRecord>,
}

impl Document {
    /// Load and parse every script of the package in `dir`. A single bad
    /// script fails the whole load.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, PackageError> {
        let mut package = Package::load(dir)?;
        let mut stack = Vec::with_capacity(package.script_names().len());
        for path in package.script_names().to_vec() {
            let text = package.script(&path)?;
            let frame = parse_str(text).map_err(|source| PackageError::Script { path: package.full_path(&path), source })?;
            log::debug!("loaded {path}");
            stack.push(FrameRecord { path, frame });
        }
        Ok(Self { dir: package.dir().to_path_buf(), manifest: package.manifest().clone(), stack })
    }

    /// An unsaved document that will live in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), manifest: Manifest::default(), stack: Vec::new() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn stack(&self) -> &[FrameRecord] {
        &self.stack
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.stack.get(index).map(|rec| &rec.frame)
    }

    pub fn frame_mut(&mut self, index: usize) -> Option<&mut Frame> {
        self.stack.get_mut(index).map(|rec| &mut rec.frame)
    }

    /// Append a frame as a new script, or replace the frame already stored
    /// under `path`.
    pub fn push(&mut self, path: impl Into<String>, frame: Frame) {
        let path = path.into();
        match self.stack.iter_mut().find(|rec| rec.path == path) {
            Some(rec) => rec.frame = frame,
            None => {
                self.manifest.add(path.clone());
                self.stack.push(FrameRecord { path, frame });
            }
        }
    }

    pub fn save(&self) -> Result<(), PackageError> {
        write_all(&self.dir, &self.manifest, &self.stack)
    }

    /// Write the manifest and every encoded frame into `dir`, then make
    /// `dir` the document's home. Existing files not in the manifest are
    /// left in place.
    pub fn save_to(&mut self, dir: impl Into<PathBuf>) -> Result<(), PackageError> {
        let dir = dir.into();
        write_all(&dir, &self.manifest, &self.stack)?;
        self.dir = dir;
        Ok(())
    }
}

fn write_all(dir: &Path, manifest: &Manifest, stack: &[FrameRecord]) -> Result<(), PackageError> {
    create_dir(dir)?;
    manifest.save(dir)?;
    for rec in stack {
        write_file(&dir.join(&rec.path), &encode(&rec.frame))?;
    }
    log::info!("saved {} frames to {}", stack.len(), dir.display());
    Ok(())
}
