use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use trellis_engine::{ResourceError, ResourceProvider};
use trellis_script::ScriptError;

use crate::manifest::{Manifest, ManifestError};

#[derive(Debug, Error)]
pub enum PackageError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("script {} listed in the manifest does not exist", .0.display())]
    MissingScript(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Script {
        path: PathBuf,
        #[source]
        source: ScriptError,
    },
}

/// A package directory: a manifest plus the frame scripts it lists.
///
/// Script text is read lazily and cached; edits made with
/// [`set_script`](Self::set_script) stay in memory until saved.
#[derive(Debug, Clone)]
pub struct Package {
    dir: PathBuf,
    manifest: Manifest,
    scripts: HashMap<String, String>,
}

impl Package {
    /// Open the package in `dir`. Every script the manifest lists must exist.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, PackageError> {
        let dir = dir.into();
        let manifest = Manifest::load(&dir)?;
        for script in &manifest.scripts {
            let path = dir.join(script);
            if !path.is_file() {
                return Err(PackageError::MissingScript(path));
            }
        }
        log::debug!("opened package {} with {} scripts", dir.display(), manifest.scripts.len());
        Ok(Self { dir, manifest, scripts: HashMap::new() })
    }

    /// An unsaved package that will live in `dir`.
    pub fn new(dir: impl Into<PathBuf>, manifest: Manifest) -> Self {
        Self { dir: dir.into(), manifest, scripts: HashMap::new() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn script_names(&self) -> &[String] {
        &self.manifest.scripts
    }

    pub fn full_path(&self, script: &str) -> PathBuf {
        self.dir.join(script)
    }

    /// Text of `script`, read from disk on first use.
    pub fn script(&mut self, script: &str) -> Result<&str, PackageError> {
        if !self.scripts.contains_key(script) {
            let path = self.full_path(script);
            let text = std::fs::read_to_string(&path).map_err(|source| PackageError::Read { path, source })?;
            self.scripts.insert(script.to_string(), text);
        }
        match self.scripts.get(script) {
            Some(text) => Ok(text),
            None => Err(PackageError::MissingScript(self.full_path(script))),
        }
    }

    /// Replace the text of `script`, listing it in the manifest if it is new.
    pub fn set_script(&mut self, script: impl Into<String>, text: impl Into<String>) {
        let script = script.into();
        self.manifest.add(script.clone());
        self.scripts.insert(script, text.into());
    }

    pub fn save(&mut self) -> Result<(), PackageError> {
        let dir = self.dir.clone();
        self.save_to(&dir)
    }

    /// Write the manifest and every listed script into `dir`, creating it
    /// when missing. Files not listed are left alone.
    pub fn save_to(&mut self, dir: &Path) -> Result<(), PackageError> {
        create_dir(dir)?;
        self.manifest.save(dir)?;
        for name in self.manifest.scripts.clone() {
            let text = self.script(&name)?.to_string();
            write_file(&dir.join(&name), &text)?;
        }
        log::info!("saved package to {}", dir.display());
        Ok(())
    }
}

impl ResourceProvider for Package {
    fn resolve(&self, path: &Path) -> PathBuf {
        self.dir.join(path)
    }

    fn read_text(&self, path: &Path) -> Result<String, ResourceError> {
        if let Some(text) = path.to_str().and_then(|key| self.scripts.get(key)) {
            return Ok(text.clone());
        }
        let full = self.resolve(path);
        std::fs::read_to_string(&full).map_err(|source| ResourceError::Io { path: full, source })
    }
}

pub(crate) fn create_dir(dir: &Path) -> Result<(), PackageError> {
    std::fs::create_dir_all(dir).map_err(|source| PackageError::Write { path: dir.to_path_buf(), source })
}

/// Write `text` to `path`, creating parent directories of nested scripts.
pub(crate) fn write_file(path: &Path, text: &str) -> Result<(), PackageError> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    std::fs::write(path, text).map_err(|source| PackageError::Write { path: path.to_path_buf(), source })
}
