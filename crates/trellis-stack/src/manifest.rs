use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the manifest inside a package directory.
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Error)]
pub enum ManifestError {
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
    #[error("{}: invalid manifest: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// The list of frame scripts in a package, relative to the package
/// directory, in stack order.
///
/// ```json
/// { "scripts": ["main.as", "about.as"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub scripts: Vec<String>,
}

impl Manifest {
    pub fn new(scripts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { scripts: scripts.into_iter().map(Into::into).collect() }
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILE)
    }

    /// Read `manifest.json` from a package directory.
    pub fn load(dir: &Path) -> Result<Self, ManifestError> {
        let path = Self::path_in(dir);
        let text = std::fs::read_to_string(&path).map_err(|source| ManifestError::Read { path: path.clone(), source })?;
        serde_json::from_str(&text).map_err(|source| ManifestError::Invalid { path, source })
    }

    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, ManifestError> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }

    /// Write `manifest.json` into `dir`, which must exist.
    pub fn save(&self, dir: &Path) -> Result<(), ManifestError> {
        let path = Self::path_in(dir);
        let text = self.to_json()?;
        std::fs::write(&path, text).map_err(|source| ManifestError::Write { path, source })
    }

    pub fn contains(&self, script: &str) -> bool {
        self.scripts.iter().any(|s| s == script)
    }

    /// Append `script` unless it is already listed.
    pub fn add(&mut self, script: impl Into<String>) {
        let script = script.into();
        if !self.contains(&script) {
            self.scripts.push(script);
        }
    }
}
