//! Where frame templates and other package files come from.
//!
//! Nothing here searches well-known directories: callers pass a
//! [`ResourceProvider`] explicitly, either a directory ([`DirResources`]),
//! the templates compiled into this crate ([`BuiltinResources`]), or a
//! package.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use trellis_script::{parse_str, Frame, FrameError, ScriptError};

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no resource at {}", .0.display())]
    NotFound(PathBuf),
    #[error("{}: {source}", .path.display())]
    Script {
        path: PathBuf,
        #[source]
        source: ScriptError,
    },
    #[error("{}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: FrameError,
    },
}

/// Read-only access to text resources by relative path.
pub trait ResourceProvider {
    /// Full location of `path` as this provider sees it.
    fn resolve(&self, path: &Path) -> PathBuf;

    fn read_text(&self, path: &Path) -> Result<String, ResourceError>;
}

impl<P: ResourceProvider + ?Sized> ResourceProvider for &P {
    fn resolve(&self, path: &Path) -> PathBuf {
        (**self).resolve(path)
    }

    fn read_text(&self, path: &Path) -> Result<String, ResourceError> {
        (**self).read_text(path)
    }
}

// ── DirResources ──────────────────────────────────────────────────────────

/// Resources under a directory on disk.
#[derive(Debug, Clone)]
pub struct DirResources {
    root: PathBuf,
}

impl DirResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceProvider for DirResources {
    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    fn read_text(&self, path: &Path) -> Result<String, ResourceError> {
        let full = self.resolve(path);
        std::fs::read_to_string(&full).map_err(|source| ResourceError::Io { path: full, source })
    }
}

// ── BuiltinResources ──────────────────────────────────────────────────────

const BUILTIN: &[(&str, &str)] = &[
    ("frames/Box.as", include_str!("../frames/Box.as")),
    ("frames/HBox.as", include_str!("../frames/HBox.as")),
    ("frames/Button.as", include_str!("../frames/Button.as")),
    ("frames/Image.as", include_str!("../frames/Image.as")),
];

/// The default templates shipped inside the crate.
#[derive(Debug, Copy, Clone, Default)]
pub struct BuiltinResources;

impl BuiltinResources {
    pub fn paths() -> impl Iterator<Item = &'static str> {
        BUILTIN.iter().map(|(path, _)| *path)
    }
}

impl ResourceProvider for BuiltinResources {
    fn resolve(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }

    fn read_text(&self, path: &Path) -> Result<String, ResourceError> {
        BUILTIN
            .iter()
            .find(|(name, _)| Path::new(name) == path)
            .map(|(_, text)| text.to_string())
            .ok_or_else(|| ResourceError::NotFound(path.to_path_buf()))
    }
}

// ── FrameTemplates ────────────────────────────────────────────────────────

/// The palette of frames a user can drop into a document.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Box,
    HBox,
    Button,
    Image,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [TemplateKind::Box, TemplateKind::HBox, TemplateKind::Button, TemplateKind::Image];

    pub fn path(self) -> &'static Path {
        Path::new(match self {
            TemplateKind::Box => "frames/Box.as",
            TemplateKind::HBox => "frames/HBox.as",
            TemplateKind::Button => "frames/Button.as",
            TemplateKind::Image => "frames/Image.as",
        })
    }

    /// Default slot name for a dropped frame of this kind.
    pub fn slot_name(self) -> &'static str {
        match self {
            TemplateKind::Box => "box",
            TemplateKind::HBox => "hbox",
            TemplateKind::Button => "button",
            TemplateKind::Image => "image",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slot_name())
    }
}

impl FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "box" | "vbox" => Ok(TemplateKind::Box),
            "hbox" => Ok(TemplateKind::HBox),
            "button" => Ok(TemplateKind::Button),
            "image" => Ok(TemplateKind::Image),
            other => Err(format!("unknown template {other:?} (expected box, hbox, button or image)")),
        }
    }
}

/// Parses and validates frame templates from a provider. Every call
/// returns a fresh tree without frame ids.
#[derive(Debug, Clone)]
pub struct FrameTemplates<P> {
    provider: P,
}

impl<P: ResourceProvider> FrameTemplates<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<Frame, ResourceError> {
        let path = path.as_ref();
        let text = self.provider.read_text(path)?;
        let frame = parse_str(&text).map_err(|source| ResourceError::Script { path: path.to_path_buf(), source })?;
        frame
            .validate()
            .map_err(|source| ResourceError::Invalid { path: path.to_path_buf(), source })?;
        log::debug!("loaded template {}", path.display());
        Ok(frame)
    }

    pub fn get(&self, kind: TemplateKind) -> Result<Frame, ResourceError> {
        self.load(kind.path())
    }

    pub fn box_frame(&self) -> Result<Frame, ResourceError> {
        self.get(TemplateKind::Box)
    }

    pub fn hbox_frame(&self) -> Result<Frame, ResourceError> {
        self.get(TemplateKind::HBox)
    }

    pub fn button(&self) -> Result<Frame, ResourceError> {
        self.get(TemplateKind::Button)
    }

    pub fn image(&self) -> Result<Frame, ResourceError> {
        self.get(TemplateKind::Image)
    }
}

impl FrameTemplates<BuiltinResources> {
    /// Templates compiled into this crate.
    pub fn builtin() -> Self {
        Self::new(BuiltinResources)
    }
}
