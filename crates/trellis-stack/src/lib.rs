//! Trellis packages on disk.
//!
//! A package is a directory holding `manifest.json` and the frame scripts
//! it lists:
//!
//! ```text
//! demo.astack/
//!     manifest.json      { "scripts": ["main.as"] }
//!     main.as
//! ```
//!
//! [`Package`] gives raw access to the files. [`Document`] parses every
//! script into a [`Frame`](trellis_script::Frame) and writes encoded
//! frames back.

pub mod document;
pub mod manifest;
pub mod package;

pub use document::{Document, FrameRecord};
pub use manifest::{Manifest, ManifestError, MANIFEST_FILE};
pub use package::{Package, PackageError};
