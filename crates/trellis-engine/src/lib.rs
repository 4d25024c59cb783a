//! Trellis engine crate.
//!
//! Turns pointer drops into structural edits of a frame tree: geometry,
//! drop classification, insertion with box wrapping, the editor session,
//! and the template resources new frames are made from.

pub mod coords;
pub mod drop;
pub mod edit;
pub mod logging;
pub mod resource;

pub use drop::{classify, DetectedPoint, DropPolicy, DropPosition, YAxis};
pub use edit::{insert, EditCommand, FieldError, FrameDraft, FrameEditor, InsertError};
pub use resource::{BuiltinResources, DirResources, FrameTemplates, ResourceError, ResourceProvider, TemplateKind};
