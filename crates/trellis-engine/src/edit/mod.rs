//! Tree edits: drop insertion, the editor session, and per-frame drafts.

mod draft;
mod editor;
mod insert;

pub use draft::{Field, FieldError, FieldKind, FrameDraft};
pub use editor::{EditCommand, FrameEditor};
pub use insert::{insert, InsertError};
