//! Tokenizer, parser, frame tree, and encoder for **Trellis frame script**
//! (`.as`).
//!
//! A frame script describes one tree of boxes and leaf widgets. Every frame
//! is a brace-delimited list of `name: value` slots, in order:
//!
//! ```text
//! {
//!     class: "HBox"
//!     ok: {
//!         class: "Button"
//!         title: "OK"
//!         clicked: event %{ console.log("clicked"); }%
//!     }
//! }
//! ```
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`value`] | `Value` scalar type |
//! | [`lexer`] | `Lexer`, `Token`, `TokenWithPos` |
//! | [`parser`] | `Parser`, `parse_str` entry point |
//! | [`frame`] | `Frame`, `Slot`, `SlotValue`, `FrameClass` |
//! | [`encoder`] | `encode` |
//! | [`ids`] | frame-ID assignment and search |
//! | [`error`] | `LexError`, `ParseError`, `ScriptError`, `FrameError` |
//!
//! # Quick start
//!
//! ```rust
//! use trellis_script::{encode, parse_str, FrameClass};
//!
//! let src = r#"{ class: "VBox"  ok: { class: "Button"  title: "OK" } }"#;
//! let mut root = parse_str(src).unwrap();
//! assert_eq!(root.frame_class(), Ok(FrameClass::VBox));
//!
//! trellis_script::ids::init_frame_ids(&mut root);
//! let text = encode(&root);
//! assert_eq!(parse_str(&text).unwrap(), root);
//! ```

pub mod encoder;
pub mod error;
pub mod frame;
pub mod ids;
pub mod lexer;
pub mod parser;
pub mod value;

pub use encoder::encode;
pub use error::{FrameError, LexError, ParseError, ScriptError};
pub use frame::{is_child_slot_name, Axis, Frame, FrameClass, FrameId, Slot, SlotValue, CLASS_SLOT, FRAME_ID_SLOT};
pub use lexer::is_identifier;
pub use parser::parse_str;
pub use value::Value;
