use thiserror::Error;

/// A malformed token in frame script source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("frame script lex error at line {line}: {message}")]
pub struct LexError {
    pub message: String,
    /// 1-based source line number where the error occurred.
    pub line: usize,
}

impl LexError {
    pub(crate) fn new(msg: impl Into<String>, line: usize) -> Self {
        Self { message: msg.into(), line }
    }
}

/// A grammar violation in an otherwise well-formed token stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("frame script parse error at line {line}: {message}")]
pub struct ParseError {
    pub message: String,
    /// 1-based source line number of the offending token.
    pub line: usize,
}

impl ParseError {
    pub(crate) fn new(msg: impl Into<String>, line: usize) -> Self {
        Self { message: msg.into(), line }
    }
}

/// Any failure while turning source text into a [`Frame`](crate::Frame).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ScriptError {
    /// Source line the error points at.
    pub fn line(&self) -> usize {
        match self {
            ScriptError::Lex(e) => e.line,
            ScriptError::Parse(e) => e.line,
        }
    }
}

/// A frame whose reserved slots contradict the frame model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("unknown frame class {0:?}")]
    UnknownClass(String),
    #[error("the `class` slot must hold a string, found {0}")]
    ClassNotString(String),
    #[error("the `frameid` slot must hold a non-negative integer, found {0}")]
    InvalidFrameId(String),
    #[error("{class} frame cannot hold child frame in slot `{slot}`")]
    ChildInLeaf { class: String, slot: String },
    #[error("box frame cannot hold event in slot `{slot}`")]
    EventInBox { slot: String },
}
