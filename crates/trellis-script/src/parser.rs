use crate::error::{ParseError, ScriptError};
use crate::frame::{Frame, SlotValue};
use crate::lexer::{Lexer, Token, TokenWithPos};
use crate::value::Value;

// ── Parser ────────────────────────────────────────────────────────────────

/// Recursive-descent parser over a lexed token stream.
///
/// Comment tokens are trivia: the cursor steps over them wherever they
/// appear, and they never stand in for a value.
pub struct Parser {
    tokens: Vec<TokenWithPos>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithPos>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Index of the next non-comment token at or after the cursor.
    fn next_index(&self) -> usize {
        let mut i = self.pos;
        while matches!(self.tokens.get(i), Some(t) if matches!(t.token, Token::Comment(_))) {
            i += 1;
        }
        i
    }

    fn current_line(&self) -> usize {
        self.tokens
            .get(self.next_index())
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.next_index()).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        self.pos = self.next_index();
        let tok = self.tokens.get(self.pos)
            .map(|t| t.token.clone())
            .unwrap_or(Token::Eof);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        ParseError::new(msg, self.current_line())
    }

    /// Error pointing at the token just consumed by [`advance`](Self::advance).
    fn err_prev(&self, msg: impl Into<String>) -> ParseError {
        let line = self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.line)
            .unwrap_or_else(|| self.current_line());
        ParseError::new(msg, line)
    }

    fn require_ident(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            Token::Ident(s) => Ok(s),
            tok => Err(self.err_prev(format!("expected slot name, got {}", tok.describe()))),
        }
    }

    fn require_symbol(&mut self, c: char) -> Result<(), ParseError> {
        match self.advance() {
            Token::Symbol(s) if s == c => Ok(()),
            tok => Err(self.err_prev(format!("expected `{c}`, got {}", tok.describe()))),
        }
    }

    fn require_text(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            Token::Text(text) => Ok(text),
            tok => Err(self.err_prev(format!(
                "expected `%{{ ... }}%` block after `event`, got {}",
                tok.describe()
            ))),
        }
    }

    // ── Document ──────────────────────────────────────────────────────────

    /// Parse exactly one root frame followed by end of input.
    pub fn parse_document(&mut self) -> Result<Frame, ParseError> {
        let root = self.parse_frame()?;
        match self.peek() {
            Token::Eof => Ok(root),
            tok => {
                let msg = format!("unexpected {} after the root frame", tok.describe());
                Err(self.err(msg))
            }
        }
    }

    // ── Frame ─────────────────────────────────────────────────────────────

    /// `frame := '{' slot* '}'`
    pub fn parse_frame(&mut self) -> Result<Frame, ParseError> {
        self.require_symbol('{')?;
        let mut frame = Frame::new();
        loop {
            match self.peek() {
                Token::Symbol('}') => {
                    self.advance();
                    break;
                }
                Token::Eof => return Err(self.err("unclosed `{` block")),
                _ => {
                    let (name, value) = self.parse_slot()?;
                    frame.set(name, value);
                }
            }
        }
        Ok(frame)
    }

    // ── Slot ──────────────────────────────────────────────────────────────

    /// `slot := identifier ':' value`
    fn parse_slot(&mut self) -> Result<(String, SlotValue), ParseError> {
        let name = self.require_ident()?;
        self.require_symbol(':')?;
        let value = self.parse_value()?;
        Ok((name, value))
    }

    // ── Value ─────────────────────────────────────────────────────────────

    fn parse_value(&mut self) -> Result<SlotValue, ParseError> {
        if self.peek().is_symbol('{') {
            return self.parse_frame().map(SlotValue::Frame);
        }
        match self.advance() {
            Token::Bool(b) => Ok(SlotValue::Value(Value::Bool(b))),
            Token::Str(s) => Ok(SlotValue::Value(Value::Str(s))),
            Token::UInt(u) => Ok(SlotValue::Value(Value::UInt(u))),
            Token::Int(i) => Ok(SlotValue::Value(Value::Int(i))),
            Token::Float(x) => Ok(SlotValue::Value(Value::Float(x))),
            Token::Ident(ident) => match ident.as_str() {
                "nil" => Ok(SlotValue::Value(Value::Nil)),
                "event" => self.parse_event(),
                _ => self.parse_path(ident).map(SlotValue::Path),
            },
            Token::Symbol('[') => self.parse_array().map(|items| SlotValue::Value(Value::Array(items))),
            Token::Text(_) => Err(self.err_prev("unexpected text block, text blocks must follow `event`")),
            tok => Err(self.err_prev(format!("expected a value, got {}", tok.describe()))),
        }
    }

    /// `'event' ['(' ')'] textBlock`, with `event` already consumed.
    fn parse_event(&mut self) -> Result<SlotValue, ParseError> {
        if self.peek().is_symbol('(') {
            self.advance();
            self.require_symbol(')')?;
        }
        self.require_text().map(SlotValue::Event)
    }

    /// `path := identifier ('.' identifier)*`, with the head already consumed.
    fn parse_path(&mut self, head: String) -> Result<Vec<String>, ParseError> {
        let mut path = vec![head];
        while self.peek().is_symbol('.') {
            self.advance();
            match self.advance() {
                Token::Ident(ident) => path.push(ident),
                tok => {
                    return Err(self.err_prev(format!(
                        "expected identifier after `.`, got {}",
                        tok.describe()
                    )));
                }
            }
        }
        Ok(path)
    }

    /// Elements up to the closing `]`, with `[` already consumed.
    fn parse_array(&mut self) -> Result<Vec<Value>, ParseError> {
        let mut items = Vec::new();
        if self.peek().is_symbol(']') {
            self.advance();
            return Ok(items);
        }
        loop {
            let line = self.current_line();
            match self.parse_value()? {
                SlotValue::Value(Value::Array(_)) | SlotValue::Frame(_) | SlotValue::Event(_) | SlotValue::Path(_) => {
                    return Err(ParseError::new("array element must be a scalar value", line));
                }
                SlotValue::Value(v) => items.push(v),
            }
            match self.advance() {
                Token::Symbol(',') => continue,
                Token::Symbol(']') => break,
                tok => {
                    return Err(self.err_prev(format!(
                        "expected `,` or `]` in array, got {}",
                        tok.describe()
                    )));
                }
            }
        }
        Ok(items)
    }
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Parse frame script source into its root [`Frame`].
pub fn parse_str(src: &str) -> Result<Frame, ScriptError> {
    let tokens = Lexer::new(src).tokenize()?;
    let frame = Parser::new(tokens).parse_document()?;
    log::trace!("parsed frame with {} top-level slots", frame.len());
    Ok(frame)
}
