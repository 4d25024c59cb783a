use crate::error::LexError;

// ── Token ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Bool(bool),
    Str(String),
    UInt(u64),
    Int(i64),
    Float(f64),
    Ident(String),
    /// Body of a `//` or `/* */` comment, delimiters stripped.
    Comment(String),
    /// Single punctuation character: one of `{ } [ ] : , . ( )`.
    Symbol(char),
    /// Raw contents of a `%{ ... }%` block, kept verbatim.
    Text(String),
    // Sentinel
    Eof,
}

impl Token {
    pub fn is_symbol(&self, c: char) -> bool {
        matches!(self, Token::Symbol(s) if *s == c)
    }

    /// Human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Bool(b) => format!("boolean `{b}`"),
            Token::Str(s) => format!("string {s:?}"),
            Token::UInt(u) => format!("number `{u}`"),
            Token::Int(i) => format!("number `{i}`"),
            Token::Float(x) => format!("number `{x:?}`"),
            Token::Ident(s) => format!("identifier `{s}`"),
            Token::Comment(_) => "comment".to_string(),
            Token::Symbol(c) => format!("symbol `{c}`"),
            Token::Text(_) => "text block".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

/// A token together with the position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPos {
    pub token: Token,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub col: usize,
}

const SYMBOLS: &[char] = &['{', '}', '[', ']', ':', ',', '.', '(', ')'];

/// True when `name` lexes back as a single [`Token::Ident`], which is what a
/// slot name must be. `true` and `false` lex as booleans and are excluded.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !matches!(name, "true" | "false")
}

// ── Lexer ─────────────────────────────────────────────────────────────────

pub struct Lexer<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
    col: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0, line: 1, col: 1 }
    }

    /// Lex the whole source. The returned stream always ends with `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<TokenWithPos>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let (line, col) = (self.line, self.col);
            let token = self.next_token()?;
            let eof = token == Token::Eof;
            tokens.push(TokenWithPos { token, line, col });
            if eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn err(&self, msg: impl Into<String>) -> LexError {
        LexError::new(msg, self.line)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let ch = match self.peek() {
            None => return Ok(Token::Eof),
            Some(c) => c,
        };

        match ch {
            '"' => self.lex_string(),
            '/' => self.lex_comment(),
            '%' => self.lex_text_block(),
            c if SYMBOLS.contains(&c) => {
                self.advance();
                Ok(Token::Symbol(c))
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' => self.lex_number(),
            c if c.is_alphabetic() || c == '_' => Ok(self.lex_ident_or_keyword()),
            other => Err(self.err(format!("unexpected character {other:?}"))),
        }
    }

    fn lex_string(&mut self) -> Result<Token, LexError> {
        let start_line = self.line;
        self.advance(); // consume opening `"`
        let mut s = String::new();
        loop {
            match self.advance() {
                None => {
                    return Err(LexError::new("unterminated string literal", start_line));
                }
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some('"') => s.push('"'),
                    Some('\\') => s.push('\\'),
                    Some(c) => s.push(c),
                    None => return Err(self.err("unterminated escape sequence")),
                },
                Some(c) => s.push(c),
            }
        }
        Ok(Token::Str(s))
    }

    fn lex_comment(&mut self) -> Result<Token, LexError> {
        let start_line = self.line;
        match self.peek_second() {
            Some('/') => {
                self.advance();
                self.advance();
                let start = self.pos;
                while !matches!(self.peek(), None | Some('\n')) {
                    self.advance();
                }
                Ok(Token::Comment(self.src[start..self.pos].to_string()))
            }
            Some('*') => {
                self.advance();
                self.advance();
                let start = self.pos;
                loop {
                    if self.rest().starts_with("*/") {
                        let body = self.src[start..self.pos].to_string();
                        self.advance();
                        self.advance();
                        return Ok(Token::Comment(body));
                    }
                    if self.advance().is_none() {
                        return Err(LexError::new("unterminated block comment", start_line));
                    }
                }
            }
            _ => Err(self.err("unexpected character '/'")),
        }
    }

    fn lex_text_block(&mut self) -> Result<Token, LexError> {
        if self.peek_second() != Some('{') {
            return Err(self.err("unexpected character '%' (text blocks open with `%{`)"));
        }
        let start_line = self.line;
        self.advance();
        self.advance(); // consume `%{`
        let start = self.pos;
        loop {
            if self.rest().starts_with("}%") {
                let body = self.src[start..self.pos].to_string();
                self.advance();
                self.advance();
                return Ok(Token::Text(body));
            }
            if self.advance().is_none() {
                return Err(LexError::new("unterminated text block, expected `}%`", start_line));
            }
        }
    }

    fn eat_digits(&mut self) -> usize {
        let mut count = 0;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
            count += 1;
        }
        count
    }

    /// Numbers: bare digits are unsigned, a leading sign makes them signed,
    /// and a fraction or exponent makes them floats. `+inf`, `-inf` and
    /// `+nan` are the non-finite float literals.
    fn lex_number(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let sign = match self.peek() {
            Some(c @ ('-' | '+')) => {
                self.advance();
                Some(c)
            }
            _ => None,
        };
        if let Some(sign) = sign {
            if let Some(x) = self.lex_non_finite(sign) {
                return Ok(Token::Float(x));
            }
        }
        if self.eat_digits() == 0 {
            return Err(self.err("expected digits after sign"));
        }

        let mut is_float = false;
        if self.peek() == Some('.') && matches!(self.peek_second(), Some(c) if c.is_ascii_digit()) {
            self.advance();
            self.eat_digits();
            is_float = true;
        }
        if matches!(self.peek(), Some('e' | 'E')) && self.exponent_follows() {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            self.eat_digits();
            is_float = true;
        }

        let s = &self.src[start..self.pos];
        let token = if is_float {
            s.parse::<f64>().map(Token::Float).ok()
        } else if sign.is_some() {
            s.parse::<i64>().map(Token::Int).ok()
        } else {
            s.parse::<u64>().map(Token::UInt).ok()
        };
        token.ok_or_else(|| self.err(format!("invalid number {s:?}")))
    }

    /// Consume `inf` or `nan` right after a sign, when the whole word is one
    /// of them.
    fn lex_non_finite(&mut self, sign: char) -> Option<f64> {
        let rest = self.rest();
        let word_len = rest.find(|c: char| !(c.is_alphanumeric() || c == '_')).unwrap_or(rest.len());
        let x = match &rest[..word_len] {
            "inf" if sign == '-' => f64::NEG_INFINITY,
            "inf" => f64::INFINITY,
            "nan" => f64::NAN,
            _ => return None,
        };
        for _ in 0..word_len {
            self.advance();
        }
        Some(x)
    }

    /// True when the `e`/`E` at the cursor starts a well-formed exponent.
    fn exponent_follows(&self) -> bool {
        let mut chars = self.rest().chars().skip(1);
        match chars.next() {
            Some('+' | '-') => matches!(chars.next(), Some(c) if c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    fn lex_ident_or_keyword(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        match &self.src[start..self.pos] {
            "true" => Token::Bool(true),
            "false" => Token::Bool(false),
            word => Token::Ident(word.to_string()),
        }
    }
}
