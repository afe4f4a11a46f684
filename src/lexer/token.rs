//! Token definitions
//!
//! A [`Token`] mirrors one entry of the host tokeniser's output: the raw text,
//! a category tag, start/end positions and the physical source line. Tokens are
//! mutable so the rewriter passes can replace strings and slide columns.
//!
//! Tokens built from a bare string (see [`Token::pattern`]) carry no positions
//! and are used as match patterns by the translation tables.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::Serialize;

use crate::error::TranspileError;

/// A point in the source: 1-based line, 0-based column (in characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Same line, column moved by `delta` (clamped at zero).
    pub fn shifted(self, delta: isize) -> Self {
        let col = (self.col as isize + delta).max(0) as usize;
        Self { line: self.line, col }
    }

    /// Position reached after writing `text` starting here.
    pub fn advance_over(self, text: &str) -> Self {
        let (breaks, tail) = text_extent(text);
        if breaks == 0 {
            Self::new(self.line, self.col + tail)
        } else {
            Self::new(self.line + breaks, tail)
        }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.line + rhs.line, self.col + rhs.col)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(
            self.line.saturating_sub(rhs.line),
            self.col.saturating_sub(rhs.col),
        )
    }
}

impl From<(usize, usize)> for Position {
    fn from((line, col): (usize, usize)) -> Self {
        Position::new(line, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}

/// Number of line breaks in `text` and the character length of the fragment
/// after the last one. `\r\n`, `\n` and a lone `\r` each count as one break.
pub fn text_extent(text: &str) -> (usize, usize) {
    let mut breaks = 0;
    let mut tail = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                breaks += 1;
                tail = 0;
            }
            '\n' => {
                breaks += 1;
                tail = 0;
            }
            _ => tail += 1,
        }
    }
    (breaks, tail)
}

/// Token categories of the host tokeniser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenKind {
    Name,
    Number,
    String,
    /// Every operator and delimiter (`+`, `**=`, `(`, `:` ...)
    Op,
    /// End of a logical line
    Newline,
    /// Non-logical line break (blank lines, comment lines, inside brackets)
    Nl,
    Comment,
    Indent,
    Dedent,
    EndMarker,
    /// A character the host tokeniser does not recognise (e.g. `$`)
    ErrorToken,
}

impl TokenKind {
    pub fn is_line_break(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Nl)
    }

    /// Structural tokens that carry no source text of their own.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            TokenKind::Indent | TokenKind::Dedent | TokenKind::EndMarker
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Name => "NAME",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Op => "OP",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Nl => "NL",
            TokenKind::Comment => "COMMENT",
            TokenKind::Indent => "INDENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::EndMarker => "ENDMARKER",
            TokenKind::ErrorToken => "ERRORTOKEN",
        };
        f.write_str(name)
    }
}

/// Exact punctuation recognised by the host tokeniser.
pub const PUNCTUATION: &[&str] = &[
    "**=", "//=", ">>=", "<<=", "...", "!=", "->", ":=", "**", "//", "<<", ">>", "<=", ">=",
    "==", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "@=", "+", "-", "*", "/", "%", "@",
    "&", "|", "^", "~", "<", ">", "(", ")", "[", "]", "{", "}", ",", ":", ".", ";", "=",
];

/// Reserved words of the host language.
pub const HOST_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

pub fn is_punctuation(text: &str) -> bool {
    PUNCTUATION.contains(&text)
}

pub fn is_host_keyword(text: &str) -> bool {
    HOST_KEYWORDS.contains(&text)
}

pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

fn is_numeric(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// A lexical token.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub string: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub start: Option<Position>,
    pub end: Option<Position>,
    /// Physical source line(s) the token was read from
    #[serde(skip)]
    pub line: String,
    /// Start in the untouched source. Rewrites move `start` but keep this.
    #[serde(skip)]
    pub origin: Option<Position>,
}

impl Token {
    /// Concrete token as produced by the tokeniser.
    pub fn new(
        kind: TokenKind,
        string: impl Into<String>,
        start: Position,
        end: Position,
        line: impl Into<String>,
    ) -> Self {
        Self {
            string: string.into(),
            kind,
            start: Some(start),
            end: Some(end),
            line: line.into(),
            origin: Some(start),
        }
    }

    /// Infer a token category from bare text: punctuation is OP,
    /// identifier-shaped text is NAME, digit-shaped text is NUMBER.
    pub fn infer_kind(text: &str) -> Option<TokenKind> {
        if is_punctuation(text) {
            Some(TokenKind::Op)
        } else if is_identifier(text) {
            Some(TokenKind::Name)
        } else if is_numeric(text) {
            Some(TokenKind::Number)
        } else {
            None
        }
    }

    /// Abstract token (no positions) used as a pattern or replacement.
    pub fn pattern(text: &str) -> Result<Self, TranspileError> {
        let kind = Self::infer_kind(text).ok_or_else(|| TranspileError::InvalidToken {
            text: text.to_string(),
            message: "cannot infer a token type".to_string(),
        })?;
        Ok(Self {
            string: text.to_string(),
            kind,
            start: None,
            end: None,
            line: String::new(),
            origin: None,
        })
    }

    /// Generated token placed at `start`, end computed from its text. It has
    /// no origin in the source.
    pub fn placed(kind: TokenKind, text: &str, start: Position) -> Self {
        let mut tok = Self::new(kind, text, start, start.advance_over(text), String::new());
        tok.origin = None;
        tok
    }

    /// Where the token was written in the source, falling back to its
    /// current start for generated tokens.
    pub fn source_start(&self) -> Option<Position> {
        self.origin.or(self.start)
    }

    /// NAME or NUMBER: tokens that need a separating space when adjacent.
    pub fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Name | TokenKind::Number)
    }

    pub fn is_name(&self, text: &str) -> bool {
        self.kind == TokenKind::Name && self.string == text
    }

    pub fn is_op(&self, text: &str) -> bool {
        self.kind == TokenKind::Op && self.string == text
    }

    /// Line of the start position, if any.
    pub fn start_line(&self) -> Option<usize> {
        self.start.map(|p| p.line)
    }

    /// End position, computing it from the text when it is absent.
    pub fn effective_end(&self) -> Option<Position> {
        self.end
            .or_else(|| self.start.map(|s| s.advance_over(&self.string)))
    }

    /// Slide the token `delta` columns if it starts on `line`. The end moves
    /// only when it lies on the same line (multi-line strings keep their tail).
    pub fn displace(&mut self, line: usize, delta: isize) {
        let Some(start) = self.start else { return };
        if start.line != line || delta == 0 {
            return;
        }
        self.start = Some(start.shifted(delta));
        if let Some(end) = self.end {
            if end.line == line {
                self.end = Some(end.shifted(delta));
            }
        }
    }

    /// Copy of this token moved so that it starts at `start`.
    pub fn relocated(&self, start: Position) -> Token {
        let mut tok = self.clone();
        let old = self.start.unwrap_or(start);
        tok.start = Some(start);
        tok.end = match self.effective_end() {
            Some(end) if end.line == old.line => {
                Some(Position::new(
                    start.line,
                    start.col + end.col.saturating_sub(old.col),
                ))
            }
            Some(end) => Some(Position::new(start.line + (end.line - old.line), end.col)),
            None => Some(start.advance_over(&self.string)),
        };
        tok
    }
}

/// String and type always compare; positions only when both sides have them.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        if self.string != other.string || self.kind != other.kind {
            return false;
        }
        let same = |a: Option<Position>, b: Option<Position>| match (a, b) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        same(self.start, other.start) && same(self.end, other.end)
    }
}

impl FromStr for Token {
    type Err = TranspileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Token::pattern(s)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (Some(s), Some(e)) => write!(
                f,
                "{},{}-{},{}:\t{}\t{:?}",
                s.line, s.col, e.line, e.col, self.kind, self.string
            ),
            _ => write!(f, "{}\t{:?}", self.kind, self.string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_arithmetic() {
        let a = Position::new(3, 10);
        let b = Position::new(1, 4);
        assert_eq!(a + b, Position::new(4, 14));
        assert_eq!(a - b, Position::new(2, 6));
        assert_eq!(a.shifted(-20), Position::new(3, 0));
        assert!(Position::new(1, 9) < Position::new(2, 0));
    }

    #[test]
    fn test_advance_over_multiline() {
        let p = Position::new(2, 4).advance_over("'''ab\ncd\r\nxyz'''");
        assert_eq!(p, Position::new(4, 6));
        assert_eq!(Position::new(1, 0).advance_over("então"), Position::new(1, 5));
    }

    #[test]
    fn test_pattern_infers_kind() {
        assert_eq!(Token::pattern(":").unwrap().kind, TokenKind::Op);
        assert_eq!(Token::pattern("**=").unwrap().kind, TokenKind::Op);
        assert_eq!(Token::pattern("então").unwrap().kind, TokenKind::Name);
        assert_eq!(Token::pattern("42").unwrap().kind, TokenKind::Number);
        assert!(Token::pattern("a b").is_err());
        assert!(Token::pattern("").is_err());
        assert!("$".parse::<Token>().is_err());
    }

    #[test]
    fn test_equality_ignores_missing_positions() {
        let concrete = Token::placed(TokenKind::Name, "se", Position::new(1, 0));
        let other = Token::placed(TokenKind::Name, "se", Position::new(2, 0));
        let pattern = Token::pattern("se").unwrap();
        assert_eq!(concrete, pattern);
        assert_ne!(concrete, other);
        assert_ne!(Token::pattern("se").unwrap(), Token::pattern("if").unwrap());
    }

    #[test]
    fn test_displace_only_on_line() {
        let mut tok = Token::placed(TokenKind::Name, "x", Position::new(1, 5));
        tok.displace(2, 3);
        assert_eq!(tok.start, Some(Position::new(1, 5)));
        tok.displace(1, -2);
        assert_eq!(tok.start, Some(Position::new(1, 3)));
        assert_eq!(tok.end, Some(Position::new(1, 4)));

        let mut s = Token::placed(TokenKind::String, "'''a\nbc'''", Position::new(1, 4));
        s.displace(1, 2);
        assert_eq!(s.start, Some(Position::new(1, 6)));
        assert_eq!(s.end, Some(Position::new(2, 5)));
    }

    #[test]
    fn test_origin_survives_moves() {
        let tok = Token::new(TokenKind::Name, "de", Position::new(1, 7), Position::new(1, 9), "");
        let mut moved = tok.relocated(Position::new(1, 4));
        moved.displace(1, 1);
        assert_eq!(moved.start, Some(Position::new(1, 5)));
        assert_eq!(moved.source_start(), Some(Position::new(1, 7)));

        let generated = Token::placed(TokenKind::Name, "in", Position::new(1, 3));
        assert_eq!(generated.origin, None);
        assert_eq!(generated.source_start(), Some(Position::new(1, 3)));
    }

    #[test]
    fn test_relocated_keeps_width() {
        let tok = Token::placed(TokenKind::Number, "10", Position::new(1, 7));
        let moved = tok.relocated(Position::new(1, 2));
        assert_eq!(moved.end, Some(Position::new(1, 4)));
    }
}
