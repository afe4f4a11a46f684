//! Lexer module - Tokenization
//!
//! Physical lexemes are recognised by the pest grammar in `python.pest`;
//! this module derives the host tokeniser's layout tokens from them
//! (NEWLINE vs NL, INDENT/DEDENT, ENDMARKER) and attaches positions.

mod token;
mod untokenize;

pub use token::*;
pub use untokenize::untokenize;

use pest::Parser;
use pest_derive::Parser;

use crate::error::TranspileError;

#[derive(Parser)]
#[grammar = "lexer/python.pest"]
struct PythonLexer;

const TAB_SIZE: usize = 8;

/// Tokenize Python source code.
///
/// A trailing newline is appended when missing. The result always ends with
/// an ENDMARKER token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, TranspileError> {
    let owned;
    let source = if source.ends_with('\n') || source.ends_with('\r') {
        source
    } else {
        owned = format!("{source}\n");
        owned.as_str()
    };

    let file = PythonLexer::parse(Rule::file, source)
        .map_err(|e| TranspileError::Tokenize {
            message: e.to_string(),
            position: Position::new(1, 0),
        })?
        .next()
        .ok_or_else(|| TranspileError::Tokenize {
            message: "empty lexeme stream".to_string(),
            position: Position::new(1, 0),
        })?;

    let mut layout = Layout::new(physical_lines(source));
    for lexeme in file.into_inner() {
        layout.feed(lexeme.as_rule(), lexeme.as_str())?;
    }
    layout.finish()?;
    Ok(layout.tokens)
}

/// Split source into physical lines, keeping each line's terminator.
pub fn physical_lines(source: &str) -> Vec<&str> {
    let bytes = source.as_bytes();
    let mut lines = Vec::new();
    let mut begin = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&source[begin..=i]);
                begin = i + 1;
            }
            b'\r' => {
                let stop = if bytes.get(i + 1) == Some(&b'\n') { i + 1 } else { i };
                lines.push(&source[begin..=stop]);
                i = stop;
                begin = stop + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if begin < source.len() {
        lines.push(&source[begin..]);
    }
    lines
}

fn indent_width(text: &str) -> usize {
    let mut col = 0;
    for c in text.chars() {
        match c {
            '\t' => col = (col / TAB_SIZE + 1) * TAB_SIZE,
            '\u{0C}' => col = 0,
            _ => col += 1,
        }
    }
    col
}

/// Layout state while walking the lexemes of one source text.
struct Layout<'s> {
    lines: Vec<&'s str>,
    tokens: Vec<Token>,
    indents: Vec<usize>,
    /// Open brackets
    depth: usize,
    /// At the start of a logical line, before any significant token
    at_line_start: bool,
    /// Current logical line produced a significant token
    line_has_content: bool,
    /// Last lexeme was a backslash continuation
    continued: bool,
    /// Leading whitespace of the current line
    pending_indent: Option<&'s str>,
    pos: Position,
}

impl<'s> Layout<'s> {
    fn new(lines: Vec<&'s str>) -> Self {
        Self {
            lines,
            tokens: Vec::new(),
            indents: vec![0],
            depth: 0,
            at_line_start: true,
            line_has_content: false,
            continued: false,
            pending_indent: None,
            pos: Position::new(1, 0),
        }
    }

    fn line_text(&self, first: usize, last: usize) -> String {
        if first == 0 || first > self.lines.len() {
            return String::new();
        }
        let last = last.min(self.lines.len());
        self.lines[first - 1..last].concat()
    }

    fn push(&mut self, kind: TokenKind, text: &str, start: Position, end: Position) {
        let line = self.line_text(start.line, end.line);
        self.tokens.push(Token::new(kind, text, start, end, line));
    }

    fn feed(&mut self, rule: Rule, text: &'s str) -> Result<(), TranspileError> {
        let start = self.pos;
        let end = start.advance_over(text);
        self.pos = end;

        match rule {
            Rule::EOI => return Ok(()),
            Rule::blank => {
                if self.at_line_start {
                    self.pending_indent = Some(text);
                }
                return Ok(());
            }
            Rule::continuation => {
                self.continued = true;
                return Ok(());
            }
            Rule::newline => {
                let kind = if self.depth == 0 && self.line_has_content {
                    TokenKind::Newline
                } else {
                    TokenKind::Nl
                };
                let same_line_end = Position::new(start.line, start.col + text.chars().count());
                self.push(kind, text, start, same_line_end);
                if self.depth == 0 {
                    self.at_line_start = true;
                    self.line_has_content = false;
                }
                self.pending_indent = None;
                self.continued = false;
                return Ok(());
            }
            Rule::comment => {
                self.push(TokenKind::Comment, text, start, end);
                self.continued = false;
                return Ok(());
            }
            Rule::bad_string => {
                let message = if text.ends_with("\"\"\"") || text.ends_with("'''") {
                    "unterminated triple-quoted string literal"
                } else {
                    "unterminated string literal"
                };
                return Err(TranspileError::Tokenize {
                    message: message.to_string(),
                    position: start,
                });
            }
            _ => {}
        }

        if self.at_line_start {
            self.open_line(start)?;
        }
        self.continued = false;

        let kind = match rule {
            Rule::string => TokenKind::String,
            Rule::number => TokenKind::Number,
            Rule::name => TokenKind::Name,
            Rule::op => {
                match text {
                    "(" | "[" | "{" => self.depth += 1,
                    ")" | "]" | "}" => self.depth = self.depth.saturating_sub(1),
                    _ => {}
                }
                TokenKind::Op
            }
            _ => TokenKind::ErrorToken,
        };
        self.push(kind, text, start, end);
        Ok(())
    }

    /// First significant token of a logical line: emit INDENT/DEDENT.
    fn open_line(&mut self, at: Position) -> Result<(), TranspileError> {
        let indent = self.pending_indent.take().unwrap_or("");
        let width = indent_width(indent);
        let top = self.indents.last().copied().unwrap_or(0);

        if width > top {
            self.indents.push(width);
            self.push(
                TokenKind::Indent,
                indent,
                Position::new(at.line, 0),
                Position::new(at.line, at.col),
            );
        } else if width < top {
            while self.indents.last().is_some_and(|&i| i > width) {
                self.indents.pop();
                self.push(TokenKind::Dedent, "", at, at);
            }
            if self.indents.last() != Some(&width) {
                return Err(TranspileError::Tokenize {
                    message: "unindent does not match any outer indentation level".to_string(),
                    position: at,
                });
            }
        }

        self.at_line_start = false;
        self.line_has_content = true;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), TranspileError> {
        if self.depth > 0 || self.continued {
            return Err(TranspileError::Tokenize {
                message: "EOF in multi-line statement".to_string(),
                position: self.pos,
            });
        }
        let at = Position::new(self.pos.line, 0);
        while self.indents.len() > 1 {
            self.indents.pop();
            self.tokens.push(Token::new(TokenKind::Dedent, "", at, at, ""));
        }
        self.tokens
            .push(Token::new(TokenKind::EndMarker, "", at, at, ""));
        Ok(())
    }
}

#[cfg(test)]
mod tests;
