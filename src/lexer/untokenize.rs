//! Token list back to source text
//!
//! The inverse of [`tokenize`](super::tokenize): walks the tokens with a pen
//! position, filling the gap up to each token's start column. Indentation
//! text is replayed from the INDENT tokens, and gaps in front of source tokens
//! are copied from their line, so tabs survive the round trip.

use super::token::{Position, Token, TokenKind};
use crate::error::TranspileError;

/// Reassemble source text from a token list.
///
/// Tokens whose start lies behind the pen are moved up to it; two word tokens
/// that would touch are separated by exactly one space.
pub fn untokenize(tokens: &[Token]) -> Result<String, TranspileError> {
    let mut out = String::new();
    let mut pen = tokens
        .iter()
        .find_map(|t| t.start)
        .map(|p| Position::new(p.line, 0))
        .unwrap_or(Position::new(1, 0));
    let mut indents: Vec<&str> = Vec::new();
    let mut at_line_start = true;
    let mut prev: Option<&Token> = None;

    for (index, tok) in tokens.iter().enumerate() {
        if let (Some(start), Some(end)) = (tok.start, tok.end) {
            if end < start {
                return Err(TranspileError::Serialise {
                    index,
                    message: format!("token {:?} ends before it starts", tok.string),
                });
            }
        }

        match tok.kind {
            TokenKind::EndMarker => break,
            TokenKind::Indent => {
                indents.push(tok.string.as_str());
                continue;
            }
            TokenKind::Dedent => {
                indents.pop();
                continue;
            }
            _ => {}
        }

        let mut start = tok.start.unwrap_or(pen);
        if start.line == 0 {
            return Err(TranspileError::Serialise {
                index,
                message: "line numbers start at 1".to_string(),
            });
        }

        if at_line_start && !tok.kind.is_line_break() {
            if let Some(indent) = indents.last() {
                let width = indent.chars().count();
                if start.line == pen.line && pen.col == 0 && start.col >= width {
                    out.push_str(indent);
                    pen.col = width;
                }
            }
            at_line_start = false;
        }

        if start < pen {
            start = pen;
        }

        if start.line > pen.line {
            let rows = start.line - pen.line;
            out.push_str(&continuation(prev));
            for _ in 1..rows {
                out.push_str("\\\n");
            }
            pen = Position::new(start.line, 0);
        }

        let needs_space = prev.is_some_and(|p| p.is_word() && pen.line == start.line)
            && tok.is_word()
            && start == pen;
        if needs_space {
            out.push(' ');
            start.col += 1;
        } else if start.col > pen.col {
            let width = start.col - pen.col;
            match source_gap(tok, width) {
                Some(gap) => out.push_str(&gap),
                None => out.extend(std::iter::repeat(' ').take(width)),
            }
        }

        out.push_str(&tok.string);
        pen = start.advance_over(&tok.string);
        if tok.kind.is_line_break() {
            at_line_start = true;
        }
        prev = Some(tok);
    }

    Ok(out)
}

/// The `width` characters written before `tok` in its source line, when they
/// are all blanks. Generated tokens have no source gap.
fn source_gap(tok: &Token, width: usize) -> Option<String> {
    let origin = tok.origin?;
    let first_line = tok.line.split(['\n', '\r']).next()?;
    let before: Vec<char> = first_line.chars().take(origin.col).collect();
    if before.len() < origin.col || width > before.len() {
        return None;
    }
    let gap = &before[before.len() - width..];
    gap.iter()
        .all(|c| matches!(c, ' ' | '\t' | '\u{0C}'))
        .then(|| gap.iter().collect())
}

/// Text that ends a backslash-continued physical line: the whitespace before
/// the backslash in the original line, the backslash and the line terminator.
fn continuation(prev: Option<&Token>) -> String {
    let Some(last) = prev.and_then(|t| t.line.lines().last()) else {
        return "\\\n".to_string();
    };
    let line = prev.map(|t| t.line.as_str()).unwrap_or("");
    let terminator = if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\r') {
        "\r"
    } else {
        "\n"
    };
    match last.strip_suffix('\\') {
        Some(body) => {
            let gap = body.len() - body.trim_end_matches([' ', '\t']).len();
            format!("{}\\{}", &body[body.len() - gap..], terminator)
        }
        None => format!("\\{terminator}"),
    }
}
