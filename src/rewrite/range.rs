//! Numeric range: `for x de A até B [a cada C]` becomes
//! `for x in range(A, B + 1[, C])`.
//!
//! The same pass turns `de <module> import ...` into `from <module> import ...`.

use super::scanner::{Placer, Scanner};
use crate::dialect::keywords::{RANGE_FROM, RANGE_STEP, RANGE_TO};
use crate::error::TranspileError;
use crate::lexer::{Position, Token, TokenKind};

pub fn expand_ranges(tokens: &mut Vec<Token>) -> Result<(), TranspileError> {
    let mut scanner = Scanner::new(tokens);
    while let Some(tok) = scanner.peek(0) {
        let candidate = tok.is_name(RANGE_FROM)
            && !scanner
                .previous()
                .is_some_and(|p| p.is_op(".") || p.is_name("for"));
        if !candidate {
            scanner.advance(1);
            continue;
        }

        let index = scanner.index();
        let tokens = scanner.tokens();
        if opens_import(tokens, index) {
            let de = &tokens[index];
            let at = de.start.unwrap_or(Position::new(1, 0));
            let mut placer = Placer::new(at, de.line.clone()).with_origin(de.origin);
            let from = vec![placer.word(TokenKind::Name, "from", 0)];
            scanner.splice(index, index + 1, from);
        } else if follows_for(tokens, index) {
            let (end, replacement) = range_call(tokens, index)?;
            scanner.splice(index, end, replacement);
        } else {
            scanner.advance(1);
        }
    }
    Ok(())
}

/// First token of the logical line holding `index`.
fn line_start(tokens: &[Token], index: usize) -> usize {
    tokens[..index]
        .iter()
        .rposition(|t| {
            matches!(
                t.kind,
                TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent
            )
        })
        .map_or(0, |i| i + 1)
}

fn follows_for(tokens: &[Token], index: usize) -> bool {
    tokens[line_start(tokens, index)..index]
        .iter()
        .any(|t| t.is_name("for"))
}

/// `de` heading a logical line that goes on to `import`.
fn opens_import(tokens: &[Token], index: usize) -> bool {
    let head = tokens[line_start(tokens, index)..index]
        .iter()
        .all(|t| matches!(t.kind, TokenKind::Nl | TokenKind::Comment));
    head && tokens[index + 1..]
        .iter()
        .take_while(|t| !matches!(t.kind, TokenKind::Newline | TokenKind::EndMarker))
        .any(|t| t.is_name("import"))
}

/// Index of the token that closes the range clause opened at `index`.
fn terminator(tokens: &[Token], index: usize) -> usize {
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate().skip(index + 1) {
        match tok.kind {
            TokenKind::Newline | TokenKind::EndMarker | TokenKind::Comment => return i,
            TokenKind::Op => match tok.string.as_str() {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" if depth == 0 => return i,
                ")" | "]" | "}" => depth -= 1,
                ":" | ";" if depth == 0 => return i,
                _ => {}
            },
            _ => {}
        }
    }
    tokens.len()
}

/// Indices in `tokens[from..to]` sitting outside brackets.
fn top_level(tokens: &[Token], from: usize, to: usize) -> Vec<usize> {
    let mut depth = 0usize;
    let mut found = Vec::new();
    for (i, tok) in tokens.iter().enumerate().take(to).skip(from) {
        if tok.kind == TokenKind::Op {
            match tok.string.as_str() {
                "(" | "[" | "{" => {
                    depth += 1;
                    continue;
                }
                ")" | "]" | "}" => {
                    depth = depth.saturating_sub(1);
                    continue;
                }
                _ => {}
            }
        }
        if depth == 0 {
            found.push(i);
        }
    }
    found
}

fn malformed(de: &Token, message: &str) -> TranspileError {
    TranspileError::MalformedConstruct {
        construct: de.string.clone(),
        message: message.to_string(),
        position: de.source_start().unwrap_or(Position::new(1, 0)),
    }
}

/// Build `in range(A, B + 1[, C])` for the clause opened at `index`.
/// Returns the end of the replaced span along with the new tokens.
fn range_call(tokens: &[Token], index: usize) -> Result<(usize, Vec<Token>), TranspileError> {
    let de = &tokens[index];
    let end = terminator(tokens, index);
    let outer = top_level(tokens, index + 1, end);

    let to = outer
        .iter()
        .copied()
        .find(|&i| RANGE_TO.iter().any(|w| tokens[i].is_name(w)))
        .ok_or_else(|| malformed(de, &format!("keyword '{}' missing", RANGE_TO[0])))?;
    let step = outer.iter().copied().find(|&i| {
        i > to
            && tokens[i].is_name(RANGE_STEP[0])
            && tokens.get(i + 1).is_some_and(|t| t.is_name(RANGE_STEP[1]))
    });

    let lower = &tokens[index + 1..to];
    let upper = &tokens[to + 1..step.unwrap_or(end)];
    if lower.is_empty() {
        return Err(malformed(de, "start expression missing"));
    }
    if upper.is_empty() {
        return Err(malformed(de, "end expression missing"));
    }
    let stride = match step {
        Some(s) if s + 2 >= end => return Err(malformed(de, "step expression missing")),
        Some(s) => Some(&tokens[s + 2..end]),
        None => None,
    };

    let mut placer = Placer::new(de.start.unwrap_or(Position::new(1, 0)), de.line.clone())
        .with_origin(de.origin);
    let mut out = vec![
        placer.word(TokenKind::Name, "in", 0),
        placer.word(TokenKind::Name, "range", 1),
        placer.word(TokenKind::Op, "(", 0),
    ];
    out.extend(placer.group(lower, 0));
    out.push(placer.word(TokenKind::Op, ",", 0));
    out.extend(placer.group(upper, 1));
    out.push(placer.word(TokenKind::Op, "+", 1));
    out.push(placer.word(TokenKind::Number, "1", 1));
    if let Some(stride) = stride {
        out.push(placer.word(TokenKind::Op, ",", 0));
        out.extend(placer.group(stride, 1));
    }
    out.push(placer.word(TokenKind::Op, ")", 0));
    Ok((end, out))
}
