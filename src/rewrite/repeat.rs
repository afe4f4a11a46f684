//! Bounded repeat: `repetir <expr> vezes:` becomes
//! `for <fresh> in range(<expr>):`

use super::scanner::{Placer, Scanner};
use super::FreshName;
use crate::dialect::keywords::{REPEAT_KEYWORDS, REPEAT_TIMES};
use crate::error::TranspileError;
use crate::lexer::{Position, Token, TokenKind};

pub fn expand_repeats(tokens: &mut Vec<Token>, fresh: &FreshName) -> Result<(), TranspileError> {
    let mut scanner = Scanner::new(tokens);
    while let Some(tok) = scanner.peek(0) {
        let opens = tok.kind == TokenKind::Name
            && REPEAT_KEYWORDS.contains(&tok.string.as_str())
            && !scanner.previous().is_some_and(|p| p.is_op("."));
        if !opens {
            scanner.advance(1);
            continue;
        }

        let start = scanner.index();
        let times = find_times(scanner.tokens(), start)?;
        let keyword = &scanner.tokens()[start];
        let at = keyword.start.unwrap_or(Position::new(1, 0));
        let count = &scanner.tokens()[start + 1..times];
        if count.is_empty() {
            return Err(TranspileError::MalformedConstruct {
                construct: keyword.string.clone(),
                message: "count expression missing".to_string(),
                position: keyword.source_start().unwrap_or(at),
            });
        }

        let mut placer = Placer::new(at, keyword.line.clone()).with_origin(keyword.origin);
        let mut replacement = vec![
            placer.word(TokenKind::Name, "for", 0),
            placer.word(TokenKind::Name, &fresh.next_name(), 1),
            placer.word(TokenKind::Name, "in", 1),
            placer.word(TokenKind::Name, "range", 1),
            placer.word(TokenKind::Op, "(", 0),
        ];
        replacement.extend(placer.group(count, 0));
        replacement.push(placer.word(TokenKind::Op, ")", 0));

        scanner.splice(start, times + 1, replacement);
    }
    Ok(())
}

/// Index of `vezes` closing the repeat opened at `start`. The search stops
/// at the end of the logical line or at a `:` outside brackets.
fn find_times(tokens: &[Token], start: usize) -> Result<usize, TranspileError> {
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate().skip(start + 1) {
        match tok.kind {
            TokenKind::Newline | TokenKind::EndMarker => break,
            TokenKind::Op => match tok.string.as_str() {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth = depth.saturating_sub(1),
                ":" if depth == 0 => break,
                _ => {}
            },
            TokenKind::Name if depth == 0 && tok.string == REPEAT_TIMES => return Ok(i),
            _ => {}
        }
    }
    let keyword = &tokens[start];
    Err(TranspileError::MalformedConstruct {
        construct: keyword.string.clone(),
        message: format!("keyword '{REPEAT_TIMES}' missing"),
        position: keyword.source_start().unwrap_or(Position::new(1, 0)),
    })
}
