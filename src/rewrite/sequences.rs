//! Multi-token sequence replacement

use super::scanner::{lay_out, Scanner};
use crate::dialect::TranslationTable;
use crate::lexer::{Position, Token, TokenKind};

/// Punctuation that hugs the token before it (`x:` rather than `x :`).
const ATTACHED: &[&str] = &[":", ",", ")", "]", "}"];

/// Replace every non-overlapping occurrence of a sequence pattern.
pub fn replace_sequences(tokens: &mut Vec<Token>, table: &TranslationTable) {
    let mut scanner = Scanner::new(tokens);
    while !scanner.is_done() {
        let Some(rule) = table.sequences().iter().find(|r| scanner.matches(&r.pattern)) else {
            scanner.advance(1);
            continue;
        };

        let start = scanner.index();
        let end = start + rule.pattern.len();
        let matched = &scanner.tokens()[start..end];
        let first = &matched[0];
        let mut replacement = match anchor(scanner.previous(), first, &rule.replacement) {
            Some(at) => lay_out(&rule.replacement, at, &first.line),
            None => rule.replacement.clone(),
        };
        // Each new word stands where the matched word at its offset was.
        for (tok, source) in replacement.iter_mut().zip(matched) {
            tok.origin = source.origin;
            tok.line = source.line.clone();
        }
        scanner.splice(start, end, replacement);
    }
}

/// Where the replacement starts: at the match, or right after the previous
/// token when the replacement opens with attached punctuation.
fn anchor(prev: Option<&Token>, first: &Token, replacement: &[Token]) -> Option<Position> {
    let at = first.start?;
    let attaches = replacement
        .first()
        .is_some_and(|r| r.kind == TokenKind::Op && ATTACHED.contains(&r.string.as_str()));
    if !attaches {
        return Some(at);
    }
    match prev {
        Some(p) if !p.kind.is_structural() && !p.kind.is_line_break() => match p.effective_end() {
            Some(end) if end.line == at.line => Some(end),
            _ => Some(at),
        },
        _ => Some(at),
    }
}
