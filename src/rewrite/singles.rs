//! Single-token replacement

use super::scanner::{Placer, Scanner};
use crate::dialect::TranslationTable;
use crate::lexer::{Token, TokenKind};

/// Translate every NAME found in the single-token table. Attribute names
/// (right after a `.`) keep their spelling.
pub fn replace_singles(tokens: &mut Vec<Token>, table: &TranslationTable) {
    let mut scanner = Scanner::new(tokens);
    while let Some(tok) = scanner.peek(0) {
        let after_dot = scanner.previous().is_some_and(|p| p.is_op("."));
        let word = match tok.kind {
            TokenKind::Name if !after_dot => table.single(&tok.string),
            _ => None,
        };
        let (Some(word), Some(start)) = (word, tok.start) else {
            scanner.advance(1);
            continue;
        };

        let kind = Token::infer_kind(word).unwrap_or(TokenKind::Name);
        let mut placer = Placer::new(start, tok.line.clone()).with_origin(tok.origin);
        let placed = vec![placer.word(kind, word, 0)];
        let index = scanner.index();
        scanner.splice(index, index + 1, placed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{tokenize, untokenize, Position};
    use pretty_assertions::assert_eq;

    fn run(src: &str) -> String {
        let mut tokens = tokenize(src).unwrap();
        replace_singles(&mut tokens, &TranslationTable::default());
        untokenize(&tokens).unwrap()
    }

    #[test]
    fn test_longer_replacement_pushes_line() {
        assert_eq!(run("x e y\n"), "x and y\n");
        assert_eq!(run("x é verdadeiro\n"), "x is True\n");
    }

    #[test]
    fn test_shorter_replacement_pulls_line() {
        assert_eq!(run("função foo(x): retorne x\n"), "def foo(x): return x\n");
    }

    #[test]
    fn test_attribute_names_are_kept() {
        assert_eq!(run("obj.e = nao obj.se\n"), "obj.e = not obj.se\n");
    }

    #[test]
    fn test_strings_and_comments_are_kept() {
        assert_eq!(run("s = 'se x'  # enquanto\n"), "s = 'se x'  # enquanto\n");
    }

    #[test]
    fn test_replacement_keeps_start_and_line() {
        let mut tokens = tokenize("a\n  se b:\n    c\n").unwrap();
        replace_singles(&mut tokens, &TranslationTable::default());
        let tok = tokens.iter().find(|t| t.is_name("if")).unwrap();
        assert_eq!(tok.start, Some(Position::new(2, 2)));
        assert_eq!(tok.end, Some(Position::new(2, 4)));
        assert!(tok.line.starts_with("  se b:"));
    }

    #[test]
    fn test_shifted_tokens_keep_source_position() {
        let mut tokens = tokenize("enquanto x: y\n").unwrap();
        replace_singles(&mut tokens, &TranslationTable::default());
        assert_eq!(tokens[0].source_start(), Some(Position::new(1, 0)));
        let y = tokens.iter().find(|t| t.is_name("y")).unwrap();
        assert_eq!(y.start, Some(Position::new(1, 9)));
        assert_eq!(y.source_start(), Some(Position::new(1, 12)));
    }
}
