//! lexer module tests

use super::*;
use pretty_assertions::assert_eq;

fn kinds(src: &str) -> Vec<TokenKind> {
    tokenize(src).unwrap().iter().map(|t| t.kind).collect()
}

fn round_trip(src: &str) {
    let tokens = tokenize(src).unwrap();
    assert_eq!(untokenize(&tokens).unwrap(), src);
}

#[test]
fn test_tokenize_simple_expression() {
    let tokens = tokenize("x + y").unwrap();
    assert_eq!(tokens.len(), 5);
    assert_eq!(tokens[0].string, "x");
    assert_eq!(tokens[0].kind, TokenKind::Name);
    assert_eq!(tokens[0].start, Some(Position::new(1, 0)));
    assert_eq!(tokens[1].kind, TokenKind::Op);
    assert_eq!(tokens[2].end, Some(Position::new(1, 5)));
    assert_eq!(tokens[3].kind, TokenKind::Newline);
    assert_eq!(tokens[3].start, Some(Position::new(1, 5)));
    assert_eq!(tokens[3].end, Some(Position::new(1, 6)));
    assert_eq!(tokens[4].kind, TokenKind::EndMarker);
    assert_eq!(tokens[4].start, Some(Position::new(2, 0)));
}

#[test]
fn test_tokenize_empty() {
    let tokens = tokenize("").unwrap();
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndMarker));
}

#[test]
fn test_tokenize_unicode_names_use_char_columns() {
    let tokens = tokenize("se x então: y").unwrap();
    let entao = &tokens[2];
    assert_eq!(entao.string, "então");
    assert_eq!(entao.kind, TokenKind::Name);
    assert_eq!(entao.start, Some(Position::new(1, 5)));
    assert_eq!(entao.end, Some(Position::new(1, 10)));
    assert!(tokens[3].is_op(":"));
}

#[test]
fn test_tokenize_indent_dedent() {
    assert_eq!(
        kinds("if x:\n    y\nz\n"),
        vec![
            TokenKind::Name,
            TokenKind::Name,
            TokenKind::Op,
            TokenKind::Newline,
            TokenKind::Indent,
            TokenKind::Name,
            TokenKind::Newline,
            TokenKind::Dedent,
            TokenKind::Name,
            TokenKind::Newline,
            TokenKind::EndMarker,
        ]
    );
}

#[test]
fn test_tokenize_dedents_at_eof() {
    let tokens = tokenize("if a:\n    if b:\n        c\n").unwrap();
    let dedents: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Dedent)
        .collect();
    assert_eq!(dedents.len(), 2);
    assert_eq!(dedents[0].start, Some(Position::new(4, 0)));
}

#[test]
fn test_tokenize_blank_and_comment_lines_are_nl() {
    assert_eq!(
        kinds("# topo\n\nx = 1  # fim\n"),
        vec![
            TokenKind::Comment,
            TokenKind::Nl,
            TokenKind::Nl,
            TokenKind::Name,
            TokenKind::Op,
            TokenKind::Number,
            TokenKind::Comment,
            TokenKind::Newline,
            TokenKind::EndMarker,
        ]
    );
}

#[test]
fn test_tokenize_newlines_inside_brackets_are_nl() {
    let tokens = tokenize("x = [1,\n     2]\n").unwrap();
    let breaks: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind.is_line_break())
        .map(|t| t.kind)
        .collect();
    assert_eq!(breaks, vec![TokenKind::Nl, TokenKind::Newline]);
    assert!(!tokens.iter().any(|t| t.kind == TokenKind::Indent));
}

#[test]
fn test_tokenize_strings() {
    let tokens = tokenize("a = 'se' + \"então\" + rb'x' + f\"{y}\"\n").unwrap();
    let strings: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::String)
        .map(|t| t.string.as_str())
        .collect();
    assert_eq!(strings, vec!["'se'", "\"então\"", "rb'x'", "f\"{y}\""]);
}

#[test]
fn test_tokenize_triple_quoted_string_spans_lines() {
    let tokens = tokenize("s = '''um\ndois'''\nx\n").unwrap();
    let s = &tokens[2];
    assert_eq!(s.kind, TokenKind::String);
    assert_eq!(s.start, Some(Position::new(1, 4)));
    assert_eq!(s.end, Some(Position::new(2, 7)));
    assert_eq!(s.line, "s = '''um\ndois'''\n");
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("0x1F 1_000 3.14 .5 1e-3 2j 0b101\n").unwrap();
    let numbers: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Number)
        .map(|t| t.string.as_str())
        .collect();
    assert_eq!(numbers, vec!["0x1F", "1_000", "3.14", ".5", "1e-3", "2j", "0b101"]);
}

#[test]
fn test_tokenize_longest_operator() {
    let tokens = tokenize("a **= b // c -> d\n").unwrap();
    let ops: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Op)
        .map(|t| t.string.as_str())
        .collect();
    assert_eq!(ops, vec!["**=", "//", "->"]);
}

#[test]
fn test_tokenize_error_token() {
    let tokens = tokenize("a $ b\n").unwrap();
    assert_eq!(tokens[1].kind, TokenKind::ErrorToken);
    assert_eq!(tokens[1].string, "$");
}

#[test]
fn test_tokenize_unterminated_string() {
    let err = tokenize("x = 'abc\n").unwrap_err();
    match err {
        TranspileError::Tokenize { message, position } => {
            assert_eq!(message, "unterminated string literal");
            assert_eq!(position, Position::new(1, 4));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_tokenize_bad_dedent() {
    let err = tokenize("if x:\n        a\n    b\n").unwrap_err();
    assert!(matches!(
        err,
        TranspileError::Tokenize { ref message, position }
            if message.contains("unindent") && position == Position::new(3, 4)
    ));
}

#[test]
fn test_tokenize_unclosed_bracket() {
    let err = tokenize("f(1,\n").unwrap_err();
    assert!(format!("{err}").contains("EOF in multi-line statement"));
}

#[test]
fn test_round_trip_program() {
    round_trip(
        "import math\n\n\ndef f(x, *args, **kw):\n    \"\"\"doc\n    string\"\"\"\n    if x:  # note\n        return [a for a in args]\n    else:\n        return {'k': kw}\n\nprint(f(1))\n",
    );
}

#[test]
fn test_round_trip_preserves_tabs_and_trailing_spaces() {
    round_trip("if x:\n\ty = 1   \n\tif y:\n\t\tz = 2\nw = 3\n");
}

#[test]
fn test_round_trip_continuation_lines() {
    round_trip("total = 1 + \\\n    2\nx = (3 +\n     4)\n");
}

#[test]
fn test_round_trip_leading_whitespace_and_blank_lines() {
    round_trip("\n\n  # comentário\nx = 1\n    \n");
}

#[test]
fn test_round_trip_tab_inside_line() {
    round_trip("x = 1\t# c\n");
    round_trip("a\t=\tb\n");
}

#[test]
fn test_round_trip_tab_indented_comment_and_continuation() {
    round_trip("if x:\n\ty\n\t\t# c\n\tz\n");
    round_trip("f(1,\n\t2)\n");
}

#[test]
fn test_round_trip_whitespace_only_lines() {
    round_trip("if x:\n\ty\n\t\n\tz\n");
    round_trip("x = 1\n \t \ny = 2\n");
}

#[test]
fn test_untokenize_pads_generated_tokens_with_spaces() {
    let mut tokens = tokenize("x =\t1\n").unwrap();
    tokens[2] = Token::placed(TokenKind::Number, "2", Position::new(1, 4));
    assert_eq!(untokenize(&tokens).unwrap(), "x = 2\n");
}

#[test]
fn test_round_trip_crlf() {
    round_trip("if x:\r\n    y\r\n");
}

#[test]
fn test_untokenize_separates_touching_words() {
    let tokens = vec![
        Token::placed(TokenKind::Name, "not", Position::new(1, 0)),
        Token::placed(TokenKind::Name, "x", Position::new(1, 2)),
    ];
    assert_eq!(untokenize(&tokens).unwrap(), "not x");
}

#[test]
fn test_untokenize_does_not_separate_punctuation() {
    let tokens = vec![
        Token::placed(TokenKind::Name, "f", Position::new(1, 0)),
        Token::placed(TokenKind::Op, "(", Position::new(1, 0)),
        Token::placed(TokenKind::Name, "x", Position::new(1, 1)),
        Token::placed(TokenKind::Op, ")", Position::new(1, 1)),
    ];
    assert_eq!(untokenize(&tokens).unwrap(), "f(x)");
}

#[test]
fn test_untokenize_rejects_inverted_token() {
    let mut tok = Token::placed(TokenKind::Name, "x", Position::new(1, 4));
    tok.end = Some(Position::new(1, 1));
    let err = untokenize(&[tok]).unwrap_err();
    assert!(matches!(err, TranspileError::Serialise { index: 0, .. }));
}

#[test]
fn test_physical_lines_keep_terminators() {
    assert_eq!(physical_lines("a\r\nb\rc\nd"), vec!["a\r\n", "b\r", "c\n", "d"]);
}
