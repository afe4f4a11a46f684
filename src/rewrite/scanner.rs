//! Cursor over a mutable token list
//!
//! Rewriter passes walk the list with a [`Scanner`], splice replacements in
//! and let it re-flow the columns of the rest of the affected line.

use crate::lexer::{Position, Token, TokenKind};

/// Slide every token from `from` onwards that starts on `line` by `delta`
/// columns. Tokens of one line are contiguous, so the walk stops at the first
/// token on another line.
pub fn displace(tokens: &mut [Token], from: usize, line: usize, delta: isize) {
    if delta == 0 {
        return;
    }
    for tok in tokens.iter_mut().skip(from) {
        match tok.start_line() {
            Some(l) if l == line => tok.displace(line, delta),
            Some(_) => break,
            None => {}
        }
    }
}

/// Whether `pattern` matches the tokens starting at `index`.
pub fn matches_at(tokens: &[Token], index: usize, pattern: &[Token]) -> bool {
    !pattern.is_empty()
        && tokens
            .get(index..index + pattern.len())
            .is_some_and(|window| window.iter().zip(pattern).all(|(t, p)| t == p))
}

/// One occurrence of a pattern in a token list.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    pub index: usize,
    /// Which pattern matched
    pub pattern: usize,
    pub len: usize,
    pub start: Option<Position>,
    pub end: Option<Position>,
}

/// Iterator over the non-overlapping matches of `patterns`, scanning left to
/// right; at each index the first matching pattern wins.
pub struct PatternMatches<'a> {
    tokens: &'a [Token],
    patterns: Vec<&'a [Token]>,
    index: usize,
}

impl<'a> PatternMatches<'a> {
    pub fn new(tokens: &'a [Token], patterns: Vec<&'a [Token]>) -> Self {
        Self {
            tokens,
            patterns,
            index: 0,
        }
    }
}

impl Iterator for PatternMatches<'_> {
    type Item = PatternMatch;

    fn next(&mut self) -> Option<PatternMatch> {
        while self.index < self.tokens.len() {
            let index = self.index;
            let hit = self
                .patterns
                .iter()
                .position(|p| matches_at(self.tokens, index, p));
            if let Some(pattern) = hit {
                let len = self.patterns[pattern].len();
                self.index = index + len;
                return Some(PatternMatch {
                    index,
                    pattern,
                    len,
                    start: self.tokens[index].start,
                    end: self.tokens[index + len - 1].effective_end(),
                });
            }
            self.index += 1;
        }
        None
    }
}

pub struct Scanner<'a> {
    tokens: &'a mut Vec<Token>,
    index: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(tokens: &'a mut Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_done(&self) -> bool {
        self.index >= self.tokens.len()
    }

    pub fn tokens(&self) -> &[Token] {
        self.tokens.as_slice()
    }

    /// Token `k` places ahead of the cursor.
    pub fn peek(&self, k: usize) -> Option<&Token> {
        self.tokens.get(self.index + k)
    }

    /// Token right before the cursor.
    pub fn previous(&self) -> Option<&Token> {
        self.index.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    pub fn advance(&mut self, k: usize) {
        self.index += k;
    }

    pub fn matches(&self, pattern: &[Token]) -> bool {
        matches_at(self.tokens.as_slice(), self.index, pattern)
    }

    /// Replace `tokens[start..end]` with `replacement` and move the cursor
    /// past it. Tokens after the splice on the same line are shifted so they
    /// keep their distance from the end of the replaced span. A deletion also
    /// closes the gap after the removed tokens.
    pub fn splice(&mut self, start: usize, end: usize, replacement: Vec<Token>) -> usize {
        let replaced_end = if end > start {
            self.tokens[end - 1].effective_end()
        } else {
            self.tokens.get(start).and_then(|t| t.start)
        };
        let next = self.tokens.get(end).and_then(|t| t.start);
        let old_end = match (replacement.is_empty(), replaced_end, next) {
            (true, Some(replaced), Some(next)) if end > start && next.line == replaced.line => {
                Some(next)
            }
            _ => replaced_end,
        };
        let new_end = match replacement.last() {
            Some(tok) => tok.effective_end(),
            None => self.tokens.get(start).and_then(|t| t.start),
        };

        let inserted = replacement.len();
        let _ = self.tokens.splice(start..end, replacement);
        let resume = start + inserted;

        if let (Some(old), Some(new)) = (old_end, new_end) {
            if old.line == new.line {
                let delta = new.col as isize - old.col as isize;
                displace(self.tokens.as_mut_slice(), resume, old.line, delta);
            }
        }

        self.index = resume;
        resume
    }
}

/// Lays out generated tokens left to right from a starting position.
pub struct Placer {
    pos: Position,
    line: String,
    origin: Option<Position>,
}

impl Placer {
    pub fn new(pos: Position, line: impl Into<String>) -> Self {
        Self {
            pos,
            line: line.into(),
            origin: None,
        }
    }

    /// The next generated word reports `origin` as its source position.
    pub fn with_origin(mut self, origin: Option<Position>) -> Self {
        self.origin = origin;
        self
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    /// A new token `gap` columns after the current position.
    pub fn word(&mut self, kind: TokenKind, text: &str, gap: usize) -> Token {
        let start = Position::new(self.pos.line, self.pos.col + gap);
        let mut tok = Token::placed(kind, text, start);
        tok.line = self.line.clone();
        tok.origin = self.origin.take();
        self.pos = tok.end.unwrap_or(start);
        tok
    }

    /// Existing tokens moved as a block: tokens on the block's first line
    /// slide with it, tokens on later lines stay where they are.
    pub fn group(&mut self, tokens: &[Token], gap: usize) -> Vec<Token> {
        let Some(first) = tokens.first().and_then(|t| t.start) else {
            return tokens.to_vec();
        };
        let target = Position::new(self.pos.line, self.pos.col + gap);
        let delta = target.col as isize - first.col as isize;

        let moved: Vec<Token> = tokens
            .iter()
            .map(|tok| match tok.start {
                Some(s) if s.line == first.line => {
                    tok.relocated(Position::new(target.line, s.shifted(delta).col))
                }
                _ => tok.clone(),
            })
            .collect();

        if let Some(end) = moved.last().and_then(|t| t.effective_end()) {
            self.pos = end;
        }
        moved
    }
}

/// Lay out abstract replacement words from `anchor`: one space between two
/// word tokens, none otherwise.
pub fn lay_out(words: &[Token], anchor: Position, line: &str) -> Vec<Token> {
    let mut placer = Placer::new(anchor, line);
    let mut prev: Option<&Token> = None;
    words
        .iter()
        .map(|w| {
            let gap = usize::from(prev.is_some_and(|p| p.is_word()) && w.is_word());
            prev = Some(w);
            placer.word(w.kind, &w.string, gap)
        })
        .collect()
}
