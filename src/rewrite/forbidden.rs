//! Forbidden-sequence detection
//!
//! Runs before any token is rewritten, so reported positions are exact.

use super::scanner::PatternMatches;
use crate::dialect::TranslationTable;
use crate::error::TranspileError;
use crate::lexer::{Position, Token};

/// Fail on the first sequence listed in the table's error map.
pub fn check_forbidden(tokens: &[Token], table: &TranslationTable) -> Result<(), TranspileError> {
    let patterns = table.errors().iter().map(|r| r.pattern.as_slice()).collect();
    match PatternMatches::new(tokens, patterns).next() {
        Some(found) => Err(TranspileError::ForbiddenSequence {
            message: table.errors()[found.pattern].message.clone(),
            position: found.start.unwrap_or(Position::new(1, 0)),
        }),
        None => Ok(()),
    }
}
