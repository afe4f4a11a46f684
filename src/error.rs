//! Error types for the Pytuga transpiler

use thiserror::Error;

use crate::bridge::bridge_error::BridgeError;
use crate::lexer::Position;

/// Main error type for Pytuga
#[derive(Debug, Error)]
pub enum TranspileError {
    /// Raised by the tokeniser (bad indentation, unterminated string, ...)
    #[error("Tokenize error at {position}: {message}")]
    Tokenize { message: String, position: Position },

    /// A sequence listed in the dialect's error table
    #[error("Forbidden sequence at {position}: {message}")]
    ForbiddenSequence { message: String, position: Position },

    /// `repetir ... vezes` or `de ... até` with a missing part
    #[error("Malformed '{construct}' at {position}: {message}")]
    MalformedConstruct {
        construct: String,
        message: String,
        position: Position,
    },

    /// A rewriter left the token list with inconsistent positions
    #[error("Serialise error at token {index}: {message}")]
    Serialise { index: usize, message: String },

    #[error("Invalid token '{text}': {message}")]
    InvalidToken { text: String, message: String },

    #[error("Dialect error: {0}")]
    Dialect(String),

    #[error("Host error: {0}")]
    Host(#[from] BridgeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranspileError {
    /// Source position the error points at, when it has one.
    pub fn position(&self) -> Option<Position> {
        match self {
            TranspileError::Tokenize { position, .. }
            | TranspileError::ForbiddenSequence { position, .. }
            | TranspileError::MalformedConstruct { position, .. } => Some(*position),
            TranspileError::Host(err) => err.lineno().map(|line| Position::new(line, 0)),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TranspileError>;
