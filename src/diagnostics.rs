//! Diagnostics - coded, positioned reports for transpile errors and warnings

use serde::Serialize;
use std::path::Path;

use crate::error::TranspileError;
use crate::lexer::{Position, Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticSpan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub line: usize,
    /// 1-based, as editors count
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub severity: DiagnosticSeverity,
    pub span: DiagnosticSpan,
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct Diagnostics {
    pub diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn add(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for diag in &self.diagnostics {
            let file = diag.span.file.as_deref().unwrap_or("<input>");
            out.push_str(&format!(
                "[{}] {}:{}:{} {}\n",
                diag.code, file, diag.span.line, diag.span.column, diag.message
            ));
        }
        out
    }
}

/// Span from 0-based token positions.
pub fn span_for(file: Option<&Path>, start: Position, end: Option<Position>) -> DiagnosticSpan {
    let end = end.filter(|e| *e >= start).unwrap_or(start);
    DiagnosticSpan {
        file: file.map(|p| p.display().to_string()),
        line: start.line,
        column: start.col + 1,
        end_line: end.line,
        end_column: end.col + 1,
    }
}

pub fn error_diag(code: &str, message: String, span: DiagnosticSpan, phase: &str) -> Diagnostic {
    Diagnostic {
        code: code.to_string(),
        message,
        severity: DiagnosticSeverity::Error,
        span,
        phase: phase.to_string(),
        meta: None,
    }
}

pub fn warning_diag(code: &str, message: String, span: DiagnosticSpan, phase: &str) -> Diagnostic {
    Diagnostic {
        severity: DiagnosticSeverity::Warning,
        ..error_diag(code, message, span, phase)
    }
}

pub fn from_error(err: &TranspileError, file: Option<&Path>) -> Diagnostics {
    let mut diags = Diagnostics::new();
    let (code, message, phase, meta) = match err {
        TranspileError::Tokenize { message, .. } => {
            ("PTG-TOKENIZE", message.clone(), "tokenize", None)
        }
        TranspileError::ForbiddenSequence { message, .. } => {
            ("PTG-FORBIDDEN", message.clone(), "rewrite", None)
        }
        TranspileError::MalformedConstruct {
            construct, message, ..
        } => (
            "PTG-MALFORMED",
            format!("malformed '{construct}': {message}"),
            "rewrite",
            Some(serde_json::json!({ "construct": construct })),
        ),
        TranspileError::Serialise { index, message } => (
            "PTG-SERIALISE",
            message.clone(),
            "serialise",
            Some(serde_json::json!({ "index": index })),
        ),
        TranspileError::InvalidToken { .. } => {
            ("PTG-INVALID-TOKEN", format!("{err}"), "dialect", None)
        }
        TranspileError::Dialect(message) => ("PTG-DIALECT", message.clone(), "dialect", None),
        TranspileError::Host(inner) => (
            "PTG-HOST",
            format!("{inner}"),
            "host",
            inner.py_type().map(|t| serde_json::json!({ "py_type": t })),
        ),
        TranspileError::Io(_) => ("PTG-IO", format!("{err}"), "io", None),
    };
    let position = err.position().unwrap_or(Position::new(1, 0));
    let mut diag = error_diag(code, message, span_for(file, position, None), phase);
    diag.meta = meta;
    diags.add(diag);
    diags
}

/// Dialect words that only make sense inside a construct. Finding one in
/// translated output means the construct around it was not recognised.
const LEFTOVER_WORDS: &[&str] = &[
    "faça", "fazer", "faca", "então", "entao", "vezes", "até", "repetir", "repita",
];

/// Warn about dialect-only words that survived translation.
pub fn scan_leftovers(tokens: &[Token], file: Option<&Path>) -> Diagnostics {
    let mut diags = Diagnostics::new();
    let mut prev: Option<&Token> = None;
    for tok in tokens {
        let attribute = prev.is_some_and(|p| p.is_op("."));
        if tok.kind == TokenKind::Name && !attribute && LEFTOVER_WORDS.contains(&tok.string.as_str()) {
            if let Some(start) = tok.source_start() {
                diags.add(warning_diag(
                    "PTG-LEFTOVER-KEYWORD",
                    format!("dialect keyword '{}' left untranslated", tok.string),
                    span_for(file, start, Some(start.advance_over(&tok.string))),
                    "rewrite",
                ));
            }
        }
        prev = Some(tok);
    }
    diags
}
