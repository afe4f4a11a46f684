//! Translation tables
//!
//! A [`TranslationTable`] holds the three read-only maps used by the rewriter
//! passes: single-token substitutions, token-sequence substitutions and
//! forbidden sequences. Tables are built once and never mutated afterwards.
//!
//! The built-in tables live in [`keywords`]; a [`DialectConfig`] loaded from
//! JSON can extend them.

pub mod keywords;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TranspileError;
use crate::lexer::{is_host_keyword, Token, TokenKind};

/// One token-sequence substitution.
#[derive(Debug, Clone)]
pub struct SequenceRule {
    pub pattern: Vec<Token>,
    pub replacement: Vec<Token>,
}

/// One forbidden sequence.
#[derive(Debug, Clone)]
pub struct ErrorRule {
    pub pattern: Vec<Token>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct TranslationTable {
    singles: HashMap<String, String>,
    sequences: Vec<SequenceRule>,
    errors: Vec<ErrorRule>,
}

impl Default for TranslationTable {
    fn default() -> Self {
        let singles = keywords::SINGLES
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        let sequences = keywords::SEQUENCES
            .iter()
            .map(|(pattern, replacement)| SequenceRule {
                pattern: pattern.iter().map(|w| keyword_token(w)).collect(),
                replacement: replacement.iter().map(|w| keyword_token(w)).collect(),
            })
            .collect();
        let errors = keywords::ERRORS
            .iter()
            .map(|(pattern, message)| ErrorRule {
                pattern: pattern.iter().map(|w| keyword_token(w)).collect(),
                message: message.to_string(),
            })
            .collect();

        let mut table = Self {
            singles,
            sequences,
            errors,
        };
        table.sort_patterns();
        table
    }
}

/// Built-in table words are known to be well formed.
fn keyword_token(word: &str) -> Token {
    Token::pattern(word).unwrap_or_else(|_| Token {
        string: word.to_string(),
        kind: TokenKind::Name,
        start: None,
        end: None,
        line: String::new(),
        origin: None,
    })
}

fn parse_words(words: &[String]) -> Result<Vec<Token>, TranspileError> {
    words.iter().map(|w| Token::pattern(w)).collect()
}

impl TranslationTable {
    /// Built-in tables extended with the entries of `config`.
    pub fn with_config(config: &DialectConfig) -> Result<Self, TranspileError> {
        let mut table = Self::default();

        for (from, to) in &config.singles {
            if Token::infer_kind(from) != Some(TokenKind::Name) {
                return Err(TranspileError::Dialect(format!(
                    "single-token key '{from}' is not an identifier"
                )));
            }
            if is_host_keyword(from) {
                return Err(TranspileError::Dialect(format!(
                    "single-token key '{from}' shadows a host keyword"
                )));
            }
            if Token::infer_kind(to) != Some(TokenKind::Name) {
                return Err(TranspileError::Dialect(format!(
                    "replacement '{to}' for '{from}' is not a keyword or identifier"
                )));
            }
            table.singles.insert(from.clone(), to.clone());
        }

        for entry in &config.sequences {
            if entry.pattern.is_empty() {
                return Err(TranspileError::Dialect(
                    "sequence pattern must not be empty".to_string(),
                ));
            }
            table.sequences.push(SequenceRule {
                pattern: parse_words(&entry.pattern)?,
                replacement: parse_words(&entry.replacement)?,
            });
        }

        for entry in &config.errors {
            if entry.pattern.is_empty() {
                return Err(TranspileError::Dialect(
                    "error pattern must not be empty".to_string(),
                ));
            }
            table.errors.push(ErrorRule {
                pattern: parse_words(&entry.pattern)?,
                message: entry.message.clone(),
            });
        }

        table.sort_patterns();
        Ok(table)
    }

    /// Longest patterns first; ties keep table order.
    fn sort_patterns(&mut self) {
        self.sequences
            .sort_by(|a, b| b.pattern.len().cmp(&a.pattern.len()));
        self.errors.sort_by(|a, b| b.pattern.len().cmp(&a.pattern.len()));
    }

    pub fn single(&self, word: &str) -> Option<&str> {
        self.singles.get(word).map(String::as_str)
    }

    pub fn sequences(&self) -> &[SequenceRule] {
        &self.sequences
    }

    pub fn errors(&self) -> &[ErrorRule] {
        &self.errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceEntry {
    pub pattern: Vec<String>,
    #[serde(default)]
    pub replacement: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub pattern: Vec<String>,
    pub message: String,
}

/// User extensions to the dialect, read from a JSON file.
///
/// ```json
/// {
///   "singles": { "imprima": "print" },
///   "sequences": [{ "pattern": ["até", "que"], "replacement": ["while", "not"] }],
///   "errors": [{ "pattern": ["se", "se"], "message": "keyword 'se' repeated" }],
///   "fresh_name": "_volta",
///   "gensym": false,
///   "runtime_blacklist": ["os", "sys"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectConfig {
    pub singles: BTreeMap<String, String>,
    pub sequences: Vec<SequenceEntry>,
    pub errors: Vec<ErrorEntry>,
    pub fresh_name: Option<String>,
    pub gensym: bool,
    pub runtime_blacklist: Option<Vec<String>>,
}

impl DialectConfig {
    pub fn from_json(text: &str) -> Result<Self, TranspileError> {
        serde_json::from_str(text)
            .map_err(|e| TranspileError::Dialect(format!("invalid dialect file: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self, TranspileError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_singles() {
        let table = TranslationTable::default();
        assert_eq!(table.single("enquanto"), Some("while"));
        assert_eq!(table.single("não"), Some("not"));
        assert_eq!(table.single("verdadeiro"), Some("True"));
        assert_eq!(table.single("mostre"), None);
    }

    #[test]
    fn test_sequences_sorted_longest_first() {
        let table = TranslationTable::default();
        let lengths: Vec<usize> = table.sequences().iter().map(|r| r.pattern.len()).collect();
        let mut sorted = lengths.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(lengths, sorted);
        assert_eq!(table.sequences()[0].pattern.len(), 3);
    }

    #[test]
    fn test_pattern_tokens_carry_kinds() {
        let table = TranslationTable::default();
        let rule = table
            .sequences()
            .iter()
            .find(|r| r.pattern.len() == 2 && r.pattern[0].is_name("faça"))
            .unwrap();
        assert_eq!(rule.pattern[1].kind, TokenKind::Op);
        assert!(rule.replacement[0].is_op(":"));
    }

    #[test]
    fn test_config_extends_tables() {
        let config = DialectConfig::from_json(
            r#"{
                "singles": {"imprima": "print"},
                "sequences": [{"pattern": ["até", "que"], "replacement": ["while", "not"]}],
                "errors": [{"pattern": ["se", "se"], "message": "keyword 'se' repeated"}]
            }"#,
        )
        .unwrap();
        let table = TranslationTable::with_config(&config).unwrap();
        assert_eq!(table.single("imprima"), Some("print"));
        assert!(table
            .sequences()
            .iter()
            .any(|r| r.pattern[0].is_name("até") && r.replacement.len() == 2));
        assert!(table.errors().iter().any(|r| r.pattern[0].is_name("se")));
    }

    #[test]
    fn test_config_rejects_bad_replacement() {
        let mut config = DialectConfig::default();
        config
            .singles
            .insert("imprima".to_string(), "print it".to_string());
        let err = TranslationTable::with_config(&config).unwrap_err();
        assert!(matches!(err, TranspileError::Dialect(_)));
    }

    #[test]
    fn test_config_rejects_host_keyword_key() {
        let mut config = DialectConfig::default();
        config.singles.insert("if".to_string(), "se".to_string());
        assert!(TranslationTable::with_config(&config).is_err());
    }

    #[test]
    fn test_config_rejects_empty_pattern() {
        let config = DialectConfig {
            sequences: vec![SequenceEntry::default()],
            ..Default::default()
        };
        assert!(TranslationTable::with_config(&config).is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = DialectConfig::from_json("{}").unwrap();
        assert_eq!(config, DialectConfig::default());
        assert!(!config.gensym);
    }
}
