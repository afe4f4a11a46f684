//! Rewriter passes
//!
//! The passes run in a fixed order over one token list:
//! forbidden sequences, sequence replacement, single-token replacement,
//! bounded repeat and numeric range. Only columns change; every token stays
//! on the line it came from.

mod forbidden;
mod range;
mod repeat;
pub mod scanner;
mod sequences;
mod singles;

pub use forbidden::check_forbidden;
pub use range::expand_ranges;
pub use repeat::expand_repeats;
pub use sequences::replace_sequences;
pub use singles::replace_singles;

use uuid::Uuid;

use crate::dialect::keywords::DEFAULT_FRESH_NAME;
use crate::dialect::{DialectConfig, TranslationTable};
use crate::error::TranspileError;
use crate::lexer::Token;

/// Loop variable introduced by `repetir`.
#[derive(Debug, Clone, PartialEq)]
pub enum FreshName {
    Fixed(String),
    /// A new `_repetir_<hex>` name for every expansion
    Gensym,
}

impl Default for FreshName {
    fn default() -> Self {
        FreshName::Fixed(DEFAULT_FRESH_NAME.to_string())
    }
}

impl FreshName {
    pub fn next_name(&self) -> String {
        match self {
            FreshName::Fixed(name) => name.clone(),
            FreshName::Gensym => {
                let id = Uuid::new_v4().simple().to_string();
                format!("_repetir_{}", &id[..8])
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RewriteOptions {
    pub fresh: FreshName,
}

impl RewriteOptions {
    pub fn from_config(config: &DialectConfig) -> Self {
        let fresh = if config.gensym {
            FreshName::Gensym
        } else {
            config
                .fresh_name
                .clone()
                .map(FreshName::Fixed)
                .unwrap_or_default()
        };
        Self { fresh }
    }
}

/// Run every pass over `tokens`. The first failing pass aborts the chain.
pub fn rewrite(
    tokens: &mut Vec<Token>,
    table: &TranslationTable,
    options: &RewriteOptions,
) -> Result<(), TranspileError> {
    check_forbidden(tokens.as_slice(), table)?;
    replace_sequences(tokens, table);
    replace_singles(tokens, table);
    expand_repeats(tokens, &options.fresh)?;
    expand_ranges(tokens)?;
    Ok(())
}
