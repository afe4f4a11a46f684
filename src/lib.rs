//! Pytuga - Portuguese-keyword Python dialect transpiler
//!
//! # Overview
//! Source written with Portuguese keywords (`enquanto`, `se`, `função`,
//! `repita N vezes`, `para x de A até B`) is tokenised, rewritten token by
//! token and serialised back into plain Python. Lines never move, so host
//! error messages still point at the original text.
//!
//! Compiling and running the result is delegated to a Python interpreter
//! behind the [`bridge::host::Host`] trait.

pub mod bridge;
pub mod dialect;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod repl;
pub mod rewrite;
pub mod runtime;

use std::path::Path;

use once_cell::sync::Lazy;

pub use bridge::host::{BuiltinsGuard, Code, Host, Namespace, Scope};
pub use bridge::protocol::{CompileMode, HostValue};
pub use bridge::PythonBridge;
pub use dialect::{DialectConfig, TranslationTable};
pub use error::{Result, TranspileError};
pub use runtime::{namespace, namespace_with, RuntimeEntry};

use bridge::protocol::Payload;
use bridge::bridge_error::BridgeError;
use lexer::Token;
use rewrite::RewriteOptions;

/// Either dialect source (transpiled before use) or an already compiled code
/// object.
#[derive(Debug, Clone, Copy)]
pub enum SourceOrCode<'a> {
    Source(&'a str),
    Code(&'a Code),
}

/// Options of [`Transpiler::exec`] and [`Transpiler::eval`].
#[derive(Debug, Clone, Copy)]
pub struct ExecOptions<'a> {
    /// Fresh, throw-away namespace when `None`
    pub globals: Option<&'a Namespace>,
    pub locals: Option<&'a Namespace>,
    /// Merge the runtime names into `globals`
    pub expose_runtime: bool,
    /// Install the runtime names into the host builtins for the call
    pub install_builtins: bool,
    pub filename: &'a str,
}

impl Default for ExecOptions<'_> {
    fn default() -> Self {
        Self {
            globals: None,
            locals: None,
            expose_runtime: true,
            install_builtins: false,
            filename: "<string>",
        }
    }
}

/// Translation tables plus rewrite options. Immutable once built, so one
/// instance can serve any number of calls.
#[derive(Debug, Clone, Default)]
pub struct Transpiler {
    table: TranslationTable,
    options: RewriteOptions,
    runtime_blacklist: Option<Vec<String>>,
}

static DEFAULT: Lazy<Transpiler> = Lazy::new(Transpiler::default);

impl Transpiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &DialectConfig) -> Result<Self> {
        Ok(Self {
            table: TranslationTable::with_config(config)?,
            options: RewriteOptions::from_config(config),
            runtime_blacklist: config.runtime_blacklist.clone(),
        })
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    /// Tokenise and rewrite, without serialising.
    pub fn tokens(&self, source: &str) -> Result<Vec<Token>> {
        let mut tokens = lexer::tokenize(source)?;
        rewrite::rewrite(&mut tokens, &self.table, &self.options)?;
        Ok(tokens)
    }

    /// Translate dialect source into host source.
    pub fn transpile(&self, source: &str) -> Result<String> {
        if source.trim().is_empty() {
            return Ok(source.to_string());
        }
        let appended = !source.ends_with('\n') && !source.ends_with('\r');
        let mut output = lexer::untokenize(&self.tokens(source)?)?;
        if appended && output.ends_with('\n') {
            output.pop();
        }
        Ok(keep_margins(source, &output))
    }

    /// Like [`Transpiler::transpile`], reporting failures as diagnostics.
    pub fn transpile_with_diagnostics(
        &self,
        source: &str,
        file: Option<&Path>,
    ) -> std::result::Result<String, diagnostics::Diagnostics> {
        self.transpile(source)
            .map_err(|err| diagnostics::from_error(&err, file))
    }

    /// All diagnostics for `source`: the error if translation fails, or
    /// warnings about dialect words left untranslated.
    pub fn check(&self, source: &str, file: Option<&Path>) -> diagnostics::Diagnostics {
        match self.tokens(source) {
            Ok(tokens) => diagnostics::scan_leftovers(&tokens, file),
            Err(err) => diagnostics::from_error(&err, file),
        }
    }

    /// Runtime entries visible to executed code.
    pub fn runtime(&self) -> Vec<RuntimeEntry> {
        let names = match &self.runtime_blacklist {
            Some(blacklist) => namespace_with(blacklist.as_slice()),
            None => namespace(),
        };
        names.into_values().collect()
    }

    /// Transpile, then compile with the host.
    pub fn compile<H: Host + ?Sized>(
        &self,
        host: &mut H,
        source: &str,
        filename: &str,
        mode: CompileMode,
        flags: i64,
        dont_inherit: bool,
    ) -> Result<Code> {
        let translated = self.transpile(source)?;
        Ok(host.compile(&translated, filename, mode, flags, dont_inherit)?)
    }

    /// Run statements. With source text, transpile first.
    pub fn exec<H: Host + ?Sized>(
        &self,
        host: &mut H,
        target: SourceOrCode<'_>,
        options: &ExecOptions<'_>,
    ) -> Result<()> {
        self.run(host, target, options, |h, payload, scope| h.exec(payload, scope))
    }

    /// Evaluate an expression. With source text, transpile first.
    pub fn eval<H: Host + ?Sized>(
        &self,
        host: &mut H,
        target: SourceOrCode<'_>,
        options: &ExecOptions<'_>,
    ) -> Result<HostValue> {
        self.run(host, target, options, |h, payload, scope| h.eval(payload, scope))
    }

    fn run<H, T, F>(
        &self,
        host: &mut H,
        target: SourceOrCode<'_>,
        options: &ExecOptions<'_>,
        call: F,
    ) -> Result<T>
    where
        H: Host + ?Sized,
        F: FnOnce(&mut H, Payload<'_>, Scope<'_>) -> std::result::Result<T, BridgeError>,
    {
        let translated;
        let payload = match target {
            SourceOrCode::Source(source) => {
                translated = self.transpile(source)?;
                Payload::Source {
                    source: &translated,
                    filename: options.filename,
                }
            }
            SourceOrCode::Code(code) => Payload::Code { id: &code.id },
        };

        let fresh;
        let globals = match options.globals {
            Some(globals) => globals,
            None => {
                fresh = Namespace::new();
                &fresh
            }
        };

        let runtime = self.runtime();
        let scope = Scope {
            globals,
            locals: options.locals,
            runtime: options.expose_runtime.then_some(runtime.as_slice()),
        };

        let result = if options.install_builtins {
            let mut guard = BuiltinsGuard::install(host, &runtime)?;
            call(guard.host(), payload, scope)
        } else {
            call(host, payload, scope)
        };

        if options.globals.is_none() {
            let discarded = host.discard(globals.id());
            if result.is_ok() {
                discarded?;
            }
        }
        Ok(result?)
    }

    /// Whether the REPL should keep reading lines before running `source`.
    pub fn is_incomplete_source<H: Host + ?Sized>(
        &self,
        host: &mut H,
        source: &str,
        filename: &str,
        symbol: &str,
    ) -> Result<bool> {
        match self.transpile(source) {
            Ok(translated) => Ok(host.is_incomplete(&translated, filename, symbol)?),
            Err(TranspileError::Tokenize { message, .. }) if is_unfinished(&message) => Ok(true),
            Err(err) => Err(err),
        }
    }
}

/// Tokeniser messages meaning "more input would fix this".
fn is_unfinished(message: &str) -> bool {
    message.starts_with("EOF in multi-line") || message.contains("triple-quoted")
}

/// `output` with exactly the leading and trailing whitespace of `source`.
fn keep_margins(source: &str, output: &str) -> String {
    let lead = &source[..source.len() - source.trim_start().len()];
    let trail = &source[source.trim_end().len()..];
    format!("{lead}{}{trail}", output.trim())
}

/// Transpile with the built-in dialect.
pub fn transpile(source: &str) -> Result<String> {
    DEFAULT.transpile(source)
}

/// Transpile with the built-in dialect, reporting failures as diagnostics.
pub fn transpile_with_diagnostics(
    source: &str,
    file: Option<&Path>,
) -> std::result::Result<String, diagnostics::Diagnostics> {
    DEFAULT.transpile_with_diagnostics(source, file)
}

/// Transpile a dialect file into a Python file.
pub fn transpile_file(input: &Path, output: &Path) -> Result<()> {
    let source = std::fs::read_to_string(input)?;
    let python = transpile(&source)?;
    std::fs::write(output, python)?;
    Ok(())
}

pub fn compile<H: Host + ?Sized>(
    host: &mut H,
    source: &str,
    filename: &str,
    mode: CompileMode,
    flags: i64,
    dont_inherit: bool,
) -> Result<Code> {
    DEFAULT.compile(host, source, filename, mode, flags, dont_inherit)
}

pub fn exec<H: Host + ?Sized>(
    host: &mut H,
    target: SourceOrCode<'_>,
    options: &ExecOptions<'_>,
) -> Result<()> {
    DEFAULT.exec(host, target, options)
}

pub fn eval<H: Host + ?Sized>(
    host: &mut H,
    target: SourceOrCode<'_>,
    options: &ExecOptions<'_>,
) -> Result<HostValue> {
    DEFAULT.eval(host, target, options)
}

pub fn is_incomplete_source<H: Host + ?Sized>(
    host: &mut H,
    source: &str,
    filename: &str,
    symbol: &str,
) -> Result<bool> {
    DEFAULT.is_incomplete_source(host, source, filename, symbol)
}
