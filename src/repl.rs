//! Interactive prompt
//!
//! Lines are collected until the host says the statement is complete, then
//! evaluated as an expression (echoing non-None results) or executed as
//! statements. Errors are printed as one-line diagnostics and the prompt
//! starts over.

use std::io::{self, BufRead, Write};

use crate::bridge::host::{Host, Namespace};
use crate::bridge::protocol::{CompileMode, HostValue};
use crate::diagnostics;
use crate::error::TranspileError;
use crate::{ExecOptions, SourceOrCode, Transpiler};

pub const PRIMARY_PROMPT: &str = ">>> ";
pub const CONTINUATION_PROMPT: &str = "... ";
const FILENAME: &str = "<input>";

pub struct Repl<'t, H: Host> {
    transpiler: &'t Transpiler,
    host: H,
    globals: Namespace,
    debug: bool,
}

impl<'t, H: Host> Repl<'t, H> {
    pub fn new(transpiler: &'t Transpiler, host: H) -> Self {
        Self {
            transpiler,
            host,
            globals: Namespace::new(),
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Read-eval-print until `input` is exhausted.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> io::Result<()> {
        let mut buffer = String::new();
        loop {
            let prompt = if buffer.is_empty() {
                PRIMARY_PROMPT
            } else {
                CONTINUATION_PROMPT
            };
            write!(out, "{prompt}")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(());
            }
            if !line.ends_with('\n') {
                line.push('\n');
            }
            buffer.push_str(&line);

            if buffer.trim().is_empty() {
                buffer.clear();
                continue;
            }

            match self
                .transpiler
                .is_incomplete_source(&mut self.host, &buffer, FILENAME, "single")
            {
                Ok(true) => continue,
                Ok(false) => match self.submit(&buffer) {
                    Ok(Some(value)) => writeln!(out, "{value}")?,
                    Ok(None) => {}
                    Err(err) => report(&mut out, &err)?,
                },
                Err(err) => report(&mut out, &err)?,
            }
            buffer.clear();
        }
    }

    /// Run one complete chunk. Expressions return their value when it is not
    /// `None`.
    pub fn submit(&mut self, source: &str) -> Result<Option<HostValue>, TranspileError> {
        if self.debug {
            println!("[DEBUG] Translated: {:?}", self.transpiler.transpile(source)?);
        }
        let options = ExecOptions {
            globals: Some(&self.globals),
            filename: FILENAME,
            ..ExecOptions::default()
        };

        let compiled = self.transpiler.compile(
            &mut self.host,
            source,
            FILENAME,
            CompileMode::Eval,
            0,
            false,
        );
        match compiled {
            Ok(code) => {
                let value = self
                    .transpiler
                    .eval(&mut self.host, SourceOrCode::Code(&code), &options);
                self.host.discard(&code.id)?;
                let value = value?;
                // The echo only needs the repr; worker-side objects go now.
                for id in value.handle_ids() {
                    self.host.discard(id)?;
                }
                Ok((!value.is_none()).then_some(value))
            }
            // Not an expression: run it as statements
            Err(TranspileError::Host(_)) => {
                self.transpiler
                    .exec(&mut self.host, SourceOrCode::Source(source), &options)?;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

fn report<W: Write>(out: &mut W, err: &TranspileError) -> io::Result<()> {
    let file = std::path::Path::new(FILENAME);
    write!(out, "{}", diagnostics::from_error(err, Some(file)).to_text())
}
