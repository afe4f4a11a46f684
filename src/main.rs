//! Pytuga CLI - Portuguese-keyword Python dialect

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use pytuga::repl::Repl;
use pytuga::{DialectConfig, ExecOptions, PythonBridge, SourceOrCode, Transpiler};

/// File extension of dialect sources
const DIALECT_EXTENSION: &str = "pytg";

/// Pytuga - Python with Portuguese keywords
#[derive(Parser, Debug)]
#[command(name = "pytuga")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run or translate Python written with Portuguese keywords", long_about = None)]
struct Cli {
    /// Dialect source file; starts the interactive prompt when absent
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// JSON file extending the keyword tables
    #[arg(long, value_name = "JSON")]
    dialect: Option<PathBuf>,

    /// Print the translated Python source instead of running it
    #[arg(short, long)]
    transpile: bool,

    /// Check only (report errors and warnings, don't run)
    #[arg(short, long)]
    check: bool,

    /// Dump the rewritten token list and exit
    #[arg(long)]
    tokens: bool,

    /// Show debug information
    #[arg(short, long)]
    debug: bool,

    /// Emit JSON diagnostics to stderr (on failure only)
    #[arg(long)]
    diag_json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        println!("[DEBUG] Input: {:?}", cli.input);
        println!("[DEBUG] Dialect: {:?}", cli.dialect);
    }

    let transpiler = match &cli.dialect {
        Some(path) => {
            let config = DialectConfig::load(path)
                .with_context(|| format!("reading dialect file {}", path.display()))?;
            Transpiler::with_config(&config)?
        }
        None => Transpiler::new(),
    };

    let Some(input) = cli.input.clone() else {
        let bridge = PythonBridge::new()?;
        let stdin = std::io::stdin();
        Repl::new(&transpiler, bridge)
            .with_debug(cli.debug)
            .run(stdin.lock(), std::io::stdout())?;
        return Ok(());
    };

    if input.extension().and_then(|e| e.to_str()) != Some(DIALECT_EXTENSION) {
        eprintln!(
            "[PTG-EXTENSION] {}:1:1 expected a .{} file",
            input.display(),
            DIALECT_EXTENSION
        );
        std::process::exit(2);
    }

    let source = std::fs::read_to_string(&input)
        .with_context(|| format!("reading {}", input.display()))?;

    if cli.debug {
        println!("[DEBUG] Source length: {} bytes", source.len());
    }

    if cli.tokens {
        let tokens = match transpiler.tokens(&source) {
            Ok(tokens) => tokens,
            Err(err) => fail(&pytuga::diagnostics::from_error(&err, Some(&input)), cli.diag_json),
        };
        println!("=== Tokens ===");
        for (i, tok) in tokens.iter().enumerate() {
            println!("[{:03}] {}", i, tok);
        }
        return Ok(());
    }

    if cli.check {
        let diags = transpiler.check(&source, Some(&input));
        print!("{}", diags.to_text());
        if diags.has_errors() {
            fail(&diags, cli.diag_json);
        }
        println!("✅ Translation successful!");
        return Ok(());
    }

    let python = match transpiler.transpile_with_diagnostics(&source, Some(&input)) {
        Ok(code) => code,
        Err(diags) => fail(&diags, cli.diag_json),
    };

    if cli.debug {
        println!("[DEBUG] Translated source:");
        println!("{python}");
    }

    if cli.transpile {
        print!("{python}");
        return Ok(());
    }

    run_file(&transpiler, &source, &input, cli.diag_json)
}

/// Execute the file in a fresh namespace with the runtime exposed.
fn run_file(transpiler: &Transpiler, source: &str, input: &Path, diag_json: bool) -> Result<()> {
    let mut bridge = PythonBridge::new()?;
    let filename = input.display().to_string();
    let options = ExecOptions {
        filename: &filename,
        ..ExecOptions::default()
    };
    if let Err(err) = transpiler.exec(&mut bridge, SourceOrCode::Source(source), &options) {
        fail(&pytuga::diagnostics::from_error(&err, Some(input)), diag_json);
    }
    Ok(())
}

fn fail(diags: &pytuga::diagnostics::Diagnostics, diag_json: bool) -> ! {
    print!("{}", diags.to_text());
    if diag_json {
        eprintln!("{}", diags.to_json());
    }
    std::process::exit(1);
}
