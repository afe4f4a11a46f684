//! Runtime library table
//!
//! Translated built-ins and convenience functions exposed to executed code.
//! Each entry names a Python expression the worker evaluates to obtain the
//! value; `module` is the library the value comes from and is what the
//! blacklist filters on.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuntimeEntry {
    pub name: &'static str,
    pub expression: &'static str,
    pub module: &'static str,
}

const fn entry(name: &'static str, expression: &'static str, module: &'static str) -> RuntimeEntry {
    RuntimeEntry {
        name,
        expression,
        module,
    }
}

/// Modules hidden from user code unless the blacklist is overridden.
pub const DEFAULT_BLACKLIST: &[&str] = &["os", "sys", "subprocess"];

pub const RUNTIME_TABLE: &[RuntimeEntry] = &[
    // io
    entry("mostre", "print", "io"),
    entry("mostrar", "print", "io"),
    entry("leia", "input", "io"),
    entry("leia_texto", "input", "io"),
    entry("leia_número", "lambda msg='': float(input(msg))", "io"),
    entry("leia_numero", "lambda msg='': float(input(msg))", "io"),
    entry("leia_inteiro", "lambda msg='': int(input(msg))", "io"),
    // conversions
    entry("inteiro", "int", "builtins"),
    entry("real", "float", "builtins"),
    entry("texto", "str", "builtins"),
    entry("lógico", "bool", "builtins"),
    entry("logico", "bool", "builtins"),
    entry("lista", "list", "builtins"),
    entry("tupla", "tuple", "builtins"),
    entry("conjunto", "set", "builtins"),
    entry("dicionário", "dict", "builtins"),
    entry("dicionario", "dict", "builtins"),
    entry("tipo", "type", "builtins"),
    // sequences
    entry("tamanho", "len", "builtins"),
    entry("intervalo", "range", "builtins"),
    entry("enumere", "enumerate", "builtins"),
    entry("enumerar", "enumerate", "builtins"),
    entry("ordenado", "sorted", "builtins"),
    entry("invertido", "lambda seq: list(reversed(seq))", "builtins"),
    entry("soma", "sum", "builtins"),
    entry("máximo", "max", "builtins"),
    entry("maximo", "max", "builtins"),
    entry("mínimo", "min", "builtins"),
    entry("minimo", "min", "builtins"),
    // math
    entry("absoluto", "abs", "builtins"),
    entry("arredonde", "round", "builtins"),
    entry("arredondar", "round", "builtins"),
    entry("raiz", "math.sqrt", "math"),
    entry("seno", "math.sin", "math"),
    entry("cosseno", "math.cos", "math"),
    entry("tangente", "math.tan", "math"),
    entry("pi", "math.pi", "math"),
    entry("PI", "math.pi", "math"),
    entry("E", "math.e", "math"),
    // random
    entry("aleatório", "random.random", "random"),
    entry("aleatorio", "random.random", "random"),
    entry("inteiro_aleatório", "random.randint", "random"),
    entry("inteiro_aleatorio", "random.randint", "random"),
    entry("escolha", "random.choice", "random"),
    entry("embaralhe", "random.shuffle", "random"),
    // time
    entry("pausa", "time.sleep", "time"),
    entry("agora", "time.time", "time"),
    // process
    entry("saia", "sys.exit", "sys"),
    entry("diretório_atual", "os.getcwd", "os"),
    entry("execute_comando", "subprocess.run", "subprocess"),
    entry("_versão", "'0.4'", "builtins"),
];

/// Names starting with `_` and all-uppercase constants stay private.
pub fn is_public(name: &str) -> bool {
    if name.starts_with('_') {
        return false;
    }
    let mut letters = name.chars().filter(|c| c.is_alphabetic()).peekable();
    if letters.peek().is_none() {
        return true;
    }
    !letters.all(char::is_uppercase)
}

static DEFAULT_NAMESPACE: Lazy<BTreeMap<&'static str, RuntimeEntry>> =
    Lazy::new(|| namespace_with(DEFAULT_BLACKLIST));

/// Public names of the runtime with the default blacklist applied.
pub fn namespace() -> BTreeMap<&'static str, RuntimeEntry> {
    DEFAULT_NAMESPACE.clone()
}

/// Public names of the runtime, dropping entries from `blacklist`ed modules.
pub fn namespace_with<S: AsRef<str>>(blacklist: &[S]) -> BTreeMap<&'static str, RuntimeEntry> {
    RUNTIME_TABLE
        .iter()
        .filter(|e| is_public(e.name))
        .filter(|e| !blacklist.iter().any(|m| m.as_ref() == e.module))
        .map(|e| (e.name, *e))
        .collect()
}
