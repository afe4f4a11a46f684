//! NDJSON protocol spoken with the resident Python worker.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::runtime::RuntimeEntry;

// --- Data Types (Tagged Union) ---

/// A value coming back from the host interpreter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HostValue {
    Value {
        value: Option<JsonPrimitive>,
    },
    /// Integer outside the `i64` range, as decimal digits
    Integer {
        digits: String,
    },
    /// Object without a JSON form; it stays in the worker
    Handle {
        id: String,
        #[serde(rename = "type")]
        type_: String,
        repr: String,
    },
    List {
        items: Vec<HostValue>,
    },
    Tuple {
        items: Vec<HostValue>,
    },
    Dict {
        items: Vec<DictItem>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonPrimitive {
    Bool(bool),
    Int(i64),
    Number(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictItem {
    pub key: HostValue,
    pub value: HostValue,
}

// --- From Implementations ---

impl From<i64> for HostValue {
    fn from(n: i64) -> Self {
        HostValue::Value {
            value: Some(JsonPrimitive::Int(n)),
        }
    }
}

impl From<f64> for HostValue {
    fn from(n: f64) -> Self {
        HostValue::Value {
            value: Some(JsonPrimitive::Number(n)),
        }
    }
}

impl From<bool> for HostValue {
    fn from(b: bool) -> Self {
        HostValue::Value {
            value: Some(JsonPrimitive::Bool(b)),
        }
    }
}

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        HostValue::Value {
            value: Some(JsonPrimitive::String(s.to_string())),
        }
    }
}

// --- Helper Methods ---

impl HostValue {
    pub const NONE: HostValue = HostValue::Value { value: None };

    pub fn is_none(&self) -> bool {
        matches!(self, HostValue::Value { value: None })
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HostValue::Value {
                value: Some(JsonPrimitive::Int(n)),
            } => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HostValue::Value {
                value: Some(JsonPrimitive::Number(n)),
            } => Some(*n),
            HostValue::Value {
                value: Some(JsonPrimitive::Int(n)),
            } => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HostValue::Value {
                value: Some(JsonPrimitive::Bool(b)),
            } => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::Value {
                value: Some(JsonPrimitive::String(s)),
            } => Some(s.as_str()),
            _ => None,
        }
    }

    /// Id of the worker-side object, for handles.
    pub fn handle_id(&self) -> Option<&str> {
        match self {
            HostValue::Handle { id, .. } => Some(id.as_str()),
            _ => None,
        }
    }

    /// Ids of every handle in the value, nested ones included.
    pub fn handle_ids(&self) -> Vec<&str> {
        match self {
            HostValue::Handle { id, .. } => vec![id.as_str()],
            HostValue::List { items } | HostValue::Tuple { items } => {
                items.iter().flat_map(HostValue::handle_ids).collect()
            }
            HostValue::Dict { items } => items
                .iter()
                .flat_map(|item| {
                    let mut ids = item.key.handle_ids();
                    ids.extend(item.value.handle_ids());
                    ids
                })
                .collect(),
            HostValue::Value { .. } | HostValue::Integer { .. } => Vec::new(),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[HostValue]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Python `repr` of the value, as the REPL echoes it.
impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Value { value: None } => f.write_str("None"),
            HostValue::Value { value: Some(p) } => match p {
                JsonPrimitive::Bool(true) => f.write_str("True"),
                JsonPrimitive::Bool(false) => f.write_str("False"),
                JsonPrimitive::Int(n) => write!(f, "{n}"),
                JsonPrimitive::Number(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{n:.1}"),
                JsonPrimitive::Number(n) => write!(f, "{n}"),
                JsonPrimitive::String(s) => {
                    let escaped = s.replace('\\', "\\\\").replace('\n', "\\n");
                    if s.contains('\'') && !s.contains('"') {
                        write!(f, "\"{escaped}\"")
                    } else {
                        write!(f, "'{}'", escaped.replace('\'', "\\'"))
                    }
                }
            },
            HostValue::Integer { digits } => f.write_str(digits),
            HostValue::Handle { repr, .. } => f.write_str(repr),
            HostValue::List { items } => {
                f.write_str("[")?;
                write_items(f, items)?;
                f.write_str("]")
            }
            HostValue::Tuple { items } => {
                f.write_str("(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            HostValue::Dict { items } => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", item.key, item.value)?;
                }
                f.write_str("}")
            }
        }
    }
}

// --- Commands ---

/// Host compile modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompileMode {
    #[default]
    Exec,
    Eval,
    Single,
}

/// What to run: transpiled source text or a compiled code handle.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Payload<'a> {
    Source { source: &'a str, filename: &'a str },
    Code { id: &'a str },
}

#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command<'a> {
    Compile {
        session_id: String,
        req_id: Option<String>,
        source: &'a str,
        filename: &'a str,
        mode: CompileMode,
        flags: i64,
        dont_inherit: bool,
    },
    Exec {
        session_id: String,
        req_id: Option<String>,
        payload: Payload<'a>,
        globals: &'a str,
        locals: Option<&'a str>,
        runtime: Option<&'a [RuntimeEntry]>,
    },
    Eval {
        session_id: String,
        req_id: Option<String>,
        payload: Payload<'a>,
        globals: &'a str,
        locals: Option<&'a str>,
        runtime: Option<&'a [RuntimeEntry]>,
    },
    IsIncomplete {
        session_id: String,
        req_id: Option<String>,
        source: &'a str,
        filename: &'a str,
        symbol: &'a str,
    },
    InstallBuiltins {
        session_id: String,
        req_id: Option<String>,
        runtime: &'a [RuntimeEntry],
    },
    RestoreBuiltins {
        session_id: String,
        req_id: Option<String>,
    },
    Delete {
        session_id: String,
        req_id: Option<String>,
        target: &'a str,
    },
}

// --- Response ---

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Response {
    Ok {
        req_id: Option<String>,
        value: HostValue,
    },
    Error {
        req_id: Option<String>,
        error: BridgeErrorDetail,
    },
    /// Text written by running user code
    Output {
        text: String,
    },
    /// Running user code reads a line; answered with an [`InputReply`]
    Input,
}

#[derive(Debug, Serialize)]
pub struct InputReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    pub eof: bool,
}

#[derive(Debug, Deserialize)]
pub struct BridgeErrorDetail {
    pub code: String,
    pub py_type: Option<String>,
    pub message: String,
    pub traceback: Option<String>,
    pub lineno: Option<usize>,
    pub offset: Option<usize>,
}
