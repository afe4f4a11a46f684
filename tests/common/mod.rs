//! In-memory host used by the façade and REPL tests.

use std::collections::HashMap;

use pytuga::bridge::bridge_error::BridgeError;
use pytuga::bridge::host::{Code, Host, Scope};
use pytuga::bridge::protocol::{CompileMode, HostValue, Payload};
use pytuga::RuntimeEntry;

const STATEMENT_KEYWORDS: &[&str] = &["for", "if", "while", "def", "class", "import", "from"];

#[derive(Default)]
pub struct MockHost {
    pub codes: HashMap<String, String>,
    /// Translated sources passed to exec, in order
    pub executed: Vec<String>,
    /// Translated sources passed to eval, in order
    pub evaluated: Vec<String>,
    pub globals_seen: Vec<String>,
    pub runtime_seen: Option<Vec<String>>,
    pub installs: usize,
    pub restores: usize,
    /// Ids passed to discard, in order
    pub discarded: Vec<String>,
    pub builtins_active_during_exec: bool,
    pub fail_exec: bool,
    pub installed: bool,
}

fn syntax_error(lineno: usize) -> BridgeError {
    BridgeError::PythonException {
        py_type: "SyntaxError".to_string(),
        message: "invalid syntax".to_string(),
        traceback: None,
        lineno: Some(lineno),
        offset: None,
    }
}

impl MockHost {
    fn source_of(&self, payload: &Payload<'_>) -> Result<String, BridgeError> {
        match payload {
            Payload::Source { source, .. } => Ok(source.to_string()),
            Payload::Code { id } => self
                .codes
                .get(*id)
                .cloned()
                .ok_or_else(|| BridgeError::StaleHandle(id.to_string())),
        }
    }

    fn observe(&mut self, scope: &Scope<'_>) {
        self.globals_seen.push(scope.globals.id().to_string());
        self.runtime_seen = scope
            .runtime
            .map(|entries| entries.iter().map(|e| e.name.to_string()).collect());
    }
}

impl Host for MockHost {
    fn compile(
        &mut self,
        source: &str,
        filename: &str,
        mode: CompileMode,
        _flags: i64,
        _dont_inherit: bool,
    ) -> Result<Code, BridgeError> {
        let first = source.split_whitespace().next().unwrap_or("");
        let statement = source.contains(" = ") || STATEMENT_KEYWORDS.contains(&first);
        if mode == CompileMode::Eval && statement {
            return Err(syntax_error(1));
        }
        let id = format!("code{}", self.codes.len());
        self.codes.insert(id.clone(), source.to_string());
        Ok(Code {
            id,
            mode,
            filename: filename.to_string(),
        })
    }

    fn exec(&mut self, payload: Payload<'_>, scope: Scope<'_>) -> Result<(), BridgeError> {
        let source = self.source_of(&payload)?;
        self.observe(&scope);
        self.builtins_active_during_exec = self.installed;
        self.executed.push(source);
        if self.fail_exec {
            return Err(BridgeError::PythonException {
                py_type: "NameError".to_string(),
                message: "name 'y' is not defined".to_string(),
                traceback: None,
                lineno: Some(2),
                offset: None,
            });
        }
        Ok(())
    }

    /// Echoes the translated expression back as an opaque value.
    fn eval(&mut self, payload: Payload<'_>, scope: Scope<'_>) -> Result<HostValue, BridgeError> {
        let source = self.source_of(&payload)?;
        self.observe(&scope);
        self.evaluated.push(source.clone());
        if source.trim() == "None" {
            return Ok(HostValue::NONE);
        }
        Ok(HostValue::Handle {
            id: "h".to_string(),
            type_: "str".to_string(),
            repr: source.trim().to_string(),
        })
    }

    fn is_incomplete(&mut self, source: &str, _: &str, _: &str) -> Result<bool, BridgeError> {
        let opens_block = source.lines().any(|l| l.trim_end().ends_with(':'));
        Ok(opens_block && !source.ends_with("\n\n"))
    }

    fn install_builtins(&mut self, _runtime: &[RuntimeEntry]) -> Result<(), BridgeError> {
        self.installs += 1;
        self.installed = true;
        Ok(())
    }

    fn restore_builtins(&mut self) -> Result<(), BridgeError> {
        self.restores += 1;
        self.installed = false;
        Ok(())
    }

    fn discard(&mut self, id: &str) -> Result<(), BridgeError> {
        self.discarded.push(id.to_string());
        Ok(())
    }
}
