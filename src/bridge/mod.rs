//! PythonBridge - communication with the resident Python worker
//!
//! Launches a Python worker process from the Rust binary and talks NDJSON
//! over its stdin/stdout. While user code runs the worker forwards its
//! output and input requests as events on the same channel.

pub mod bridge_error;
pub mod host;
pub mod protocol;

use std::cell::RefCell;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use self::bridge_error::BridgeError;
use self::host::{Code, Host, Namespace, Scope};
use self::protocol::{Command as BridgeCmd, CompileMode, HostValue, InputReply, Payload, Response};
use crate::runtime::RuntimeEntry;

/// Embedded Python worker code
const WORKER_CODE: &str = include_str!("python/worker.py");

/// Environment variable naming the interpreter to launch
pub const PYTHON_ENV: &str = "PYTUGA_PYTHON";

struct Channel {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Manages communication with the Python worker
pub struct PythonBridge {
    process: RefCell<Child>,
    channel: RefCell<Channel>,
    request_id: AtomicU64,
    session_id: String,
}

fn spawn(program: &str) -> std::io::Result<Child> {
    Command::new(program)
        .args(["-u", "-c", WORKER_CODE])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
}

impl PythonBridge {
    /// Launch the Python worker
    pub fn new() -> Result<Self, BridgeError> {
        let (cmd_name, is_fallback) = match std::env::var(PYTHON_ENV) {
            Ok(path) => (path, false),
            Err(_) => ("python3".to_string(), true),
        };

        eprintln!("[pytuga] Launching Python worker with: {}", cmd_name);

        let mut child_result = spawn(&cmd_name);
        if child_result.is_err() && is_fallback {
            eprintln!("[pytuga] 'python3' failed, trying 'python'...");
            child_result = spawn("python");
        }

        let mut process = child_result.map_err(|e| {
            eprintln!("[pytuga] Failed to launch Python worker: {:?}", e);
            BridgeError::Launch(e.to_string())
        })?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| BridgeError::Unknown("Failed to get stdin".into()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| BridgeError::Unknown("Failed to get stdout".into()))?;

        Ok(Self {
            process: RefCell::new(process),
            channel: RefCell::new(Channel {
                stdin,
                stdout: BufReader::new(stdout),
            }),
            request_id: AtomicU64::new(1),
            session_id: Uuid::new_v4().to_string(),
        })
    }

    fn next_req_id(&self) -> Option<String> {
        Some(self.request_id.fetch_add(1, Ordering::SeqCst).to_string())
    }

    fn read_line(channel: &mut Channel) -> Result<String, BridgeError> {
        let mut line = String::new();
        channel.stdout.read_line(&mut line)?;
        if line.is_empty() {
            return Err(BridgeError::WorkerCrash(
                "Worker closed stdout (EOF). The Python process probably crashed; see stderr above."
                    .into(),
            ));
        }
        Ok(line)
    }

    /// Send one command and wait for its result, serving output and input
    /// events the running code produces in between.
    fn send_command(&self, cmd: BridgeCmd<'_>) -> Result<HostValue, BridgeError> {
        let mut channel = self.channel.borrow_mut();

        let json_req = serde_json::to_string(&cmd)?;
        writeln!(channel.stdin, "{}", json_req)?;
        channel.stdin.flush()?;

        loop {
            let line = Self::read_line(&mut channel)?;
            let response: Response = serde_json::from_str(&line)
                .map_err(|e| BridgeError::Protocol(format!("bad response {line:?}: {e}")))?;

            match response {
                Response::Ok { value, .. } => return Ok(value),
                Response::Error { error, .. } => return Err(BridgeError::from_api_error(error)),
                Response::Output { text } => {
                    let mut out = std::io::stdout();
                    out.write_all(text.as_bytes())?;
                    out.flush()?;
                }
                Response::Input => {
                    let mut buf = String::new();
                    let read = std::io::stdin().read_line(&mut buf)?;
                    let reply = if read == 0 {
                        InputReply {
                            line: None,
                            eof: true,
                        }
                    } else {
                        InputReply {
                            line: Some(buf),
                            eof: false,
                        }
                    };
                    writeln!(channel.stdin, "{}", serde_json::to_string(&reply)?)?;
                    channel.stdin.flush()?;
                }
            }
        }
    }

    pub fn delete(&self, target: &str) -> Result<(), BridgeError> {
        self.send_command(BridgeCmd::Delete {
            session_id: self.session_id.clone(),
            req_id: self.next_req_id(),
            target,
        })?;
        Ok(())
    }

    pub fn shutdown(&mut self) -> Result<(), BridgeError> {
        // The worker loop ends when its stdin closes; kill covers a hung worker.
        let mut process = self.process.borrow_mut();
        if process.try_wait()?.is_none() {
            process.kill()?;
        }
        process.wait()?;
        Ok(())
    }
}

impl Host for PythonBridge {
    fn compile(
        &mut self,
        source: &str,
        filename: &str,
        mode: CompileMode,
        flags: i64,
        dont_inherit: bool,
    ) -> Result<Code, BridgeError> {
        let value = self.send_command(BridgeCmd::Compile {
            session_id: self.session_id.clone(),
            req_id: self.next_req_id(),
            source,
            filename,
            mode,
            flags,
            dont_inherit,
        })?;
        let id = value.handle_id().ok_or_else(|| {
            BridgeError::TypeMismatch(format!("compile returned {value:?} instead of a code handle"))
        })?;
        Ok(Code {
            id: id.to_string(),
            mode,
            filename: filename.to_string(),
        })
    }

    fn exec(&mut self, payload: Payload<'_>, scope: Scope<'_>) -> Result<(), BridgeError> {
        self.send_command(BridgeCmd::Exec {
            session_id: self.session_id.clone(),
            req_id: self.next_req_id(),
            payload,
            globals: scope.globals.id(),
            locals: scope.locals.map(Namespace::id),
            runtime: scope.runtime,
        })?;
        Ok(())
    }

    fn eval(&mut self, payload: Payload<'_>, scope: Scope<'_>) -> Result<HostValue, BridgeError> {
        self.send_command(BridgeCmd::Eval {
            session_id: self.session_id.clone(),
            req_id: self.next_req_id(),
            payload,
            globals: scope.globals.id(),
            locals: scope.locals.map(Namespace::id),
            runtime: scope.runtime,
        })
    }

    fn is_incomplete(
        &mut self,
        source: &str,
        filename: &str,
        symbol: &str,
    ) -> Result<bool, BridgeError> {
        let value = self.send_command(BridgeCmd::IsIncomplete {
            session_id: self.session_id.clone(),
            req_id: self.next_req_id(),
            source,
            filename,
            symbol,
        })?;
        value.as_bool().ok_or_else(|| {
            BridgeError::TypeMismatch(format!("is_incomplete returned {value:?}"))
        })
    }

    fn install_builtins(&mut self, runtime: &[RuntimeEntry]) -> Result<(), BridgeError> {
        self.send_command(BridgeCmd::InstallBuiltins {
            session_id: self.session_id.clone(),
            req_id: self.next_req_id(),
            runtime,
        })?;
        Ok(())
    }

    fn restore_builtins(&mut self) -> Result<(), BridgeError> {
        self.send_command(BridgeCmd::RestoreBuiltins {
            session_id: self.session_id.clone(),
            req_id: self.next_req_id(),
        })?;
        Ok(())
    }

    fn discard(&mut self, id: &str) -> Result<(), BridgeError> {
        self.delete(id)
    }
}

impl Drop for PythonBridge {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
