//! Host interpreter abstraction
//!
//! [`Host`] is what the façade needs from a Python interpreter. The resident
//! worker ([`super::PythonBridge`]) implements it; tests use an in-memory mock.

use uuid::Uuid;

use super::bridge_error::BridgeError;
use super::protocol::{CompileMode, HostValue, Payload};
use crate::runtime::RuntimeEntry;

/// A code object compiled by the host, kept on the host side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    pub id: String,
    pub mode: CompileMode,
    pub filename: String,
}

/// A host dictionary used as `globals` or `locals`. The host creates it on
/// first use and keeps it alive for the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    id: String,
}

impl Namespace {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

/// Where `exec`/`eval` run and what they see.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub globals: &'a Namespace,
    pub locals: Option<&'a Namespace>,
    /// Runtime names merged into `globals` before running
    pub runtime: Option<&'a [RuntimeEntry]>,
}

pub trait Host {
    fn compile(
        &mut self,
        source: &str,
        filename: &str,
        mode: CompileMode,
        flags: i64,
        dont_inherit: bool,
    ) -> Result<Code, BridgeError>;

    fn exec(&mut self, payload: Payload<'_>, scope: Scope<'_>) -> Result<(), BridgeError>;

    fn eval(&mut self, payload: Payload<'_>, scope: Scope<'_>) -> Result<HostValue, BridgeError>;

    /// Whether `source` is a prefix of a longer valid statement.
    fn is_incomplete(
        &mut self,
        source: &str,
        filename: &str,
        symbol: &str,
    ) -> Result<bool, BridgeError>;

    fn install_builtins(&mut self, runtime: &[RuntimeEntry]) -> Result<(), BridgeError>;

    fn restore_builtins(&mut self) -> Result<(), BridgeError>;

    /// Drop a worker-side namespace, code object or value handle by id.
    fn discard(&mut self, _id: &str) -> Result<(), BridgeError> {
        Ok(())
    }
}

/// Runtime names installed into the host's builtins for the guard's
/// lifetime. Dropping the guard restores the previous table, whether the
/// guarded work succeeded or not.
pub struct BuiltinsGuard<'h, H: Host + ?Sized> {
    host: &'h mut H,
    armed: bool,
}

impl<'h, H: Host + ?Sized> BuiltinsGuard<'h, H> {
    pub fn install(host: &'h mut H, runtime: &[RuntimeEntry]) -> Result<Self, BridgeError> {
        host.install_builtins(runtime)?;
        Ok(Self { host, armed: true })
    }

    pub fn host(&mut self) -> &mut H {
        &mut *self.host
    }

    /// Restore now and report failure instead of swallowing it in `Drop`.
    pub fn release(mut self) -> Result<(), BridgeError> {
        self.armed = false;
        self.host.restore_builtins()
    }
}

impl<H: Host + ?Sized> Drop for BuiltinsGuard<'_, H> {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.host.restore_builtins();
        }
    }
}
