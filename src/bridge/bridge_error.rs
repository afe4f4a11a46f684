use thiserror::Error;

use super::protocol::BridgeErrorDetail;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Protocol Error: {0}")]
    Protocol(String),

    #[error("Stale Handle: {0} (unknown to this worker session)")]
    StaleHandle(String),

    #[error("Worker Crash: {0}")]
    WorkerCrash(String),

    #[error("Launch Error: no usable Python interpreter ({0})")]
    Launch(String),

    #[error("Python Exception ({py_type}): {message}")]
    PythonException {
        py_type: String,
        message: String,
        traceback: Option<String>,
        /// Line reported by the host; transpiled code keeps source lines
        lineno: Option<usize>,
        offset: Option<usize>,
    },

    #[error("Type Mismatch: {0}")]
    TypeMismatch(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown Error: {0}")]
    Unknown(String),
}

impl BridgeError {
    /// Convert a worker error payload into a BridgeError
    pub fn from_api_error(detail: BridgeErrorDetail) -> Self {
        let BridgeErrorDetail {
            code,
            py_type,
            message,
            traceback,
            lineno,
            offset,
        } = detail;
        match code.as_str() {
            "ProtocolError" => BridgeError::Protocol(message),
            "StaleHandle" => BridgeError::StaleHandle(message),
            "PythonException" => BridgeError::PythonException {
                py_type: py_type.unwrap_or_else(|| "Exception".to_string()),
                message,
                traceback,
                lineno,
                offset,
            },
            "TypeMismatch" => BridgeError::TypeMismatch(message),
            _ => BridgeError::Unknown(format!("{}: {}", code, message)),
        }
    }

    pub fn lineno(&self) -> Option<usize> {
        match self {
            BridgeError::PythonException { lineno, .. } => *lineno,
            _ => None,
        }
    }

    /// Python exception class name, when the host raised one.
    pub fn py_type(&self) -> Option<&str> {
        match self {
            BridgeError::PythonException { py_type, .. } => Some(py_type.as_str()),
            _ => None,
        }
    }
}
