use std::fmt;

use serde::{Deserialize, Serialize};

/// Error codes the front-end receives on rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Library, symbol or ABI version could not be resolved. Sticky for the
    /// lifetime of the load guard.
    LoadFailure,
    /// A single call failed. Later calls may still succeed.
    CallFailure,
    /// The module is not registered with the host.
    NotLinked,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::LoadFailure => "LOAD_FAILURE",
            ErrorKind::CallFailure => "CALL_FAILURE",
            ErrorKind::NotLinked => "NOT_LINKED",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Bridge error as it reaches the front-end: `{"code": .., "message": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct BridgeError {
    #[serde(rename = "code")]
    pub kind: ErrorKind,
    pub message: String,
}

impl BridgeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn load_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LoadFailure, message)
    }

    pub fn call_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CallFailure, message)
    }

    pub fn not_linked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotLinked, message)
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}
