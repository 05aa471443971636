use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("entry point not found: {0}")]
    EntryPointNotFound(String),

    #[error("compilation failed: {0}")]
    Compile(String),

    #[error("execution failed: {0}")]
    Runtime(String),

    #[error("timed out after {0} ms")]
    Timeout(u64),

    #[error("failed to start process: {0}")]
    Spawn(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Failure classification exposed at the caller boundary.
///
/// Every [`Error`] maps to exactly one kind; callers decide whether to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    EntryPointNotFound,
    CompileError,
    RuntimeError,
    Timeout,
    SpawnError,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::EntryPointNotFound(_) => ErrorKind::EntryPointNotFound,
            Error::Compile(_) => ErrorKind::CompileError,
            Error::Runtime(_) => ErrorKind::RuntimeError,
            Error::Timeout(_) => ErrorKind::Timeout,
            Error::Spawn(_) => ErrorKind::SpawnError,
            Error::Internal(_) => ErrorKind::Internal,
        }
    }
}
