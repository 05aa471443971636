//! # Exam Code Execution Sandbox
//!
//! Runs untrusted, user-authored source text submitted for exam coding
//! questions and returns its output. Three languages are supported, each with
//! its own isolation strategy:
//!
//! - JavaScript runs inside an embedded [`boa_engine`] interpreter in this
//!   process, with a fixed execution budget and no host capabilities beyond a
//!   captured `console`.
//! - Python is piped to an external `python3` process; nothing touches disk.
//! - Java is materialized into an ephemeral workspace directory, compiled with
//!   `javac` and run with `java`; the workspace is removed on every exit path.
//!
//! Every execution is independent: a fresh interpreter context, process, or
//! workspace is created per call and discarded afterwards.

mod error;
mod executor;
mod languages;
mod process;
mod service;
mod types;
mod workspace;

#[cfg(test)]
mod tests;

pub use error::{Error, ErrorKind};
pub use executor::{CodeExecutor, LanguageRunner};
pub use service::ExecutionService;
pub use types::{
    ExecutionOutcome, ExecutionRequest, ExecutionResult, ExecutorConfig, Language,
};

/// Result type for code execution operations
pub type Result<T> = std::result::Result<T, Error>;
