use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, ErrorKind};

/// Supported programming languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    Python,
    Java,
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "javascript" | "js" => Ok(Language::JavaScript),
            "python" | "py" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            _ => Err(Error::InvalidInput(format!("unsupported language: {s}"))),
        }
    }
}

/// Code execution request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Programming language
    pub language: Language,
    /// Source code to execute
    pub source: String,
}

impl ExecutionRequest {
    pub fn new(language: Language, source: impl Into<String>) -> Self {
        Self {
            language,
            source: source.into(),
        }
    }
}

/// Successful execution result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Lines captured from the logging capability, in call order. Only the
    /// in-process JavaScript sandbox separates logs from the final value;
    /// process-backed runners leave this empty.
    #[serde(default)]
    pub logs: Vec<String>,
    /// Final output text, if the execution produced one
    pub output: Option<String>,
}

/// Boundary shape handed to the surrounding application layer.
///
/// `{ success: true, logs, output }` on completion,
/// `{ success: false, error_kind, message }` on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub success: bool,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Result<ExecutionResult, Error>> for ExecutionOutcome {
    fn from(result: Result<ExecutionResult, Error>) -> Self {
        match result {
            Ok(r) => Self {
                success: true,
                logs: r.logs,
                output: r.output,
                error_kind: None,
                message: None,
            },
            Err(e) => Self {
                success: false,
                logs: Vec::new(),
                output: None,
                error_kind: Some(e.kind()),
                message: Some(e.to_string()),
            },
        }
    }
}

/// Per-runner execution budgets and input limits
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Budget for the in-process JavaScript sandbox
    pub script_budget: Duration,
    /// Timeout for the external Python interpreter
    pub interpreter_timeout: Duration,
    /// Timeout for the Java compile phase
    pub compile_timeout: Duration,
    /// Timeout for the Java run phase
    pub run_timeout: Duration,
    /// Maximum accepted source size in bytes
    pub max_source_bytes: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            script_budget: Duration::from_millis(1000),
            interpreter_timeout: Duration::from_millis(2000),
            compile_timeout: Duration::from_secs(10),
            run_timeout: Duration::from_secs(5),
            max_source_bytes: 1024 * 1024,
        }
    }
}
