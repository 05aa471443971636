//! External Python interpreter runner.
//!
//! Source is handed to `python3 -c` as an argument; nothing is written to
//! disk. Stdout is a single combined stream, so `logs` stays empty and the
//! trimmed text becomes `output`.

use std::time::Duration;

use async_trait::async_trait;

use crate::{error::Error, executor::LanguageRunner, process, types::ExecutionResult};

pub struct PythonRunner {
    timeout: Duration,
}

impl PythonRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl LanguageRunner for PythonRunner {
    async fn run(&self, source: &str) -> Result<ExecutionResult, Error> {
        let output = process::supervise("python3", &["-c", source], None, self.timeout).await?;

        if !output.success() {
            return Err(Error::Runtime(output.stderr.trim().to_string()));
        }

        Ok(ExecutionResult {
            logs: Vec::new(),
            output: Some(output.stdout.trim().to_string()),
        })
    }
}
