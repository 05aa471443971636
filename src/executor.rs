use async_trait::async_trait;
use tracing::debug;

use crate::{
    error::Error,
    languages::{JavaRunner, JavaScriptRunner, PythonRunner},
    types::{ExecutionRequest, ExecutionResult, ExecutorConfig, Language},
};

/// One capability shared by all language runners: take source text, return a
/// normalized result or a classified failure.
#[async_trait]
pub trait LanguageRunner: Send + Sync {
    async fn run(&self, source: &str) -> Result<ExecutionResult, Error>;
}

/// Public entry point: validates the request, selects the language runner,
/// and passes its result or failure through unchanged.
pub struct CodeExecutor {
    config: ExecutorConfig,
}

impl CodeExecutor {
    pub fn new() -> Self {
        Self::with_config(ExecutorConfig::default())
    }

    pub fn with_config(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionResult, Error> {
        // Malformed requests are rejected before any runner is selected, so
        // they cost no workspace allocation and no process spawn.
        if request.source.trim().is_empty() {
            return Err(Error::InvalidInput("source must not be empty".to_string()));
        }
        if request.source.len() > self.config.max_source_bytes {
            return Err(Error::InvalidInput(format!(
                "source exceeds {} bytes",
                self.config.max_source_bytes
            )));
        }

        debug!(language = ?request.language, bytes = request.source.len(), "dispatching execution");
        self.runner_for(request.language).run(&request.source).await
    }

    fn runner_for(&self, language: Language) -> Box<dyn LanguageRunner> {
        match language {
            Language::JavaScript => Box::new(JavaScriptRunner::new(self.config.script_budget)),
            Language::Python => Box::new(PythonRunner::new(self.config.interpreter_timeout)),
            Language::Java => Box::new(JavaRunner::new(
                self.config.compile_timeout,
                self.config.run_timeout,
            )),
        }
    }
}

impl Default for CodeExecutor {
    fn default() -> Self {
        Self::new()
    }
}
