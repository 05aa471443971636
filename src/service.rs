use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::{
    error::Error,
    executor::CodeExecutor,
    types::{ExecutionRequest, ExecutionResult, ExecutorConfig},
};

/// Executor wrapper that bounds how many executions run at once.
///
/// Each compiled-language execution spawns two OS processes, so an unbounded
/// caller can exhaust the host under load. Callers that want the raw
/// unqueued behavior can use [`CodeExecutor`] directly.
#[derive(Clone)]
pub struct ExecutionService {
    executor: Arc<CodeExecutor>,
    semaphore: Arc<Semaphore>,
}

impl ExecutionService {
    pub fn new(max_concurrent_executions: usize) -> Self {
        Self::with_config(max_concurrent_executions, ExecutorConfig::default())
    }

    pub fn with_config(max_concurrent_executions: usize, config: ExecutorConfig) -> Self {
        Self {
            executor: Arc::new(CodeExecutor::with_config(config)),
            semaphore: Arc::new(Semaphore::new(max_concurrent_executions)),
        }
    }

    pub async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionResult, Error> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| Error::Internal(format!("failed to acquire execution permit: {e}")))?;

        debug!(language = ?request.language, "starting execution");
        let result = self.executor.execute(request).await;

        match &result {
            Ok(_) => info!("execution completed"),
            Err(e) => error!("execution failed: {e}"),
        }

        result
    }

    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }
}
