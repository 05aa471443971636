//! In-process JavaScript sandbox backed by an embedded boa_engine context.
//!
//! Each call evaluates in a fresh, disposable context. A bare boa context
//! exposes pure ECMAScript only: no filesystem, network, or process
//! capability exists for sandboxed code to reach. The single host-visible
//! capability is a `console` shim whose calls accumulate into an in-memory
//! log read back after evaluation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use boa_engine::{Context, Source};
use tokio::time;
use tracing::debug;

use crate::{error::Error, executor::LanguageRunner, types::ExecutionResult};

/// Caps on interpreter work, so a runaway script aborts inside the engine
/// rather than pinning the blocking thread past its budget.
const LOOP_ITERATION_LIMIT: u64 = 10_000_000;
const RECURSION_LIMIT: usize = 1_024;

/// Extra time allowed for the blocking task to be joined after the budget.
const JOIN_GRACE: Duration = Duration::from_millis(250);

/// Installed before user code; the only capability reachable from the script.
const CONSOLE_SHIM: &str = r#"
var __exam_logs = [];
var console = (function () {
    function write() {
        var parts = [];
        for (var i = 0; i < arguments.length; i++) {
            var arg = arguments[i];
            if (typeof arg === 'object' && arg !== null) {
                try { parts.push(JSON.stringify(arg)); } catch (e) { parts.push(String(arg)); }
            } else {
                parts.push(String(arg));
            }
        }
        __exam_logs.push(parts.join(' '));
    }
    return { log: write, info: write, warn: write, error: write };
})();
"#;

/// Caller-facing timeouts are enforced by the wall-clock race; the blocking
/// thread itself is reclaimed only when the engine's runtime limits trip, so
/// a script dominated by one heavy non-loop operation can keep the thread
/// busy past the budget after `Timeout` has already been returned.
pub struct JavaScriptRunner {
    budget: Duration,
}

impl JavaScriptRunner {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }
}

#[async_trait]
impl LanguageRunner for JavaScriptRunner {
    async fn run(&self, source: &str) -> Result<ExecutionResult, Error> {
        let budget = self.budget;
        let source = source.to_owned();

        // boa is synchronous; evaluate on the blocking pool and race the
        // handle against the wall clock. The engine's runtime limits bound
        // the blocking thread itself, so a timed-out script cannot keep
        // spinning in the background.
        let handle = tokio::task::spawn_blocking(move || evaluate(&source, budget));
        match time::timeout(budget + JOIN_GRACE, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(Error::Internal(format!("sandbox task failed: {e}"))),
            Err(_) => Err(Error::Timeout(budget.as_millis() as u64)),
        }
    }
}

fn evaluate(source: &str, budget: Duration) -> Result<ExecutionResult, Error> {
    let started = Instant::now();

    let mut context = Context::default();
    context
        .runtime_limits_mut()
        .set_loop_iteration_limit(LOOP_ITERATION_LIMIT);
    context.runtime_limits_mut().set_recursion_limit(RECURSION_LIMIT);

    context
        .eval(Source::from_bytes(CONSOLE_SHIM))
        .map_err(|e| Error::Internal(format!("failed to install console shim: {e}")))?;

    let completion = match context.eval(Source::from_bytes(source)) {
        Ok(value) => value,
        Err(e) => {
            let message = e.to_string();
            return if started.elapsed() >= budget || is_limit_error(&message) {
                Err(Error::Timeout(budget.as_millis() as u64))
            } else {
                Err(Error::Runtime(message))
            };
        }
    };
    if started.elapsed() >= budget {
        return Err(Error::Timeout(budget.as_millis() as u64));
    }

    let logs = drain_logs(&mut context);
    let output = if completion.is_undefined() || completion.is_null() {
        None
    } else {
        // Scripts may produce values whose stringification throws; treat
        // those as producing no output rather than failing the execution.
        completion
            .to_string(&mut context)
            .ok()
            .map(|s| s.to_std_string_escaped())
    };

    debug!(elapsed_ms = started.elapsed().as_millis() as u64, "script evaluation finished");
    Ok(ExecutionResult { logs, output })
}

/// Errors raised by the engine's own runtime limits count as budget
/// exhaustion, not script bugs.
fn is_limit_error(message: &str) -> bool {
    message.contains("loop iteration limit")
        || message.contains("recursion limit")
        || message.contains("stack size limit")
}

/// Read the shim's accumulated log lines back out of the context.
///
/// `__exam_logs` is an ordinary global, so user code may have pushed
/// non-string values into it; those are stringified per element rather than
/// failing the whole parse and dropping legitimately logged lines.
fn drain_logs(context: &mut Context) -> Vec<String> {
    context
        .eval(Source::from_bytes("JSON.stringify(__exam_logs)"))
        .ok()
        .and_then(|v| v.as_string().map(|s| s.to_std_string_escaped()))
        .and_then(|json| serde_json::from_str::<Vec<serde_json::Value>>(&json).ok())
        .map(|values| {
            values
                .into_iter()
                .map(|value| match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}
