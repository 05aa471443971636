//! Compiled Java runner: materialize, compile, run, clean up.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::{
    error::Error, executor::LanguageRunner, process, types::ExecutionResult,
    workspace::Workspace,
};

fn public_class_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"public\s+(?:final\s+|abstract\s+|strictfp\s+)*class\s+([A-Za-z_$][A-Za-z0-9_$]*)")
            .expect("hardcoded pattern compiles")
    })
}

/// Name of the first public class declared in `source`, which is the entry
/// point `java` must be handed and the required name of the source file.
///
/// Text-pattern matching is a heuristic; it is kept in this one function so
/// the rule can be hardened without touching the runner.
pub(crate) fn public_class_name(source: &str) -> Option<String> {
    public_class_pattern()
        .captures(source)
        .map(|captures| captures[1].to_string())
}

pub struct JavaRunner {
    compile_timeout: Duration,
    run_timeout: Duration,
}

impl JavaRunner {
    pub fn new(compile_timeout: Duration, run_timeout: Duration) -> Self {
        Self {
            compile_timeout,
            run_timeout,
        }
    }
}

#[async_trait]
impl LanguageRunner for JavaRunner {
    async fn run(&self, source: &str) -> Result<ExecutionResult, Error> {
        // The workspace is reclaimed by Drop on every return path below,
        // including the entry-point failure before anything is written.
        let workspace = Workspace::create().await?;

        let class_name = public_class_name(source).ok_or_else(|| {
            Error::EntryPointNotFound("expected a public class declaration".to_string())
        })?;
        debug!(class = %class_name, "resolved entry point");

        let file_name = format!("{class_name}.java");
        workspace.write_source(&file_name, source).await?;

        let compile = process::supervise(
            "javac",
            &[file_name.as_str()],
            Some(workspace.path()),
            self.compile_timeout,
        )
        .await?;
        if !compile.success() {
            return Err(Error::Compile(compile.stderr.trim().to_string()));
        }

        let run = process::supervise(
            "java",
            &[class_name.as_str()],
            Some(workspace.path()),
            self.run_timeout,
        )
        .await?;
        if !run.success() {
            return Err(Error::Runtime(run.stderr.trim().to_string()));
        }

        Ok(ExecutionResult {
            logs: Vec::new(),
            output: Some(run.stdout.trim().to_string()),
        })
    }
}
