use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::{
    error::Error,
    executor::CodeExecutor,
    languages::skip_if_not_available,
    types::{ExecutionOutcome, ExecutionRequest, Language},
};

mod sources {
    pub const JS_LOG_AND_VALUE: &str = "console.log('hi'); 2+2";
    pub const JS_SPIN: &str = "while(true){}";
    pub const PY_PRINT: &str = "print(6*7)";
    pub const JAVA_HELLO: &str = r#"
        public class Main {
            public static void main(String[] a) {
                System.out.println("hi");
            }
        }
    "#;
    pub const JAVA_NO_ENTRY_POINT: &str = r#"
        class Main {
            static void main(String[] a) { }
        }
    "#;
    pub const JAVA_SYNTAX_ERROR: &str = r#"
        public class Main {
            public static void main(String[] a) {
                System.out.println("hi"
            }
        }
    "#;
}

fn executor() -> CodeExecutor {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    CodeExecutor::new()
}

fn workspace_entries() -> HashSet<PathBuf> {
    std::fs::read_dir(std::env::temp_dir())
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with("exam-exec-"))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Entries created by concurrently running tests may be in flight at the
/// moment of the second snapshot; only an entry that persists counts as a
/// leak.
async fn assert_no_workspace_survives(before: &HashSet<PathBuf>) {
    let mut leaked: Vec<PathBuf> = Vec::new();
    for _ in 0..20 {
        leaked = workspace_entries().difference(before).cloned().collect();
        if leaked.is_empty() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("workspace directories were not cleaned up: {leaked:?}");
}

#[tokio::test]
async fn empty_source_is_rejected_for_every_language() {
    for language in [Language::JavaScript, Language::Python, Language::Java] {
        for source in ["", "   \n\t"] {
            let result = executor()
                .execute(ExecutionRequest::new(language, source))
                .await;
            assert!(
                matches!(result, Err(Error::InvalidInput(_))),
                "{language:?} accepted {source:?}"
            );
        }
    }
}

#[tokio::test]
async fn oversized_source_is_rejected() {
    let source = format!("var s = '{}';", "x".repeat(2 * 1024 * 1024));
    let result = executor()
        .execute(ExecutionRequest::new(Language::JavaScript, source))
        .await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[tokio::test]
async fn javascript_logs_and_final_value() {
    let result = executor()
        .execute(ExecutionRequest::new(
            Language::JavaScript,
            sources::JS_LOG_AND_VALUE,
        ))
        .await
        .unwrap();
    assert_eq!(result.logs, vec!["hi".to_string()]);
    assert_eq!(result.output.as_deref(), Some("4"));
}

#[tokio::test]
async fn javascript_spin_times_out_near_budget() {
    let started = Instant::now();
    let result = executor()
        .execute(ExecutionRequest::new(Language::JavaScript, sources::JS_SPIN))
        .await;
    assert!(matches!(result, Err(Error::Timeout(_))));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn python_print_is_returned_as_output() {
    if skip_if_not_available(&["python3"]) {
        return;
    }
    let result = executor()
        .execute(ExecutionRequest::new(Language::Python, sources::PY_PRINT))
        .await
        .unwrap();
    assert_eq!(result.output.as_deref(), Some("42"));
    assert!(result.logs.is_empty());
}

#[tokio::test]
async fn java_hello_compiles_and_runs() {
    if skip_if_not_available(&["javac", "java"]) {
        return;
    }
    let result = executor()
        .execute(ExecutionRequest::new(Language::Java, sources::JAVA_HELLO))
        .await
        .unwrap();
    assert_eq!(result.output.as_deref(), Some("hi"));
}

#[tokio::test]
async fn java_without_public_class_never_reaches_the_compiler() {
    // Deliberately ungated: the failure must occur before any tool lookup.
    let result = executor()
        .execute(ExecutionRequest::new(
            Language::Java,
            sources::JAVA_NO_ENTRY_POINT,
        ))
        .await;
    assert!(matches!(result, Err(Error::EntryPointNotFound(_))));
}

#[tokio::test]
async fn java_syntax_error_reports_compiler_diagnostics() {
    if skip_if_not_available(&["javac"]) {
        return;
    }
    let result = executor()
        .execute(ExecutionRequest::new(
            Language::Java,
            sources::JAVA_SYNTAX_ERROR,
        ))
        .await;
    match result {
        Err(Error::Compile(msg)) => assert!(!msg.is_empty()),
        other => panic!("expected compile failure, got {other:?}"),
    }
}

#[tokio::test]
async fn java_entry_point_failure_leaves_no_workspace_behind() {
    // Deliberately ungated: the workspace is allocated and reclaimed before
    // any tool lookup happens.
    let before = workspace_entries();
    let result = executor()
        .execute(ExecutionRequest::new(
            Language::Java,
            sources::JAVA_NO_ENTRY_POINT,
        ))
        .await;
    assert!(matches!(result, Err(Error::EntryPointNotFound(_))));
    assert_no_workspace_survives(&before).await;
}

#[tokio::test]
async fn java_success_and_compile_failure_leave_no_workspace_behind() {
    if skip_if_not_available(&["javac", "java"]) {
        return;
    }

    let before = workspace_entries();
    let ok = executor()
        .execute(ExecutionRequest::new(Language::Java, sources::JAVA_HELLO))
        .await
        .unwrap();
    assert_eq!(ok.output.as_deref(), Some("hi"));

    let failed = executor()
        .execute(ExecutionRequest::new(
            Language::Java,
            sources::JAVA_SYNTAX_ERROR,
        ))
        .await;
    assert!(matches!(failed, Err(Error::Compile(_))));

    assert_no_workspace_survives(&before).await;
}

#[tokio::test]
async fn concurrent_java_executions_do_not_interfere() {
    if skip_if_not_available(&["javac", "java"]) {
        return;
    }

    let mut handles = vec![];
    for i in 0..3 {
        handles.push(tokio::spawn(async move {
            let source = format!(
                r#"
                public class Main {{
                    public static void main(String[] a) {{
                        System.out.println("worker {i}");
                    }}
                }}
                "#
            );
            executor()
                .execute(ExecutionRequest::new(Language::Java, source))
                .await
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.output.as_deref(), Some(format!("worker {i}").as_str()));
    }
}

#[tokio::test]
async fn outcome_round_trips_through_json() {
    let result = executor()
        .execute(ExecutionRequest::new(
            Language::JavaScript,
            sources::JS_LOG_AND_VALUE,
        ))
        .await;
    let outcome = ExecutionOutcome::from(result);
    let json = serde_json::to_string(&outcome).unwrap();
    let parsed: ExecutionOutcome = serde_json::from_str(&json).unwrap();
    assert!(parsed.success);
    assert_eq!(parsed.logs, vec!["hi".to_string()]);
    assert_eq!(parsed.output.as_deref(), Some("4"));
}
