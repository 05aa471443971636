//! Language-specific runner implementations

mod java;
mod javascript;
mod python;

pub use java::JavaRunner;
pub use javascript::JavaScriptRunner;
pub use python::PythonRunner;

#[cfg(test)]
pub(crate) fn skip_if_not_available(tools: &[&str]) -> bool {
    let missing: Vec<_> = tools
        .iter()
        .filter(|tool| which::which(**tool).is_err())
        .map(|s| (*s).to_string())
        .collect();

    if !missing.is_empty() {
        eprintln!("Skipping test: {} not available", missing.join(", "));
        return true;
    }
    false
}
