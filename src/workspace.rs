//! Ephemeral per-execution workspace directories.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Error;

/// A uniquely named directory owned by exactly one in-flight execution.
///
/// The directory is removed when the workspace is dropped, on every exit
/// path. Removal failures are logged and swallowed so they can never mask the
/// execution outcome already determined.
pub(crate) struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub async fn create() -> Result<Self, Error> {
        let root = std::env::temp_dir().join(format!("exam-exec-{}", Uuid::new_v4()));
        fs::create_dir_all(&root).await.map_err(|e| {
            Error::Internal(format!(
                "failed to create workspace {}: {e}",
                root.display()
            ))
        })?;
        debug!(workspace = %root.display(), "allocated workspace");
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub async fn write_source(&self, file_name: &str, contents: &str) -> Result<PathBuf, Error> {
        let path = self.root.join(file_name);
        fs::write(&path, contents)
            .await
            .map_err(|e| Error::Internal(format!("failed to write {}: {e}", path.display())))?;
        Ok(path)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.root) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(workspace = %self.root.display(), "failed to remove workspace: {e}");
            }
        }
    }
}
