//! Snapshot persistence for the session aggregate.
//!
//! The durable store is a single JSON document per session, overwritten
//! on every flush. [`SnapshotSink`] is the seam between the scheduler
//! and the storage backend; [`FileSnapshotStore`] is the shipped
//! implementation, writing pretty-printed JSON through a temp-file +
//! rename pair so a crash mid-write never leaves a truncated snapshot.
//!
//! Write failures are never fatal. The in-memory aggregate is the
//! source of truth and a failed write is superseded by the next
//! scheduled save.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use livepulse_types::SessionState;

/// Errors that can occur while persisting a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Serialization of the aggregate failed.
    #[error("snapshot serialization error: {0}")]
    Serialization(String),

    /// The write to the durable store failed.
    #[error("snapshot write error: {0}")]
    Write(String),
}

/// A durable destination for session snapshots.
///
/// Implementations overwrite the previous snapshot on every write; the
/// store holds at most one document per session.
#[allow(async_fn_in_trait)]
pub trait SnapshotSink {
    /// Durably write one snapshot, replacing any prior one.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if serialization or the write fails.
    async fn write(&self, state: &SessionState) -> Result<(), PersistError>;
}

/// File-backed snapshot store.
///
/// Serializes the aggregate as pretty-printed JSON and replaces the
/// target file atomically via a sibling temp file and rename.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling temp path used for the atomic replace.
    fn tmp_path(&self) -> PathBuf {
        let mut os: OsString = self.path.as_os_str().to_owned();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

impl SnapshotSink for FileSnapshotStore {
    async fn write(&self, state: &SessionState) -> Result<(), PersistError> {
        let bytes = serde_json::to_vec_pretty(state)
            .map_err(|e| PersistError::Serialization(e.to_string()))?;

        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| PersistError::Write(format!("{}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| PersistError::Write(format!("{}: {e}", self.path.display())))?;

        tracing::debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            "Snapshot written"
        );
        Ok(())
    }
}
