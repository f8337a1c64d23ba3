//! File-backed persistence.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, RosterError};

use super::Persistence;

/// Reads the pending-import file and appends to the durable log file.
///
/// The pending file is never modified. Appends are serialized so concurrent
/// writers never interleave within a line.
#[derive(Debug)]
pub struct FilePersistence {
    pending_import_path: PathBuf,
    student_log_path: PathBuf,
    append_lock: Mutex<()>,
}

impl FilePersistence {
    /// Create persistence over the two given files.
    pub fn new(pending_import_path: impl Into<PathBuf>, student_log_path: impl Into<PathBuf>) -> Self {
        Self {
            pending_import_path: pending_import_path.into(),
            student_log_path: student_log_path.into(),
            append_lock: Mutex::new(()),
        }
    }

    /// Create persistence over the configured files.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.pending_import_path, &config.student_log_path)
    }

    /// Pending-import file path.
    pub fn pending_import_path(&self) -> &Path {
        &self.pending_import_path
    }

    /// Durable log file path.
    pub fn student_log_path(&self) -> &Path {
        &self.student_log_path
    }

    async fn write_all(&self, text: &str) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.student_log_path)
            .await?;
        file.write_all(text.as_bytes()).await?;
        file.flush().await
    }
}

#[async_trait]
impl Persistence for FilePersistence {
    async fn read_pending(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.pending_import_path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(RosterError::StorageRead {
                path: self.pending_import_path.clone(),
                source,
            }),
        }
    }

    async fn append(&self, text: &str) -> Result<()> {
        let _guard = self.append_lock.lock().await;
        self.write_all(text)
            .await
            .map_err(|source| RosterError::Persistence {
                path: self.student_log_path.clone(),
                source,
            })?;
        debug!("Appended {} bytes to {}", text.len(), self.student_log_path.display());
        Ok(())
    }

    fn pending_source(&self) -> String {
        self.pending_import_path.display().to_string()
    }

    fn durable_log(&self) -> String {
        self.student_log_path.display().to_string()
    }
}
