//! In-memory persistence for unit testing.
//!
//! This module provides a persistence backend that keeps the pending source
//! and the durable log in memory, with switches to simulate IO failures.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Result, RosterError};

use super::Persistence;

/// Configuration for mock persistence behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Whether reading the pending source fails.
    pub fail_read: bool,
    /// Whether appending to the durable log fails.
    pub fail_append: bool,
}

/// Mock persistence for testing.
#[derive(Debug, Clone, Default)]
pub struct MockPersistence {
    /// Mock configuration.
    config: Arc<Mutex<MockConfig>>,
    /// Pending source text; `None` simulates a missing file.
    pending: Arc<Mutex<Option<String>>>,
    /// Every successful append, in call order.
    appended: Arc<Mutex<Vec<String>>>,
}

impl MockPersistence {
    /// Create mock persistence with no pending source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create mock persistence with custom failure configuration.
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config: Arc::new(Mutex::new(config)),
            ..Self::default()
        }
    }

    /// Create mock persistence with the given pending source text.
    pub fn with_pending(text: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.set_pending(Some(text.into()));
        mock
    }

    /// Replace the pending source.
    pub fn set_pending(&self, text: Option<String>) {
        *lock(&self.pending) = text;
    }

    /// Toggle read failures.
    pub fn set_fail_read(&self, fail: bool) {
        lock(&self.config).fail_read = fail;
    }

    /// Toggle append failures.
    pub fn set_fail_append(&self, fail: bool) {
        lock(&self.config).fail_append = fail;
    }

    /// Every successful append call, in order.
    pub fn appends(&self) -> Vec<String> {
        lock(&self.appended).clone()
    }

    /// Concatenation of all appends, as the log file would read.
    pub fn log_contents(&self) -> String {
        lock(&self.appended).concat()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Persistence for MockPersistence {
    async fn read_pending(&self) -> Result<Option<String>> {
        if lock(&self.config).fail_read {
            return Err(RosterError::StorageRead {
                path: PathBuf::from(self.pending_source()),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "mock read failure"),
            });
        }
        Ok(lock(&self.pending).clone())
    }

    async fn append(&self, text: &str) -> Result<()> {
        if lock(&self.config).fail_append {
            return Err(RosterError::Persistence {
                path: PathBuf::from(self.durable_log()),
                source: std::io::Error::new(std::io::ErrorKind::Other, "mock append failure"),
            });
        }
        lock(&self.appended).push(text.to_string());
        Ok(())
    }

    fn pending_source(&self) -> String {
        "mock-insert.txt".to_string()
    }

    fn durable_log(&self) -> String {
        "mock-students.txt".to_string()
    }
}
