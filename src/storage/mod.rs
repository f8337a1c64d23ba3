//! Storage module for the pending-import source and the durable student log.
//!
//! This module handles:
//! - The [`Persistence`] seam used by the import pipeline
//! - File-backed persistence
//! - In-memory persistence with failure injection for tests

pub mod file;
pub mod mock;

use async_trait::async_trait;

use crate::error::Result;

pub use file::FilePersistence;
pub use mock::{MockConfig, MockPersistence};

/// Reads pending student records and appends accepted ones to the durable log.
#[async_trait]
pub trait Persistence: Send + Sync + std::fmt::Debug {
    /// Read the whole pending-import source.
    ///
    /// Returns `Ok(None)` when the source does not exist; any other failure
    /// is a [`RosterError::StorageRead`](crate::error::RosterError::StorageRead).
    async fn read_pending(&self) -> Result<Option<String>>;

    /// Append `text` to the durable log in one write.
    async fn append(&self, text: &str) -> Result<()>;

    /// Human-readable name of the pending-import source, for messages.
    fn pending_source(&self) -> String;

    /// Human-readable name of the durable log, for messages.
    fn durable_log(&self) -> String;
}
