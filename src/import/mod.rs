//! Import module: the two ways students enter the roster.
//!
//! This module handles:
//! - Bulk import from the pending-import source
//! - Validated single-record inserts

pub mod insert;
pub mod pipeline;

pub use pipeline::{parse_pending, ImportOutcome, ImportPipeline, PendingRecord};
