//! Student enrollment and course popularity service.
//!
//! Students are held in memory together with a fixed course catalog whose
//! popularity counters track how many stored students name each course.
//! Every accepted student is mirrored to an append-only log of JSON lines.
//!
//! ```text
//! insert.txt ──import──┐
//!                      ├──> Roster { CourseCatalog, StudentRegistry } ──> students.txt
//! POST /addStudent ────┘
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`catalog`]: Courses and popularity counters
//! - [`registry`]: Student records, validation and search
//! - [`roster`]: Catalog and registry as one mutation unit
//! - [`storage`]: Pending-import source and durable log
//! - [`import`]: Bulk import and single inserts
//! - [`query`]: Read-only views
//! - [`api`]: HTTP API
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod import;
pub mod metrics;
pub mod query;
pub mod registry;
pub mod roster;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use error::{Result, RosterError};
