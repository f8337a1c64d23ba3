//! Student registry module.
//!
//! This module handles:
//! - Student record types and request payload validation
//! - The insertion-ordered student collection
//! - Typed search criteria

pub mod search;
pub mod store;
pub mod student;

pub use search::SearchCriteria;
pub use store::StudentRegistry;
pub use student::{NewStudent, Student};
