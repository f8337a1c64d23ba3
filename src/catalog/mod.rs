//! Course catalog: the fixed course list and its popularity counters.

pub mod course;

pub use course::{Course, CourseCatalog};
