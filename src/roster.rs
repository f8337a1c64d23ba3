//! The course catalog and student registry as one mutation unit.

use crate::catalog::CourseCatalog;
use crate::registry::{Student, StudentRegistry};

/// Catalog and registry together.
///
/// Every insert goes through [`Roster::insert`], so a holder of `&Roster`
/// never sees a student without its popularity increments.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    catalog: CourseCatalog,
    registry: StudentRegistry,
}

impl Roster {
    /// Create a roster over `catalog` with no students.
    pub fn new(catalog: CourseCatalog) -> Self {
        Self {
            catalog,
            registry: StudentRegistry::new(),
        }
    }

    /// Roster with the startup catalog.
    pub fn seeded() -> Self {
        Self::new(CourseCatalog::seeded())
    }

    /// Store a student and update course popularity.
    pub fn insert(&mut self, student: Student) {
        self.registry.insert(student, &mut self.catalog);
    }

    /// The course catalog.
    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    /// The student registry.
    pub fn registry(&self) -> &StudentRegistry {
        &self.registry
    }
}
