//! Course records and the fixed course catalog.

use serde::{Deserialize, Serialize};

/// A course with its enrollment counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Catalog id.
    pub id: u32,
    /// Unique course name, matched exactly against student enrollments.
    pub name: String,
    /// Number of stored enrollments naming this course.
    pub popularity: u64,
}

impl Course {
    /// Create a course with zero popularity.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            popularity: 0,
        }
    }
}

/// Fixed set of courses. Membership never changes after construction;
/// only popularity counters move.
#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    courses: Vec<Course>,
}

impl CourseCatalog {
    /// Build a catalog from an explicit course list, in catalog order.
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// The catalog every process starts with.
    pub fn seeded() -> Self {
        Self::new(vec![
            Course::new(1, "Math 101"),
            Course::new(2, "History 101"),
            Course::new(3, "Physics 101"),
        ])
    }

    /// Look up a course by id.
    pub fn find_by_id(&self, id: u32) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Look up a course by exact, case-sensitive name.
    pub fn find_by_name(&self, name: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.name == name)
    }

    /// Bump the counter of the course called `name`, if any.
    pub fn increment_popularity(&mut self, name: &str) {
        if let Some(course) = self.courses.iter_mut().find(|c| c.name == name) {
            course.popularity += 1;
        }
    }

    /// Copy of the catalog ordered by popularity, highest first.
    /// Ties keep catalog order.
    pub fn sorted_by_popularity_desc(&self) -> Vec<Course> {
        let mut sorted = self.courses.clone();
        sorted.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        sorted
    }

    /// Courses in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter()
    }

    /// Number of courses.
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog has no courses.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
