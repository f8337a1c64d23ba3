//! Growable student collection.

use crate::catalog::CourseCatalog;

use super::search::SearchCriteria;
use super::student::Student;

/// All students inserted during this process lifetime, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct StudentRegistry {
    students: Vec<Student>,
}

impl StudentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a student and bump the catalog counter for each enrollment entry.
    ///
    /// Does not check for duplicate ids. Course names without a catalog entry
    /// are kept on the record but count toward nothing.
    pub fn insert(&mut self, student: Student, catalog: &mut CourseCatalog) {
        for course in &student.courses {
            catalog.increment_popularity(course);
        }
        self.students.push(student);
    }

    /// First student with this id.
    pub fn find_by_id(&self, id: i64) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Students whose name contains `fragment`, ignoring case.
    pub fn find_by_name_substring(&self, fragment: &str) -> Vec<&Student> {
        self.search(&SearchCriteria::by_name(fragment))
    }

    /// Students matching any present criterion, in insertion order.
    pub fn search(&self, criteria: &SearchCriteria) -> Vec<&Student> {
        let matches = criteria.matcher();
        self.students.iter().filter(|s| matches(*s)).collect()
    }

    /// Whether any stored student has this id.
    pub fn contains_id(&self, id: i64) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Students in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    /// Number of stored students.
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Whether no student is stored.
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
