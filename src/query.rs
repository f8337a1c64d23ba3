//! Read-only views over the roster.

use crate::catalog::Course;
use crate::error::{Result, RosterError};
use crate::registry::{SearchCriteria, Student};
use crate::roster::Roster;

/// Message for a course id with no catalog entry.
pub const COURSE_NOT_FOUND: &str = "Course not found";
/// Message for a search with no matching students.
pub const NO_MATCHING_STUDENTS: &str = "No matching students found";

/// Read-only queries over a borrowed roster snapshot.
#[derive(Debug, Clone, Copy)]
pub struct QueryService<'a> {
    roster: &'a Roster,
}

impl<'a> QueryService<'a> {
    /// Query `roster`. Hold the roster's read lock for as long as this lives.
    pub fn new(roster: &'a Roster) -> Self {
        Self { roster }
    }

    /// All courses, most popular first. Never fails.
    pub fn sorted_courses(&self) -> Vec<Course> {
        self.roster.catalog().sorted_by_popularity_desc()
    }

    /// One course by id.
    pub fn course(&self, id: u32) -> Result<Course> {
        self.roster
            .catalog()
            .find_by_id(id)
            .cloned()
            .ok_or(RosterError::NotFound(COURSE_NOT_FOUND))
    }

    /// Students matching `criteria`. An empty match is `NotFound`.
    pub fn search_students(&self, criteria: &SearchCriteria) -> Result<Vec<Student>> {
        let found: Vec<Student> = self
            .roster
            .registry()
            .search(criteria)
            .into_iter()
            .cloned()
            .collect();

        if found.is_empty() {
            return Err(RosterError::NotFound(NO_MATCHING_STUDENTS));
        }
        Ok(found)
    }
}
