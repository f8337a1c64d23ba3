//! Student records.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A stored student. Immutable once inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Caller-supplied id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Enrolled course names, in the order given.
    pub courses: Vec<String>,
}

impl Student {
    /// Create a student record.
    pub fn new(id: i64, name: impl Into<String>, courses: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            courses,
        }
    }

    /// Whether the name contains `fragment`, ignoring case.
    /// `fragment` must already be lowercase.
    pub(crate) fn name_contains_lowercase(&self, fragment: &str) -> bool {
        self.name.to_lowercase().contains(fragment)
    }

    /// One durable-log line, without the trailing newline.
    pub fn to_log_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Unvalidated student payload from a request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewStudent {
    /// Required, non-zero.
    #[serde(default)]
    pub id: Option<i64>,
    /// Required, non-empty.
    #[serde(default)]
    pub name: Option<String>,
    /// Required, at least one entry.
    #[serde(default)]
    pub courses: Option<Vec<String>>,
}

impl NewStudent {
    /// Check required fields. Zero ids and empty strings count as missing.
    pub fn validate(self) -> Result<Student, ValidationError> {
        let id = self.id.filter(|id| *id != 0);
        let name = self.name.filter(|name| !name.is_empty());
        let courses = self.courses.filter(|courses| !courses.is_empty());

        match (id, name, courses) {
            (Some(id), Some(name), Some(courses)) => Ok(Student { id, name, courses }),
            _ => Err(ValidationError::MissingFields),
        }
    }
}
