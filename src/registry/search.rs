//! Typed student search criteria.

/// Criteria for a student search.
///
/// Present fields are OR-ed per record: a student is returned when its id
/// equals `by_id` or its name contains `by_name_substring` (case-insensitive).
/// Matching both criteria still yields the student once. Absent fields match
/// nothing, so empty criteria match nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Exact id match.
    pub by_id: Option<i64>,
    /// Case-insensitive name fragment.
    pub by_name_substring: Option<String>,
}

impl SearchCriteria {
    /// Search by id only.
    pub fn by_id(id: i64) -> Self {
        Self {
            by_id: Some(id),
            by_name_substring: None,
        }
    }

    /// Search by name fragment only.
    pub fn by_name(fragment: impl Into<String>) -> Self {
        Self {
            by_id: None,
            by_name_substring: Some(fragment.into()),
        }
    }

    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_none() && self.by_name_substring.is_none()
    }

    /// Build a record predicate. The fragment is lowercased once.
    pub(crate) fn matcher(&self) -> impl Fn(&super::Student) -> bool + '_ {
        let fragment = self.by_name_substring.as_deref().map(str::to_lowercase);
        move |student| {
            self.by_id.is_some_and(|id| student.id == id)
                || fragment
                    .as_deref()
                    .is_some_and(|f| student.name_contains_lowercase(f))
        }
    }
}
