//! Single-record insert path.

use tracing::{debug, warn};

use crate::config::DuplicateIdPolicy;
use crate::error::{Result, ValidationError};
use crate::metrics::{self, InsertSource};
use crate::registry::{NewStudent, Student};

use super::pipeline::ImportPipeline;

impl ImportPipeline {
    /// Validate and store one student, then append it to the durable log.
    ///
    /// Memory and log are updated as two separate steps. When the append
    /// fails the error is returned but the student stays stored.
    pub async fn insert_one(&self, candidate: NewStudent) -> Result<Student> {
        let student = candidate.validate()?;
        let mut line = student.to_log_line()?;
        line.push('\n');

        {
            let mut roster = self.roster.write().await;
            if self.policy == DuplicateIdPolicy::Reject && roster.registry().contains_id(student.id) {
                return Err(ValidationError::DuplicateId(student.id).into());
            }
            roster.insert(student.clone());
        }

        metrics::inc_students_inserted(InsertSource::Direct, 1);
        debug!("Stored student {} ({})", student.id, student.name);

        self.persistence.append(&line).await.map_err(|e| {
            metrics::inc_persistence_failures();
            warn!(
                "Student {} is stored in memory but missing from {}",
                student.id,
                self.persistence.durable_log()
            );
            e
        })?;

        Ok(student)
    }
}
