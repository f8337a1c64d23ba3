//! Bulk import from the pending-import source.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::DuplicateIdPolicy;
use crate::error::{Result, RosterError};
use crate::metrics::{self, ImportResultLabel, InsertSource};
use crate::registry::Student;
use crate::roster::Roster;
use crate::storage::Persistence;

/// Result of a successful import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The pending source does not exist. Nothing changed.
    NothingToImport,
    /// `count` students were inserted and appended to the durable log.
    Imported {
        /// Number of records imported.
        count: usize,
    },
}

/// A parsed pending-import record with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecord {
    /// Line number in the pending source.
    pub line: usize,
    /// The parsed student.
    pub student: Student,
}

/// Parse newline-delimited student records.
///
/// Blank and whitespace-only lines are skipped. The first line that is not a
/// student record fails the whole parse.
pub fn parse_pending(text: &str) -> Result<Vec<PendingRecord>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .map(|student| PendingRecord {
                    line: index + 1,
                    student,
                })
                .map_err(|source| RosterError::MalformedRecord {
                    line: index + 1,
                    source,
                })
        })
        .collect()
}

/// Moves students into the shared [`Roster`] and mirrors them to the durable log.
///
/// Cloning is cheap; clones share the same roster and persistence.
#[derive(Debug, Clone)]
pub struct ImportPipeline {
    pub(super) roster: Arc<RwLock<Roster>>,
    pub(super) persistence: Arc<dyn Persistence>,
    pub(super) policy: DuplicateIdPolicy,
}

impl ImportPipeline {
    /// Create a pipeline over a shared roster.
    pub fn new(
        roster: Arc<RwLock<Roster>>,
        persistence: Arc<dyn Persistence>,
        policy: DuplicateIdPolicy,
    ) -> Self {
        Self {
            roster,
            persistence,
            policy,
        }
    }

    /// The shared roster this pipeline mutates.
    pub fn roster(&self) -> &Arc<RwLock<Roster>> {
        &self.roster
    }

    /// The persistence backend.
    pub fn persistence(&self) -> &Arc<dyn Persistence> {
        &self.persistence
    }

    /// Import every record from the pending source.
    ///
    /// All lines are parsed before anything is inserted, and the whole batch
    /// is inserted under one write lock. The durable log gets a single append
    /// afterwards; if that append fails the inserted students stay in memory.
    pub async fn import_from(&self) -> Result<ImportOutcome> {
        let result = self.run_import().await;

        metrics::inc_imports(match &result {
            Ok(ImportOutcome::Imported { .. }) => ImportResultLabel::Imported,
            Ok(ImportOutcome::NothingToImport) => ImportResultLabel::NothingToImport,
            Err(_) => ImportResultLabel::Failed,
        });

        result
    }

    async fn run_import(&self) -> Result<ImportOutcome> {
        let Some(text) = self.persistence.read_pending().await? else {
            info!(
                "No pending import file {} found. Skipping load.",
                self.persistence.pending_source()
            );
            return Ok(ImportOutcome::NothingToImport);
        };

        let records = parse_pending(&text)?;
        let lines = records
            .iter()
            .map(|record| record.student.to_log_line())
            .collect::<serde_json::Result<Vec<_>>>()?;

        {
            let mut roster = self.roster.write().await;
            if self.policy == DuplicateIdPolicy::Reject {
                check_duplicates(&roster, &records)?;
            }
            for record in records {
                roster.insert(record.student);
            }
        }

        let count = lines.len();
        metrics::inc_students_inserted(InsertSource::Import, count as u64);

        if count == 0 {
            debug!("Pending import source holds no records");
            return Ok(ImportOutcome::Imported { count });
        }

        let mut buffer = lines.join("\n");
        buffer.push('\n');
        self.persistence.append(&buffer).await.map_err(|e| {
            metrics::inc_persistence_failures();
            warn!("Imported {} students but the durable log append failed", count);
            e
        })?;

        info!(
            "Loaded {} students from {} and appended them to {}",
            count,
            self.persistence.pending_source(),
            self.persistence.durable_log()
        );

        Ok(ImportOutcome::Imported { count })
    }
}

fn check_duplicates(roster: &Roster, records: &[PendingRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        let id = record.student.id;
        if roster.registry().contains_id(id) || !seen.insert(id) {
            return Err(RosterError::DuplicateRecord {
                line: record.line,
                id,
            });
        }
    }
    Ok(())
}
