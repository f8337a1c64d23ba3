//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::config::DuplicateIdPolicy;
use crate::error::{RosterError, ValidationError};
use crate::import::{ImportOutcome, ImportPipeline};
use crate::query::{QueryService, COURSE_NOT_FOUND};
use crate::registry::{NewStudent, SearchCriteria};
use crate::roster::Roster;
use crate::storage::Persistence;

use super::response::{message, ApiError};

/// Answer for any failed import.
pub const IMPORT_FAILED: &str = "Failed to load and update students from file.";
/// Answer for an import with no pending source.
pub const NOTHING_TO_IMPORT: &str = "No pending import file found. Nothing to import.";
/// Answer for a stored student.
pub const STUDENT_ADDED: &str = "Student added successfully!";
/// Answer for a server-side insert failure.
pub const INTERNAL_ERROR: &str = "Internal server error";
/// Answer for a student search without criteria.
pub const SEARCH_PARAMS_REQUIRED: &str = "Please provide either id or name as a query parameter";

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Catalog and registry, one lock for both.
    pub roster: Arc<RwLock<Roster>>,
    /// Import and insert entry points over the same roster.
    pub pipeline: ImportPipeline,
    /// Prometheus exporter, when installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state with the seeded catalog and no students.
    pub fn new(persistence: Arc<dyn Persistence>, policy: DuplicateIdPolicy) -> Self {
        let roster = Arc::new(RwLock::new(Roster::seeded()));
        let pipeline = ImportPipeline::new(roster.clone(), persistence, policy);
        Self {
            roster,
            pipeline,
            metrics: None,
        }
    }

    /// Serve `/metrics` from `handle`.
    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Query string of `GET /searchStudent`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Student id, as given.
    pub id: Option<String>,
    /// Name fragment.
    pub name: Option<String>,
}

impl SearchParams {
    /// Typed criteria, or `None` when neither parameter is given.
    ///
    /// Empty values count as absent. A non-numeric id counts as given but
    /// matches no student.
    pub fn criteria(self) -> Option<SearchCriteria> {
        let id = self.id.filter(|s| !s.is_empty());
        let name = self.name.filter(|s| !s.is_empty());
        if id.is_none() && name.is_none() {
            return None;
        }

        Some(SearchCriteria {
            by_id: id.and_then(|s| s.trim().parse().ok()),
            by_name_substring: name,
        })
    }
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Prometheus scrape handler - 404 when metrics are disabled.
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Import the pending source into the roster.
pub async fn load_and_update_students(State(state): State<AppState>) -> Result<Response, ApiError> {
    let outcome = state
        .pipeline
        .import_from()
        .await
        .map_err(|e| ApiError::new(e, IMPORT_FAILED))?;

    let persistence = state.pipeline.persistence();
    Ok(match outcome {
        ImportOutcome::NothingToImport => message(StatusCode::OK, NOTHING_TO_IMPORT),
        ImportOutcome::Imported { .. } => message(
            StatusCode::OK,
            format!(
                "Students loaded from {} and updated in {} successfully!",
                persistence.pending_source(),
                persistence.durable_log()
            ),
        ),
    })
}

/// Store one student from the request body.
pub async fn add_student(
    State(state): State<AppState>,
    body: Result<Json<NewStudent>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(candidate) = body.map_err(|rejection| {
        ApiError::new(
            ValidationError::MalformedBody(rejection.body_text()).into(),
            INTERNAL_ERROR,
        )
    })?;

    let student = state
        .pipeline
        .insert_one(candidate)
        .await
        .map_err(|e| ApiError::new(e, INTERNAL_ERROR))?;

    info!("Added student {}", student.id);
    Ok(message(StatusCode::OK, STUDENT_ADDED))
}

/// All courses, most popular first.
pub async fn sort_courses(State(state): State<AppState>) -> impl IntoResponse {
    let roster = state.roster.read().await;
    let courses = QueryService::new(&roster).sorted_courses();
    Json(courses)
}

/// One course by id. Non-numeric ids are not found.
pub async fn search_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: u32 = id
        .trim()
        .parse()
        .map_err(|_| ApiError::new(RosterError::NotFound(COURSE_NOT_FOUND), INTERNAL_ERROR))?;

    let roster = state.roster.read().await;
    let course = QueryService::new(&roster)
        .course(id)
        .map_err(|e| ApiError::new(e, INTERNAL_ERROR))?;

    Ok(Json(course).into_response())
}

/// Students by id and/or name fragment.
pub async fn search_student(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let Some(criteria) = params.criteria() else {
        return Ok(message(StatusCode::BAD_REQUEST, SEARCH_PARAMS_REQUIRED));
    };

    let roster = state.roster.read().await;
    let students = QueryService::new(&roster)
        .search_students(&criteria)
        .map_err(|e| ApiError::new(e, INTERNAL_ERROR))?;

    Ok(Json(students).into_response())
}
