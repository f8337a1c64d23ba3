//! HTTP API route definitions.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{
    add_student, health, load_and_update_students, metrics, search_course, search_student,
    sort_courses, AppState,
};
use crate::metrics::track_http_latency;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Roster endpoints
        .route("/loadAndUpdateStudents", get(load_and_update_students))
        .route("/addStudent", post(add_student))
        .route("/sortCourses", get(sort_courses))
        .route("/searchCourse/:id", get(search_course))
        .route("/searchStudent", get(search_student))
        // Operational endpoints
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route_layer(middleware::from_fn(track_http_latency))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::response::MessageResponse;
    use crate::catalog::Course;
    use crate::config::DuplicateIdPolicy;
    use crate::storage::MockPersistence;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use pretty_assertions::assert_eq;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    fn app(mock: &MockPersistence) -> Router {
        create_router(AppState::new(Arc::new(mock.clone()), DuplicateIdPolicy::Allow))
    }

    async fn get(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_json(app: &Router, uri: &str, body: &str) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let response = get(&app(&MockPersistence::new()), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_endpoint_404_without_exporter() {
        let response = get(&app(&MockPersistence::new()), "/metrics").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn add_student_with_empty_courses_is_400() {
        let mock = MockPersistence::new();
        let app = app(&mock);

        let response = post_json(&app, "/addStudent", r#"{"id":1,"name":"Ann","courses":[]}"#).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: MessageResponse = json(response).await;
        assert_eq!(body.message, "Missing required student data (id, name, courses)");
        assert!(mock.appends().is_empty());
    }

    #[tokio::test]
    async fn add_student_with_wrong_types_is_400() {
        let app = app(&MockPersistence::new());

        let response = post_json(&app, "/addStudent", r#"{"id":"one","name":"Ann","courses":["Math 101"]}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = post_json(&app, "/addStudent", "not json").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn add_student_then_sort_and_search() {
        let mock = MockPersistence::new();
        let app = app(&mock);

        let response = post_json(
            &app,
            "/addStudent",
            r#"{"id":7,"name":"Matthew","courses":["Physics 101"]}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: MessageResponse = json(response).await;
        assert_eq!(body.message, "Student added successfully!");

        let sorted: Vec<Course> = json(get(&app, "/sortCourses").await).await;
        assert_eq!(sorted[0].name, "Physics 101");
        assert_eq!(sorted[0].popularity, 1);

        let response = get(&app, "/searchStudent?name=mat").await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get(&app, "/searchStudent?name=pat").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn add_student_append_failure_is_500_but_stored() {
        let mock = MockPersistence::new();
        mock.set_fail_append(true);
        let app = app(&mock);

        let response = post_json(&app, "/addStudent", r#"{"id":3,"name":"Ann","courses":["Math 101"]}"#).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: MessageResponse = json(response).await;
        assert_eq!(body.message, "Internal server error");

        let response = get(&app, "/searchStudent?id=3").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn search_course_found_and_not_found() {
        let app = app(&MockPersistence::new());

        let response = get(&app, "/searchCourse/2").await;
        assert_eq!(response.status(), StatusCode::OK);
        let course: Course = json(response).await;
        assert_eq!(course, Course::new(2, "History 101"));

        assert_eq!(get(&app, "/searchCourse/99").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(get(&app, "/searchCourse/abc").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_student_without_params_is_400() {
        let app = app(&MockPersistence::new());

        assert_eq!(get(&app, "/searchStudent").await.status(), StatusCode::BAD_REQUEST);
        assert_eq!(get(&app, "/searchStudent?id=&name=").await.status(), StatusCode::BAD_REQUEST);
        assert_eq!(get(&app, "/searchStudent?id=abc").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn load_without_pending_source_is_benign() {
        let mock = MockPersistence::new();
        let app = app(&mock);

        let response = get(&app, "/loadAndUpdateStudents").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: MessageResponse = json(response).await;
        assert_eq!(body.message, "No pending import file found. Nothing to import.");

        let sorted: Vec<Course> = json(get(&app, "/sortCourses").await).await;
        assert!(sorted.iter().all(|c| c.popularity == 0));
    }

    #[tokio::test]
    async fn load_with_malformed_line_is_500() {
        let mock = MockPersistence::with_pending("{\"id\":1}\n");
        let app = app(&mock);

        let response = get(&app, "/loadAndUpdateStudents").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: MessageResponse = json(response).await;
        assert_eq!(body.message, "Failed to load and update students from file.");
    }

    #[tokio::test]
    async fn load_imports_pending_records() {
        let mock = MockPersistence::with_pending(
            "{\"id\":1,\"name\":\"Ann\",\"courses\":[\"History 101\"]}\n\n",
        );
        let app = app(&mock);

        let response = get(&app, "/loadAndUpdateStudents").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: MessageResponse = json(response).await;
        assert_eq!(
            body.message,
            "Students loaded from mock-insert.txt and updated in mock-students.txt successfully!"
        );

        let course: Course = json(get(&app, "/searchCourse/2").await).await;
        assert_eq!(course.popularity, 1);
    }
}
