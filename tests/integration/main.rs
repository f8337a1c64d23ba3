//! End-to-end tests for the roster service.
//!
//! These drive the full router over real files in a temporary directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use futures::future::join_all;
use pretty_assertions::assert_eq;
use serde::de::DeserializeOwned;
use tempfile::TempDir;
use tower::ServiceExt;

use course_roster::api::{create_router, AppState, MessageResponse};
use course_roster::catalog::Course;
use course_roster::config::DuplicateIdPolicy;
use course_roster::registry::Student;
use course_roster::storage::FilePersistence;

struct Fixture {
    _dir: TempDir,
    pending: PathBuf,
    log: PathBuf,
    app: Router,
}

impl Fixture {
    fn new(policy: DuplicateIdPolicy) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let pending = dir.path().join("insert.txt");
        let log = dir.path().join("students.txt");
        let persistence = Arc::new(FilePersistence::new(&pending, &log));
        let app = create_router(AppState::new(persistence, policy));

        Self {
            _dir: dir,
            pending,
            log,
            app,
        }
    }

    async fn get(&self, uri: &str) -> Response {
        self.app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn add_student(&self, body: &str) -> Response {
        self.app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/addStudent")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn courses(&self) -> Vec<Course> {
        json(self.get("/sortCourses").await).await
    }
}

async fn json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

fn popularity(courses: &[Course], name: &str) -> u64 {
    courses
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.popularity)
        .unwrap_or_default()
}

#[tokio::test]
async fn import_then_query() {
    let fx = Fixture::new(DuplicateIdPolicy::Allow);
    std::fs::write(
        &fx.pending,
        concat!(
            "{\"id\":1,\"name\":\"Matthew\",\"courses\":[\"Math 101\",\"Physics 101\"]}\n",
            "\n",
            "{\"id\":2,\"name\":\"Pat\",\"courses\":[\"Physics 101\",\"Art 101\"]}\n",
        ),
    )
    .unwrap();

    let response = fx.get("/loadAndUpdateStudents").await;
    assert_eq!(response.status(), StatusCode::OK);

    let courses = fx.courses().await;
    let names: Vec<_> = courses.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Physics 101", "Math 101", "History 101"]);
    assert_eq!(popularity(&courses, "Physics 101"), 2);

    let found: Vec<Student> = json(fx.get("/searchStudent?name=MAT").await).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Matthew");

    let found: Vec<Student> = json(fx.get("/searchStudent?id=2&name=matt").await).await;
    let ids: Vec<_> = found.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2]);

    assert_eq!(
        read(&fx.log),
        concat!(
            "{\"id\":1,\"name\":\"Matthew\",\"courses\":[\"Math 101\",\"Physics 101\"]}\n",
            "{\"id\":2,\"name\":\"Pat\",\"courses\":[\"Physics 101\",\"Art 101\"]}\n",
        )
    );
    // pending source is never consumed
    assert!(fx.pending.exists());
}

#[tokio::test]
async fn import_without_pending_file_changes_nothing() {
    let fx = Fixture::new(DuplicateIdPolicy::Allow);

    let response = fx.get("/loadAndUpdateStudents").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageResponse = json(response).await;
    assert_eq!(body.message, "No pending import file found. Nothing to import.");

    assert!(fx.courses().await.iter().all(|c| c.popularity == 0));
    assert_eq!(fx.get("/searchStudent?name=a").await.status(), StatusCode::NOT_FOUND);
    assert!(!fx.log.exists());
}

#[tokio::test]
async fn malformed_import_is_500_and_changes_nothing() {
    let fx = Fixture::new(DuplicateIdPolicy::Allow);
    std::fs::write(
        &fx.pending,
        "{\"id\":1,\"name\":\"Ann\",\"courses\":[\"Math 101\"]}\n{broken\n",
    )
    .unwrap();

    let response = fx.get("/loadAndUpdateStudents").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(popularity(&fx.courses().await, "Math 101"), 0);
    assert_eq!(fx.get("/searchStudent?id=1").await.status(), StatusCode::NOT_FOUND);
    assert!(!fx.log.exists());
}

#[tokio::test]
async fn add_student_appends_one_line() {
    let fx = Fixture::new(DuplicateIdPolicy::Allow);

    let response = fx
        .add_student(r#"{"id":9,"name":"Ann","courses":["History 101"],"extra":true}"#)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(read(&fx.log), "{\"id\":9,\"name\":\"Ann\",\"courses\":[\"History 101\"]}\n");

    let course: Course = json(fx.get("/searchCourse/2").await).await;
    assert_eq!(course.popularity, 1);
}

#[tokio::test]
async fn invalid_student_is_400_and_not_logged() {
    let fx = Fixture::new(DuplicateIdPolicy::Allow);

    let response = fx.add_student(r#"{"id":1,"name":"Ann","courses":[]}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = fx.add_student(r#"{"name":"Ann","courses":["Math 101"]}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(!fx.log.exists());
    assert_eq!(popularity(&fx.courses().await, "Math 101"), 0);
}

#[tokio::test]
async fn reject_policy_returns_400_for_duplicate_id() {
    let fx = Fixture::new(DuplicateIdPolicy::Reject);

    let first = fx.add_student(r#"{"id":1,"name":"Ann","courses":["Math 101"]}"#).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = fx.add_student(r#"{"id":1,"name":"Bo","courses":["Math 101"]}"#).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = json(second).await;
    assert_eq!(body.message, "Student with id 1 already exists");

    assert_eq!(popularity(&fx.courses().await, "Math 101"), 1);
    assert_eq!(read(&fx.log).lines().count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_serialize_popularity() {
    const N: usize = 32;
    let fx = Fixture::new(DuplicateIdPolicy::Allow);
    let before = popularity(&fx.courses().await, "Math 101");

    let requests = (1..=N).map(|id| {
        let body = format!(r#"{{"id":{id},"name":"student {id}","courses":["Math 101"]}}"#);
        let app = fx.app.clone();
        tokio::spawn(async move {
            app.oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/addStudent")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
        })
    });

    for status in join_all(requests).await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }

    assert_eq!(popularity(&fx.courses().await, "Math 101"), before + N as u64);

    let log = read(&fx.log);
    assert_eq!(log.lines().count(), N);
    assert!(log
        .lines()
        .all(|line| serde_json::from_str::<Student>(line).is_ok()));
}
