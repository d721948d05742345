//! Route-level tests against an in-memory database.

use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use roster_db::service::{RosterService, ServiceOptions};
use roster_server::{AppState, create_router};
use serde_json::{Value, json};

async fn server() -> TestServer {
    let service = RosterService::new_local(
        ":memory:",
        Duration::from_millis(100),
        ServiceOptions::default(),
    )
    .await
    .unwrap();
    TestServer::new(create_router(AppState::new(service, true))).unwrap()
}

async fn post_id(server: &TestServer, path: &str, body: Value) -> i64 {
    let res = server.post(path).json(&body).await;
    res.assert_status(StatusCode::CREATED);
    res.json::<Value>()["id"].as_i64().unwrap()
}

/// Department, two courses (`CS201` requires `CS101`), one student.
async fn seeded(server: &TestServer) -> (i64, i64, i64, i64) {
    let d = post_id(server, "/api/admin/departments", json!({"name": "CS"})).await;
    let intro = post_id(
        server,
        "/api/admin/courses",
        json!({"course_code": "CS101", "name": "Intro", "department_id": d, "max_students": 1}),
    )
    .await;
    let next = post_id(
        server,
        "/api/admin/courses",
        json!({"course_code": "CS201", "name": "Next", "department_id": d, "max_students": 5}),
    )
    .await;
    server
        .post("/api/admin/prerequisites")
        .json(&json!({"course_id": next, "prerequisite_id": intro}))
        .await
        .assert_status_ok();
    let s = post_id(
        server,
        "/api/admin/students",
        json!({"student_id": "S1", "name": "Amal", "department_id": d, "registration_number": "R1"}),
    )
    .await;
    (d, intro, next, s)
}

#[tokio::test]
async fn health_reports_database() {
    let server = server().await;
    let res = server.get("/health").await;
    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database_connected"], true);
}

#[tokio::test]
async fn max_courses_limit_is_not_cached() {
    let server = server().await;
    let res = server.get("/api/max-courses-limit").await;
    res.assert_status_ok();
    assert_eq!(res.json::<Value>()["max_courses_limit"], 6);
    let cache = res.header("cache-control");
    assert!(cache.to_str().unwrap().contains("no-store"));
}

#[tokio::test]
async fn enroll_flow_and_status_codes() {
    let server = server().await;
    let (_, intro, next, s) = seeded(&server).await;

    let res = server
        .post(&format!("/api/students/{s}/enroll"))
        .json(&json!({"course_id": next}))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["allowed"], false);
    assert_eq!(body["reason"], "prerequisites_not_met");

    let res = server
        .post(&format!("/api/students/{s}/enroll"))
        .json(&json!({"course_id": intro}))
        .await;
    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["allowed"], true);
    assert_eq!(body["reason"], Value::Null);
    assert_eq!(body["enrollment_count"], 1);

    let res = server
        .post(&format!("/api/students/{s}/enroll"))
        .json(&json!({"course_id": intro}))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["reason"], "already_enrolled");

    let count: Value = server
        .get(&format!("/api/students/{s}/enrollment-count"))
        .await
        .json();
    assert_eq!(count, json!({"enrollment_count": 1, "max_courses_limit": 6}));
}

#[tokio::test]
async fn closed_registration_is_forbidden() {
    let server = server().await;
    let (_, intro, _, s) = seeded(&server).await;
    server
        .post("/api/admin/registration-status")
        .json(&json!({"is_open": false}))
        .await
        .assert_status_ok();

    let status: Value = server.get("/api/registration-status").await.json();
    assert_eq!(status["registration_open"], false);

    let res = server
        .post(&format!("/api/students/{s}/enroll"))
        .json(&json!({"course_id": intro}))
        .await;
    res.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(res.json::<Value>()["reason"], "registration_closed");
}

#[tokio::test]
async fn unenroll_without_enrollment_is_bad_request() {
    let server = server().await;
    let (_, intro, _, s) = seeded(&server).await;
    let res = server
        .post(&format!("/api/students/{s}/unenroll"))
        .json(&json!({"course_id": intro}))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["reason"], "not_enrolled");
}

#[tokio::test]
async fn unknown_student_is_not_found() {
    let server = server().await;
    let res = server.get("/api/students/999/info").await;
    res.assert_status(StatusCode::NOT_FOUND);
    let body: Value = res.json();
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn malformed_requests_are_bad_request() {
    let server = server().await;
    let res = server.get("/api/students/abc/info").await;
    res.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["code"], "BAD_REQUEST");

    let res = server
        .post("/api/students/1/enroll")
        .json(&json!({"course": 1}))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);

    let res = server
        .post("/api/admin/max-courses-limit")
        .json(&json!({"max_courses_limit": 0}))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_department_conflicts() {
    let server = server().await;
    post_id(&server, "/api/admin/departments", json!({"name": "CS"})).await;
    let res = server
        .post("/api/admin/departments")
        .json(&json!({"name": "CS"}))
        .await;
    res.assert_status(StatusCode::CONFLICT);
    assert_eq!(res.json::<Value>()["code"], "CONFLICT");
}

#[tokio::test]
async fn reverse_prerequisite_is_direct_cycle() {
    let server = server().await;
    let (_, intro, next, _) = seeded(&server).await;
    let res = server
        .post("/api/admin/prerequisites")
        .json(&json!({"course_id": intro, "prerequisite_id": next}))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["reason"], "direct_cycle");

    let details: Value = server
        .get(&format!("/api/admin/courses/{next}/prerequisites"))
        .await
        .json();
    assert_eq!(details["prerequisites"][0]["course_code"], "CS101");
}

#[tokio::test]
async fn student_delete_requires_force_with_ledger_rows() {
    let server = server().await;
    let (_, intro, _, s) = seeded(&server).await;
    server
        .post(&format!("/api/students/{s}/enroll"))
        .json(&json!({"course_id": intro}))
        .await
        .assert_status_ok();

    server
        .delete(&format!("/api/admin/students/{s}"))
        .await
        .assert_status(StatusCode::CONFLICT);

    let res = server
        .delete(&format!("/api/admin/students/{s}"))
        .add_query_param("force", "true")
        .await;
    res.assert_status_ok();
    assert_eq!(res.json::<Value>()["cascaded"], 1);
}

#[tokio::test]
async fn completion_resets_and_statistics() {
    let server = server().await;
    let (_, intro, next, s) = seeded(&server).await;
    server
        .post("/api/admin/completed-courses")
        .json(&json!({"student_id": s, "course_id": intro}))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post(&format!("/api/students/{s}/enroll"))
        .json(&json!({"course_id": next}))
        .await
        .assert_status_ok();

    let available: Value = server
        .get(&format!("/api/students/{s}/available-courses"))
        .await
        .json();
    assert_eq!(available["courses"][0]["is_completed"], true);
    assert_eq!(available["courses"][1]["is_enrolled"], true);

    let stats: Value = server.get("/api/admin/course-statistics").await.json();
    assert_eq!(stats[0]["completed_count"], 1);
    assert_eq!(stats[1]["enrolled_count"], 1);
    assert_eq!(stats[1]["enrollment_percentage"], 20.0);

    let reset: Value = server
        .post("/api/admin/reset-student-enrollments")
        .json(&json!({"registration_number": "R1"}))
        .await
        .json();
    assert_eq!(reset["removed"], 1);

    let history: Value = server
        .get(&format!("/api/admin/students/{s}/courses"))
        .await
        .json();
    assert_eq!(history["completed"].as_array().unwrap().len(), 1);
    assert!(history["enrolled"].as_array().unwrap().is_empty());
}
