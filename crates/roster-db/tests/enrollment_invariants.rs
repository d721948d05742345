//! Capacity and max-courses invariants under concurrent enroll attempts.
//!
//! Tasks share one `RosterService` (write gate + IMMEDIATE transactions), and
//! a second service on the same file stands in for another process.

use std::sync::Arc;
use std::time::Duration;

use roster_core::entities::Policy;
use roster_core::enums::DenyReason;
use roster_db::repos::course::NewCourse;
use roster_db::repos::student::NewStudent;
use roster_db::service::{RosterService, ServiceOptions};

const BUSY: Duration = Duration::from_secs(10);

async fn file_service(dir: &tempfile::TempDir, options: ServiceOptions) -> RosterService {
    let path = dir.path().join("roster.db");
    RosterService::new_local(path.to_str().unwrap(), BUSY, options)
        .await
        .unwrap()
}

async fn course(svc: &RosterService, department_id: i64, code: &str, max_students: u32) -> i64 {
    svc.create_course(&NewCourse {
        course_code: code.into(),
        name: code.into(),
        department_id,
        max_students,
        semester: None,
    })
    .await
    .unwrap()
    .id
}

async fn student(svc: &RosterService, department_id: i64, n: usize) -> i64 {
    svc.create_student(&NewStudent {
        student_id: format!("S{n:03}"),
        name: format!("Student {n}"),
        department_id,
        registration_number: format!("R{n:03}"),
        semester: None,
    })
    .await
    .unwrap()
    .id
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_enrolls_never_exceed_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let svc = Arc::new(file_service(&dir, ServiceOptions::default()).await);
    let d = svc.create_department("CS").await.unwrap().id;
    let c = course(&svc, d, "CS101", 3).await;

    let mut students = Vec::new();
    for n in 0..12 {
        students.push(student(&svc, d, n).await);
    }

    let mut handles = Vec::new();
    for s in students {
        let svc = Arc::clone(&svc);
        handles.push(tokio::spawn(async move { svc.enroll(s, c).await }));
    }

    let mut allowed = 0;
    let mut full = 0;
    for h in handles {
        let out = h.await.unwrap().unwrap();
        if out.allowed {
            allowed += 1;
        } else {
            assert_eq!(out.reason, Some(DenyReason::CourseFull));
            full += 1;
        }
    }
    assert_eq!(allowed, 3);
    assert_eq!(full, 9);
    assert_eq!(svc.course_enrollment_count(c).await.unwrap(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_enrolls_never_exceed_student_limit() {
    let dir = tempfile::tempdir().unwrap();
    let options = ServiceOptions {
        seed_policy: Policy {
            registration_open: true,
            max_courses_limit: 2,
        },
        ..ServiceOptions::default()
    };
    let svc = Arc::new(file_service(&dir, options).await);
    let d = svc.create_department("CS").await.unwrap().id;
    let s = student(&svc, d, 1).await;

    let mut courses = Vec::new();
    for n in 0..8 {
        courses.push(course(&svc, d, &format!("CS{n}"), 10).await);
    }

    let mut handles = Vec::new();
    for c in courses {
        let svc = Arc::clone(&svc);
        handles.push(tokio::spawn(async move { svc.enroll(s, c).await }));
    }
    let mut allowed = 0;
    for h in handles {
        let out = h.await.unwrap().unwrap();
        if out.allowed {
            allowed += 1;
        } else {
            assert_eq!(out.reason, Some(DenyReason::MaxCoursesReached));
        }
    }
    assert_eq!(allowed, 2);
    assert_eq!(svc.student_enrollments(s).await.unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn duplicate_concurrent_enrolls_insert_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let svc = Arc::new(file_service(&dir, ServiceOptions::default()).await);
    let d = svc.create_department("CS").await.unwrap().id;
    let c = course(&svc, d, "CS101", 30).await;
    let s = student(&svc, d, 1).await;

    let mut handles = Vec::new();
    for _ in 0..6 {
        let svc = Arc::clone(&svc);
        handles.push(tokio::spawn(async move { svc.enroll(s, c).await }));
    }
    let mut reasons = Vec::new();
    for h in handles {
        reasons.push(h.await.unwrap().unwrap().reason);
    }
    assert_eq!(reasons.iter().filter(|r| r.is_none()).count(), 1);
    assert!(
        reasons
            .iter()
            .flatten()
            .all(|r| *r == DenyReason::AlreadyEnrolled)
    );
    assert_eq!(svc.course_enrollment_count(c).await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_services_on_one_file_share_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let first = Arc::new(file_service(&dir, ServiceOptions::default()).await);
    let d = first.create_department("CS").await.unwrap().id;
    let c = course(&first, d, "CS101", 4).await;
    let mut students = Vec::new();
    for n in 0..10 {
        students.push(student(&first, d, n).await);
    }
    let second = Arc::new(file_service(&dir, ServiceOptions::default()).await);

    let mut handles = Vec::new();
    for (i, s) in students.into_iter().enumerate() {
        let svc = if i % 2 == 0 {
            Arc::clone(&first)
        } else {
            Arc::clone(&second)
        };
        handles.push(tokio::spawn(async move { svc.enroll(s, c).await }));
    }
    let mut allowed = 0;
    for h in handles {
        if h.await.unwrap().unwrap().allowed {
            allowed += 1;
        }
    }
    assert_eq!(allowed, 4);
    assert_eq!(second.course_enrollment_count(c).await.unwrap(), 4);
}
