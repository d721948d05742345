//! End-to-end registration scenarios against an in-memory database.

use std::collections::BTreeSet;
use std::time::Duration;

use pretty_assertions::assert_eq;
use roster_core::entities::Policy;
use roster_core::enums::{AuditAction, DenyReason, EntityType};
use roster_db::error::DatabaseError;
use roster_db::repos::audit::AuditFilter;
use roster_db::repos::course::NewCourse;
use roster_db::repos::student::NewStudent;
use roster_db::service::{RosterService, ServiceOptions};
use rstest::rstest;

async fn service(options: ServiceOptions) -> RosterService {
    RosterService::new_local(":memory:", Duration::from_millis(100), options)
        .await
        .unwrap()
}

async fn course(svc: &RosterService, department_id: i64, code: &str, max_students: u32) -> i64 {
    svc.create_course(&NewCourse {
        course_code: code.into(),
        name: format!("Course {code}"),
        department_id,
        max_students,
        semester: None,
    })
    .await
    .unwrap()
    .id
}

async fn student(svc: &RosterService, department_id: i64, tag: &str) -> i64 {
    svc.create_student(&NewStudent {
        student_id: format!("S-{tag}"),
        name: format!("Student {tag}"),
        department_id,
        registration_number: format!("R-{tag}"),
        semester: Some("second".into()),
    })
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn empty_course_allows_and_counts_one() {
    let svc = service(ServiceOptions::default()).await;
    let d = svc.create_department("CS").await.unwrap().id;
    let c = course(&svc, d, "CS101", 2).await;
    let s = student(&svc, d, "1").await;

    let out = svc.enroll(s, c).await.unwrap();
    assert!(out.allowed);
    assert_eq!(svc.course_enrollment_count(c).await.unwrap(), 1);
    assert_eq!(svc.course_capacity(c).await.unwrap(), 2);
}

#[tokio::test]
async fn missing_prerequisite_is_denied_until_completed() {
    let svc = service(ServiceOptions::default()).await;
    let d = svc.create_department("CS").await.unwrap().id;
    let p = course(&svc, d, "CS101", 10).await;
    let c = course(&svc, d, "CS201", 10).await;
    assert!(svc.add_prerequisite(c, p).await.unwrap().allowed);
    assert_eq!(svc.course_prerequisites(c).await.unwrap(), BTreeSet::from([p]));
    let s = student(&svc, d, "1").await;

    assert_eq!(
        svc.enroll(s, c).await.unwrap().reason,
        Some(DenyReason::PrerequisitesNotMet)
    );
    svc.record_completion(s, p).await.unwrap();
    assert!(svc.enroll(s, c).await.unwrap().allowed);
}

#[tokio::test]
async fn limit_two_blocks_third_course() {
    let svc = service(ServiceOptions {
        seed_policy: Policy {
            registration_open: true,
            max_courses_limit: 2,
        },
        ..ServiceOptions::default()
    })
    .await;
    let d = svc.create_department("CS").await.unwrap().id;
    let s = student(&svc, d, "1").await;
    let a = course(&svc, d, "A", 5).await;
    let b = course(&svc, d, "B", 5).await;
    let c = course(&svc, d, "C", 5).await;

    assert!(svc.enroll(s, a).await.unwrap().allowed);
    assert!(svc.enroll(s, b).await.unwrap().allowed);
    let third = svc.enroll(s, c).await.unwrap();
    assert_eq!(third.reason, Some(DenyReason::MaxCoursesReached));
    assert_eq!(third.enrollment_count, 2);
}

#[tokio::test]
async fn full_course_is_denied() {
    let svc = service(ServiceOptions::default()).await;
    let d = svc.create_department("CS").await.unwrap().id;
    let c = course(&svc, d, "CS101", 1).await;
    let first = student(&svc, d, "1").await;
    let second = student(&svc, d, "2").await;

    assert!(svc.enroll(first, c).await.unwrap().allowed);
    assert_eq!(
        svc.enroll(second, c).await.unwrap().reason,
        Some(DenyReason::CourseFull)
    );
}

#[tokio::test]
async fn limit_cannot_drop_below_a_students_enrollments() {
    let svc = service(ServiceOptions::default()).await;
    let d = svc.create_department("CS").await.unwrap().id;
    let s = student(&svc, d, "1").await;
    let a = course(&svc, d, "A", 5).await;
    let b = course(&svc, d, "B", 5).await;
    let c = course(&svc, d, "C", 5).await;
    svc.enroll(s, a).await.unwrap();
    svc.enroll(s, b).await.unwrap();

    assert!(matches!(
        svc.set_max_courses_limit(1).await,
        Err(DatabaseError::Conflict(_))
    ));
    svc.set_max_courses_limit(2).await.unwrap();
    assert_eq!(svc.student_enrollments(s).await.unwrap().len(), 2);
    assert_eq!(
        svc.enroll(s, c).await.unwrap().reason,
        Some(DenyReason::MaxCoursesReached)
    );
}

#[rstest]
#[case::pairwise(false, true)]
#[case::strict(true, false)]
#[tokio::test]
async fn three_cycle_depends_on_mode(#[case] strict: bool, #[case] accepted: bool) {
    let svc = service(ServiceOptions {
        strict_cycle_check: strict,
        ..ServiceOptions::default()
    })
    .await;
    let d = svc.create_department("CS").await.unwrap().id;
    let a = course(&svc, d, "A", 5).await;
    let b = course(&svc, d, "B", 5).await;
    let c = course(&svc, d, "C", 5).await;

    assert!(svc.add_prerequisite(a, b).await.unwrap().allowed);
    assert!(svc.add_prerequisite(c, a).await.unwrap().allowed);
    let closing = svc.add_prerequisite(b, c).await.unwrap();
    assert_eq!(closing.allowed, accepted);
    if !accepted {
        assert_eq!(closing.reason, Some(DenyReason::TransitiveCycle));
    }

    let reverse = svc.add_prerequisite(b, a).await.unwrap();
    assert_eq!(reverse.reason, Some(DenyReason::DirectCycle));
}

#[tokio::test]
async fn mutations_leave_an_audit_trail() {
    let svc = service(ServiceOptions::default()).await;
    let d = svc.create_department("CS").await.unwrap().id;
    let c = course(&svc, d, "CS101", 5).await;
    let s = student(&svc, d, "1").await;
    svc.enroll(s, c).await.unwrap();
    svc.unenroll(s, c).await.unwrap();
    svc.set_registration_open(false).await.unwrap();

    let enrollments = svc
        .query_audit(&AuditFilter {
            entity_type: Some(EntityType::Enrollment),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    let actions: Vec<_> = enrollments.iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![AuditAction::Unenrolled, AuditAction::Enrolled]);

    let policy = svc
        .query_audit(&AuditFilter {
            action: Some(AuditAction::PolicyChanged),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(policy.len(), 1);
    assert_eq!(policy[0].detail.as_ref().unwrap()["to"], "false");
}

#[tokio::test]
async fn policy_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.db");
    let path = path.to_str().unwrap();
    {
        let svc = RosterService::new_local(path, Duration::from_secs(1), ServiceOptions::default())
            .await
            .unwrap();
        svc.set_max_courses_limit(3).await.unwrap();
        svc.set_registration_open(false).await.unwrap();
    }
    // The seed only fills missing keys; stored values win.
    let svc = RosterService::new_local(path, Duration::from_secs(1), ServiceOptions::default())
        .await
        .unwrap();
    let policy = svc.get_policy().await.unwrap();
    assert_eq!(
        policy,
        Policy {
            registration_open: false,
            max_courses_limit: 3,
        }
    );
}
