//! Shared test utilities for roster-db unit tests.

pub(crate) mod helpers {
    use std::time::Duration;

    use roster_core::ids::{CourseId, DepartmentId, StudentId};

    use crate::RosterDb;
    use crate::repos::course::NewCourse;
    use crate::repos::student::NewStudent;
    use crate::service::{RosterService, ServiceOptions};

    /// In-memory service with default options.
    pub async fn test_service() -> RosterService {
        test_service_with(ServiceOptions::default()).await
    }

    /// In-memory service with explicit options.
    pub async fn test_service_with(options: ServiceOptions) -> RosterService {
        let db = RosterDb::open_local(":memory:", Duration::from_millis(100))
            .await
            .unwrap();
        RosterService::from_db(db, options).await.unwrap()
    }

    pub async fn seed_department(svc: &RosterService, name: &str) -> DepartmentId {
        svc.create_department(name).await.unwrap().id
    }

    pub async fn seed_course(
        svc: &RosterService,
        department_id: DepartmentId,
        code: &str,
        max_students: u32,
    ) -> CourseId {
        svc.create_course(&NewCourse {
            course_code: code.to_string(),
            name: format!("Course {code}"),
            department_id,
            max_students,
            semester: None,
        })
        .await
        .unwrap()
        .id
    }

    /// Student whose `student_id` and registration number derive from `tag`.
    pub async fn seed_student(
        svc: &RosterService,
        department_id: DepartmentId,
        tag: &str,
    ) -> StudentId {
        svc.create_student(&NewStudent {
            student_id: format!("SID-{tag}"),
            name: format!("Student {tag}"),
            department_id,
            registration_number: format!("REG-{tag}"),
            semester: None,
        })
        .await
        .unwrap()
        .id
    }
}
