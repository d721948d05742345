//! Per-course enrollment statistics.

use roster_core::responses::{CourseStatistics, enrollment_percentage};

use crate::error::DatabaseError;
use crate::helpers::get_u32;
use crate::service::RosterService;

impl RosterService {
    /// One row per course, ordered by course code.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn course_statistics(&self) -> Result<Vec<CourseStatistics>, DatabaseError> {
        let read = self.begin_read().await;
        let mut rows = read
            .query(
                "SELECT c.id, c.course_code, c.name, d.name, c.max_students,
                        (SELECT COUNT(*) FROM enrollments e WHERE e.course_id = c.id),
                        (SELECT COUNT(*) FROM completed_courses cc WHERE cc.course_id = c.id)
                 FROM courses c JOIN departments d ON d.id = c.department_id
                 ORDER BY c.course_code",
                (),
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            let max_students = get_u32(&row, 4)?;
            let enrolled_count = get_u32(&row, 5)?;
            out.push(CourseStatistics {
                course_id: row.get(0)?,
                course_code: row.get(1)?,
                name: row.get(2)?,
                department_name: row.get(3)?,
                max_students,
                enrolled_count,
                completed_count: get_u32(&row, 6)?,
                enrollment_percentage: enrollment_percentage(enrolled_count, max_students),
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::{seed_course, seed_department, seed_student, test_service};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn statistics_count_enrolled_and_completed() {
        let svc = test_service().await;
        let d = seed_department(&svc, "CS").await;
        let a = seed_course(&svc, d, "CS101", 3).await;
        let b = seed_course(&svc, d, "CS201", 4).await;
        let s1 = seed_student(&svc, d, "1").await;
        let s2 = seed_student(&svc, d, "2").await;
        svc.enroll(s1, a).await.unwrap();
        svc.record_completion(s2, a).await.unwrap();
        svc.enroll(s2, b).await.unwrap();

        let stats = svc.course_statistics().await.unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].course_code, "CS101");
        assert_eq!(stats[0].department_name, "CS");
        assert_eq!(stats[0].enrolled_count, 1);
        assert_eq!(stats[0].completed_count, 1);
        assert!((stats[0].enrollment_percentage - 33.33).abs() < f64::EPSILON);
        assert!((stats[1].enrollment_percentage - 25.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn empty_catalog_has_no_rows() {
        let svc = test_service().await;
        assert!(svc.course_statistics().await.unwrap().is_empty());
    }
}
