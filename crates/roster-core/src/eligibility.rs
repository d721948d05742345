//! Enrollment eligibility engine.
//!
//! Pure functions over a snapshot of one student's standing, one course's
//! seats, the prerequisite edges, and the global [`Policy`]. The storage layer
//! gathers the snapshot inside a write-serialized transaction, calls
//! [`decide_enroll`] or [`decide_unenroll`], and performs the ledger mutation
//! only on [`Decision::Allow`].
//!
//! Enroll checks run in a fixed order and the first failure wins:
//!
//! 1. registration open
//! 2. not already completed
//! 3. not already enrolled
//! 4. every prerequisite completed
//! 5. seats left in the course
//! 6. student below the max-courses limit (strict `<`)

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Policy, PrerequisiteEdge};
use crate::enums::DenyReason;
use crate::ids::CourseId;
use crate::responses::EnrollDecision;

/// Outcome of an eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    #[must_use]
    pub const fn reason(self) -> Option<DenyReason> {
        match self {
            Self::Allow => None,
            Self::Deny(reason) => Some(reason),
        }
    }
}

impl From<Decision> for EnrollDecision {
    fn from(decision: Decision) -> Self {
        Self {
            allowed: decision.is_allowed(),
            reason: decision.reason(),
        }
    }
}

/// A student's ledger at decision time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StudentStanding {
    /// Courses with an active enrollment.
    pub enrolled: BTreeSet<CourseId>,
    pub completed: BTreeSet<CourseId>,
}

impl StudentStanding {
    #[must_use]
    pub const fn new(enrolled: BTreeSet<CourseId>, completed: BTreeSet<CourseId>) -> Self {
        Self {
            enrolled,
            completed,
        }
    }

    /// Number of active enrollments, counted from the set itself.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.enrolled.len()
    }
}

/// Capacity of one course and how many seats are taken across all students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CourseSeats {
    pub max_students: u32,
    pub enrolled_count: u32,
}

impl CourseSeats {
    #[must_use]
    pub const fn is_full(self) -> bool {
        self.enrolled_count >= self.max_students
    }
}

/// Prerequisites of `course_id` according to `edges`.
pub fn required_prerequisites<'a, I>(course_id: CourseId, edges: I) -> BTreeSet<CourseId>
where
    I: IntoIterator<Item = &'a PrerequisiteEdge>,
{
    edges
        .into_iter()
        .filter(|e| e.course_id == course_id)
        .map(|e| e.prerequisite_id)
        .collect()
}

/// Prerequisites of `course_id` the student has not completed yet.
pub fn missing_prerequisites<'a, I>(
    course_id: CourseId,
    standing: &StudentStanding,
    edges: I,
) -> BTreeSet<CourseId>
where
    I: IntoIterator<Item = &'a PrerequisiteEdge>,
{
    required_prerequisites(course_id, edges)
        .into_iter()
        .filter(|p| !standing.completed.contains(p))
        .collect()
}

/// Decide whether the student may enroll in `course_id`.
pub fn decide_enroll<'a, I>(
    course_id: CourseId,
    policy: &Policy,
    standing: &StudentStanding,
    seats: CourseSeats,
    edges: I,
) -> Decision
where
    I: IntoIterator<Item = &'a PrerequisiteEdge>,
{
    if !policy.registration_open {
        return Decision::Deny(DenyReason::RegistrationClosed);
    }
    if standing.completed.contains(&course_id) {
        return Decision::Deny(DenyReason::AlreadyCompleted);
    }
    if standing.enrolled.contains(&course_id) {
        return Decision::Deny(DenyReason::AlreadyEnrolled);
    }
    if !missing_prerequisites(course_id, standing, edges).is_empty() {
        return Decision::Deny(DenyReason::PrerequisitesNotMet);
    }
    if seats.is_full() {
        return Decision::Deny(DenyReason::CourseFull);
    }
    let limit = usize::try_from(policy.max_courses_limit).unwrap_or(usize::MAX);
    if standing.active_count() >= limit {
        return Decision::Deny(DenyReason::MaxCoursesReached);
    }
    Decision::Allow
}

/// Decide whether the student may drop `course_id`.
///
/// Registration being closed does not matter here.
#[must_use]
pub fn decide_unenroll(course_id: CourseId, standing: &StudentStanding) -> Decision {
    if standing.enrolled.contains(&course_id) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::NotEnrolled)
    }
}

/// Per-course availability flags shown to a student browsing the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Availability {
    pub is_completed: bool,
    pub is_enrolled: bool,
    pub prerequisites: Vec<CourseId>,
    pub all_prerequisites_met: bool,
    pub is_full: bool,
    pub can_register: bool,
}

/// Availability of `course_id` for a student.
///
/// `can_register` ignores the registration-open flag and the max-courses
/// limit: those are global to the student and reported separately.
pub fn assess_course<'a, I>(
    course_id: CourseId,
    standing: &StudentStanding,
    seats: CourseSeats,
    edges: I,
) -> Availability
where
    I: IntoIterator<Item = &'a PrerequisiteEdge>,
{
    let prerequisites = required_prerequisites(course_id, edges);
    let all_prerequisites_met = prerequisites.iter().all(|p| standing.completed.contains(p));
    let is_completed = standing.completed.contains(&course_id);
    let is_enrolled = standing.enrolled.contains(&course_id);
    let is_full = seats.is_full();

    Availability {
        is_completed,
        is_enrolled,
        prerequisites: prerequisites.into_iter().collect(),
        all_prerequisites_met,
        is_full,
        can_register: !is_completed && !is_enrolled && all_prerequisites_met && !is_full,
    }
}
