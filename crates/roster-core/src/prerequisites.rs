//! Catalog-edit-time validation of prerequisite edges.
//!
//! [`validate_new_prerequisite`] is pairwise: it rejects self edges, duplicate
//! edges, and an edge whose reverse already exists. Longer cycles such as
//! `A -> B`, `C -> A`, `B -> C` are accepted. [`validate_new_prerequisite_strict`]
//! adds a reachability check over [`PrerequisiteGraph`] and rejects those too.

use std::collections::{BTreeMap, BTreeSet};

use crate::eligibility::Decision;
use crate::entities::PrerequisiteEdge;
use crate::enums::DenyReason;
use crate::ids::CourseId;

/// Validate a new `course_id -> prerequisite_id` edge against existing edges.
pub fn validate_new_prerequisite<'a, I>(
    course_id: CourseId,
    prerequisite_id: CourseId,
    existing: I,
) -> Decision
where
    I: IntoIterator<Item = &'a PrerequisiteEdge>,
{
    if course_id == prerequisite_id {
        return Decision::Deny(DenyReason::DirectCycle);
    }
    let candidate = PrerequisiteEdge::new(course_id, prerequisite_id);
    let reverse = candidate.reversed();

    let mut has_reverse = false;
    for edge in existing {
        if *edge == candidate {
            return Decision::Deny(DenyReason::DuplicatePrerequisite);
        }
        has_reverse |= *edge == reverse;
    }
    if has_reverse {
        return Decision::Deny(DenyReason::DirectCycle);
    }
    Decision::Allow
}

/// Pairwise validation followed by full cycle detection.
pub fn validate_new_prerequisite_strict(
    course_id: CourseId,
    prerequisite_id: CourseId,
    existing: &[PrerequisiteEdge],
) -> Decision {
    let pairwise = validate_new_prerequisite(course_id, prerequisite_id, existing);
    if !pairwise.is_allowed() {
        return pairwise;
    }
    // The new edge closes a cycle iff course_id is already required,
    // directly or transitively, by prerequisite_id.
    if PrerequisiteGraph::from_edges(existing).reaches(prerequisite_id, course_id) {
        return Decision::Deny(DenyReason::TransitiveCycle);
    }
    Decision::Allow
}

/// Adjacency view of the prerequisite edges: course -> its prerequisites.
#[derive(Debug, Clone, Default)]
pub struct PrerequisiteGraph {
    adjacency: BTreeMap<CourseId, BTreeSet<CourseId>>,
}

impl PrerequisiteGraph {
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'a PrerequisiteEdge>,
    {
        let mut adjacency: BTreeMap<CourseId, BTreeSet<CourseId>> = BTreeMap::new();
        for edge in edges {
            adjacency
                .entry(edge.course_id)
                .or_default()
                .insert(edge.prerequisite_id);
        }
        Self { adjacency }
    }

    /// Whether `to` is reachable from `from` by following prerequisite edges.
    /// A course reaches itself.
    #[must_use]
    pub fn reaches(&self, from: CourseId, to: CourseId) -> bool {
        if from == to {
            return true;
        }
        let mut stack = vec![from];
        let mut seen = BTreeSet::from([from]);
        while let Some(node) = stack.pop() {
            let Some(next) = self.adjacency.get(&node) else {
                continue;
            };
            for &n in next {
                if n == to {
                    return true;
                }
                if seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        false
    }

    /// Every course that must be completed, directly or transitively, before
    /// `course_id`. Terminates on cyclic catalogs and never includes
    /// `course_id` itself.
    #[must_use]
    pub fn required_for(&self, course_id: CourseId) -> BTreeSet<CourseId> {
        let mut out = BTreeSet::new();
        let mut stack = vec![course_id];
        while let Some(node) = stack.pop() {
            if let Some(next) = self.adjacency.get(&node) {
                for &n in next {
                    if n != course_id && out.insert(n) {
                        stack.push(n);
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const A: CourseId = 1;
    const B: CourseId = 2;
    const C: CourseId = 3;
    const NO_EDGES: [PrerequisiteEdge; 0] = [];

    fn e(course: CourseId, prereq: CourseId) -> PrerequisiteEdge {
        PrerequisiteEdge::new(course, prereq)
    }

    #[test]
    fn first_edge_is_allowed() {
        assert_eq!(validate_new_prerequisite(A, B, &NO_EDGES), Decision::Allow);
    }

    #[test]
    fn reverse_edge_is_direct_cycle() {
        let existing = [e(B, A)];
        assert_eq!(
            validate_new_prerequisite(A, B, &existing),
            Decision::Deny(DenyReason::DirectCycle)
        );
    }

    #[test]
    fn self_edge_is_direct_cycle() {
        assert_eq!(
            validate_new_prerequisite(A, A, &NO_EDGES),
            Decision::Deny(DenyReason::DirectCycle)
        );
    }

    #[test]
    fn duplicate_edge_is_rejected() {
        let existing = [e(A, B)];
        assert_eq!(
            validate_new_prerequisite(A, B, &existing),
            Decision::Deny(DenyReason::DuplicatePrerequisite)
        );
    }

    #[test]
    fn pairwise_mode_accepts_three_cycle() {
        let mut edges = Vec::new();
        for (course, prereq) in [(A, B), (C, A), (B, C)] {
            assert_eq!(
                validate_new_prerequisite(course, prereq, &edges),
                Decision::Allow
            );
            edges.push(e(course, prereq));
        }
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn strict_mode_rejects_three_cycle() {
        let edges = [e(A, B), e(C, A)];
        assert_eq!(
            validate_new_prerequisite_strict(B, C, &edges),
            Decision::Deny(DenyReason::TransitiveCycle)
        );
    }

    #[test]
    fn strict_mode_still_reports_direct_cycle_first() {
        let edges = [e(B, A)];
        assert_eq!(
            validate_new_prerequisite_strict(A, B, &edges),
            Decision::Deny(DenyReason::DirectCycle)
        );
    }

    #[test]
    fn strict_mode_allows_diamond() {
        // A needs B and C, both need D.
        let edges = [e(A, B), e(A, C), e(B, 4)];
        assert_eq!(validate_new_prerequisite_strict(C, 4, &edges), Decision::Allow);
    }

    #[test]
    fn graph_reachability_and_closure() {
        let g = PrerequisiteGraph::from_edges(&[e(A, B), e(B, C), e(C, 4)]);
        assert!(g.reaches(A, 4));
        assert!(!g.reaches(4, A));
        assert!(g.reaches(B, B));
        assert_eq!(g.required_for(A), BTreeSet::from([B, C, 4]));
        assert!(g.required_for(4).is_empty());
    }

    #[test]
    fn closure_terminates_on_cycles() {
        let g = PrerequisiteGraph::from_edges(&[e(A, B), e(B, C), e(C, A)]);
        assert_eq!(g.required_for(A), BTreeSet::from([B, C]));
    }
}
