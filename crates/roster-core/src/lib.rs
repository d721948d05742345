//! # roster-core
//!
//! Core types, eligibility engine, and error types for Roster.
//!
//! This crate provides the foundational types shared across all Roster crates:
//! - Entity structs for the catalog (departments, courses, prerequisites),
//!   students, and the enrollment ledger
//! - The global registration [`Policy`](entities::Policy) value object
//! - The pure enrollment eligibility engine
//! - Catalog-edit-time prerequisite edge validation
//! - Decision, denial, and response types returned to callers
//! - Cross-cutting error types
//!
//! Nothing here touches storage. Every decision function is a pure function of
//! the snapshot it is handed, so it can be called from any number of request
//! handlers concurrently.

pub mod audit_detail;
pub mod eligibility;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod prerequisites;
pub mod responses;
