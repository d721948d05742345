//! Repository modules implementing the Roster storage operations.
//!
//! Each module adds methods to `RosterService` via `impl RosterService` blocks.
//! Snapshot readers are free functions over `&libsql::Connection` so the same
//! code runs inside a write transaction and on the plain connection.

pub mod audit;
pub mod course;
pub mod department;
pub mod enrollment;
pub mod policy;
pub mod prerequisite;
pub mod stats;
pub mod student;
