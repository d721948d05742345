//! Cross-cutting error types for Roster.
//!
//! Decision denials (`DenyReason`) are not errors and never appear here.
//! Storage errors (`DatabaseError`) live in `roster-db`, HTTP errors in
//! `roster-server`.

use thiserror::Error;

/// Domain validation errors raised by `roster-core` constructors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (format, range, required fields).
    #[error("Validation error: {0}")]
    Validation(String),
}
