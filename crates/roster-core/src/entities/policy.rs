use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Global registration policy, handed to the eligibility engine by value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Policy {
    pub registration_open: bool,
    /// Maximum simultaneous active enrollments per student.
    pub max_courses_limit: u32,
}

impl Policy {
    pub const DEFAULT_MAX_COURSES_LIMIT: u32 = 6;

    /// Construct a policy, rejecting a zero limit.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when `max_courses_limit` is 0.
    pub fn new(registration_open: bool, max_courses_limit: u32) -> Result<Self, CoreError> {
        let policy = Self {
            registration_open,
            max_courses_limit,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when `max_courses_limit` is 0.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_courses_limit == 0 {
            return Err(CoreError::Validation(
                "max_courses_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            registration_open: true,
            max_courses_limit: Self::DEFAULT_MAX_COURSES_LIMIT,
        }
    }
}
