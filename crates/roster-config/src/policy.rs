//! Initial registration policy.
//!
//! These values seed `system_settings` the first time a database is opened.
//! After that the stored values win and are changed through the admin API or
//! `rst policy`.

use roster_core::entities::Policy;
use serde::{Deserialize, Serialize};

const fn default_registration_open() -> bool {
    true
}

const fn default_max_courses_limit() -> u32 {
    Policy::DEFAULT_MAX_COURSES_LIMIT
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyConfig {
    #[serde(default = "default_registration_open")]
    pub registration_open: bool,

    #[serde(default = "default_max_courses_limit")]
    pub max_courses_limit: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            registration_open: default_registration_open(),
            max_courses_limit: default_max_courses_limit(),
        }
    }
}

impl PolicyConfig {
    /// The seed values as a [`Policy`].
    pub const fn seed(&self) -> Policy {
        Policy {
            registration_open: self.registration_open,
            max_courses_limit: self.max_courses_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_core_policy() {
        let config = PolicyConfig::default();
        assert_eq!(config.seed(), Policy::default());
    }
}
