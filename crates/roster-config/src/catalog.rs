//! Catalog editing behavior.

use roster_core::ids::DEFAULT_SEMESTER;
use serde::{Deserialize, Serialize};

fn default_semester() -> String {
    DEFAULT_SEMESTER.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Reject prerequisite edges that close a cycle of any length, not only
    /// direct two-course cycles.
    #[serde(default)]
    pub strict_cycle_check: bool,

    /// Semester assigned to students created without one.
    #[serde(default = "default_semester")]
    pub default_semester: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            strict_cycle_check: false,
            default_semester: default_semester(),
        }
    }
}
