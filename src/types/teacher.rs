use serde::{Deserialize, Serialize};

use super::{TeacherId, TimeSlot};

fn default_max_periods_per_day() -> u8 {
    7
}

/// A teacher available to be bound to courses. `certifications` are free-form
/// subject strings compared case-insensitively and by family (see
/// `families` module); the struct itself does no matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub department: String,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub planning_period: Option<TimeSlot>,
    #[serde(default = "default_max_periods_per_day")]
    pub max_periods_per_day: u8,
}

impl Teacher {
    pub fn is_certified_for(&self, subject: &str) -> bool {
        self.certifications
            .iter()
            .any(|c| c.eq_ignore_ascii_case(subject))
    }
}
