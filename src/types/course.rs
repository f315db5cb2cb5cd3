use serde::{Deserialize, Serialize};

use super::{CourseId, RoomId, RoomType, TeacherId};

fn default_sessions_per_week() -> u8 {
    5
}

/// A course section as carried in the engine's working set. The spec calls
/// this entity "Course (section)": one row per concrete offering, not per
/// catalog course — a catalog course with three sections is three `Course`
/// values sharing a `code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub name: String,
    pub subject: String,
    #[serde(default)]
    pub requires_lab: bool,
    #[serde(default)]
    pub required_room_type: Option<RoomType>,
    #[serde(default)]
    pub enrollment: u32,
    pub max_students: u32,
    #[serde(default)]
    pub min_enrollment: u32,
    #[serde(default = "default_sessions_per_week")]
    pub sessions_per_week: u8,
    #[serde(default)]
    pub credits: Option<f64>,
    #[serde(default)]
    pub priority_level: Option<u8>,
    #[serde(default)]
    pub teacher_id: Option<TeacherId>,
    #[serde(default)]
    pub room_id: Option<RoomId>,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

/// Trailing level indicators stripped to compute a course's sequence key, in
/// the order the matcher tries them (longest/most specific first so "Honors"
/// doesn't get eaten by a looser match).
pub const LEVEL_INDICATORS: &[&str] = &[
    " Honors", " Advanced", " Intro", " AP", " II", " III", " IV", " 1", " 2", " 3", " 4",
];

impl Course {
    /// Name with any trailing level indicator stripped, used to group a
    /// sequence ("Algebra 1", "Algebra 2" -> "Algebra").
    pub fn sequence_base_name(&self) -> String {
        let mut name = self.name.clone();
        for indicator in LEVEL_INDICATORS {
            if let Some(stripped) = name.strip_suffix(indicator) {
                name = stripped.to_string();
                break;
            }
        }
        name
    }

    /// Sequence key groups courses of the same subject and base name.
    pub fn sequence_key(&self) -> (String, String) {
        (
            self.subject.to_lowercase(),
            self.sequence_base_name().to_lowercase(),
        )
    }

    /// Numeric level extracted for sort order within a sequence (1 for no
    /// suffix, rising for "2", "3", ..., "Honors"/"AP" sort after numerics).
    pub fn level(&self) -> u8 {
        let name = self.name.to_lowercase();
        if name.ends_with(" ap") {
            90
        } else if name.ends_with(" honors") || name.ends_with(" advanced") {
            80
        } else if name.ends_with(" intro") {
            1
        } else {
            for suffix in [" 4", " iv"] {
                if name.ends_with(suffix) {
                    return 4;
                }
            }
            for suffix in [" 3", " iii"] {
                if name.ends_with(suffix) {
                    return 3;
                }
            }
            for suffix in [" 2", " ii"] {
                if name.ends_with(suffix) {
                    return 2;
                }
            }
            1
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.teacher_id.is_some()
    }

    /// Workload credit this course contributes in "by credits" mode. When
    /// `credits` is absent, a course counts as one credit (see DESIGN.md).
    pub fn credit_weight(&self) -> f64 {
        self.credits.unwrap_or(1.0)
    }
}
