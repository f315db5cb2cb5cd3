use serde::{Deserialize, Serialize};

use super::StudentId;

/// A student, consumed by the matcher only through enrollment counts and by
/// the detector via enrollment tuples — this crate never schedules students
/// itself, it merely detects conflicts across the sections they sit in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub grade_level: u8,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub has_iep: bool,
    #[serde(default)]
    pub has_504: bool,
    #[serde(default)]
    pub is_gifted: bool,
}
