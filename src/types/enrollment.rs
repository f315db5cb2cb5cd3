use serde::{Deserialize, Serialize};

use super::{CourseId, StudentId};

/// Conveys which students belong to which course section. `active` lets a
/// dropped enrollment remain in history without being counted by detectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub student_id: StudentId,
    pub course_id: CourseId,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Enrollment {
    pub fn new(student_id: StudentId, course_id: CourseId) -> Self {
        Self {
            student_id,
            course_id,
            active: true,
        }
    }
}
