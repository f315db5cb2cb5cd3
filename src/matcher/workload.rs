use std::collections::HashMap;

use crate::types::{Course, SchedulerConfiguration, TeacherId, WorkloadMode};

/// Tracks each teacher's current load under the configured workload mode.
/// Shared readers are safe (it's plain data); mutation happens only through
/// `&mut self`, and callers needing cross-thread sharing wrap it in a
/// `Mutex` per spec.md §5.
#[derive(Debug, Clone, Default)]
pub struct WorkloadIndex {
    load: HashMap<TeacherId, f64>,
    course_counts: HashMap<TeacherId, u32>,
}

impl WorkloadIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the index from courses already bound to a teacher.
    pub fn from_courses(courses: &[Course], mode: WorkloadMode) -> Self {
        let mut index = Self::new();
        for course in courses {
            if let Some(teacher_id) = &course.teacher_id {
                index.add(teacher_id, course, mode);
            }
        }
        index
    }

    pub fn add(&mut self, teacher_id: &TeacherId, course: &Course, mode: WorkloadMode) {
        let delta = workload_contribution(course, mode);
        *self.load.entry(teacher_id.clone()).or_insert(0.0) += delta;
        *self.course_counts.entry(teacher_id.clone()).or_insert(0) += 1;
    }

    pub fn current_load(&self, teacher_id: &TeacherId) -> f64 {
        self.load.get(teacher_id).copied().unwrap_or(0.0)
    }

    pub fn course_count(&self, teacher_id: &TeacherId) -> u32 {
        self.course_counts.get(teacher_id).copied().unwrap_or(0)
    }

    pub fn would_exceed_cap(&self, teacher_id: &TeacherId, course: &Course, config: &SchedulerConfiguration) -> bool {
        let projected =
            self.current_load(teacher_id) + workload_contribution(course, config.workload_mode);
        projected > config.workload_thresholds.hard_cap
    }
}

/// How much a single course adds to a teacher's load under `mode`. A course
/// with no `credits` counts as one credit in credit-sum mode (DESIGN.md).
pub fn workload_contribution(course: &Course, mode: WorkloadMode) -> f64 {
    match mode {
        WorkloadMode::CourseCount => 1.0,
        WorkloadMode::CreditSum => course.credit_weight(),
        WorkloadMode::SessionsPerWeek => course.sessions_per_week as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CourseId;

    fn course(sessions: u8, credits: Option<f64>) -> Course {
        Course {
            id: CourseId("c".into()),
            code: "C1".into(),
            name: "Course".into(),
            subject: "math".into(),
            requires_lab: false,
            required_room_type: None,
            enrollment: 0,
            max_students: 30,
            min_enrollment: 0,
            sessions_per_week: sessions,
            credits,
            priority_level: None,
            teacher_id: None,
            room_id: None,
            active: true,
        }
    }

    #[test]
    fn missing_credits_falls_back_to_one() {
        let c = course(5, None);
        assert_eq!(workload_contribution(&c, WorkloadMode::CreditSum), 1.0);
    }

    #[test]
    fn sessions_per_week_mode_uses_sessions() {
        let c = course(3, None);
        assert_eq!(workload_contribution(&c, WorkloadMode::SessionsPerWeek), 3.0);
    }
}
