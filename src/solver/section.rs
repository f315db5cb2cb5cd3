use crate::types::{Course, CourseId, SectionOrdinal};

/// One weekly meeting of a course still needing a (time, room, teacher?)
/// triple. A course with `sessionsPerWeek = 5` expands into five of these.
#[derive(Debug, Clone)]
pub struct SectionUnit {
    pub course_id: CourseId,
    pub ordinal: SectionOrdinal,
}

/// Expand every active course into its weekly section units, in a stable
/// order (course order, then ordinal) so repeated solves over identical
/// input see identical section lists.
pub fn expand_sections(courses: &[Course]) -> Vec<SectionUnit> {
    courses
        .iter()
        .filter(|c| c.active)
        .flat_map(|c| {
            (0..c.sessions_per_week).map(move |i| SectionUnit {
                course_id: c.id.clone(),
                ordinal: SectionOrdinal(i),
            })
        })
        .collect()
}

/// Criticality sort key for greedy seeding (spec.md §4.4): labs first, then
/// higher enrollment, then fewer matching rooms (scarcer supply), then id
/// for determinism.
pub fn criticality_key(course: &Course, matching_room_count: usize) -> (std::cmp::Reverse<u8>, std::cmp::Reverse<u32>, usize, String) {
    (
        std::cmp::Reverse(course.requires_lab as u8),
        std::cmp::Reverse(course.enrollment),
        matching_room_count,
        course.id.0.clone(),
    )
}
