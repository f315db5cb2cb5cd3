//! Teacher-course matcher (C3, spec.md §4.2): binds each unassigned course to
//! exactly one qualified teacher, balancing workload and preferring sequence
//! continuity, without ever exceeding the configured hard cap.

mod sequence;
mod workload;

pub use sequence::partition_sequences;
pub use workload::{workload_contribution, WorkloadIndex};

use std::collections::HashMap;

use tracing::{debug, info};

use crate::families::{certification_match, CertificationMatch};
use crate::types::{Course, CourseId, SchedulerConfiguration, Teacher, TeacherId};

/// Why a course could not be bound, distinguished per spec.md §4.2 step 4.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchFailureReason {
    NoCertifiedTeacher,
    TeachersAtCapacity,
}

#[derive(Debug, Clone)]
pub struct MatchFailure {
    pub course_id: CourseId,
    pub reason: MatchFailureReason,
}

#[derive(Debug, Clone, Default)]
pub struct MatchReport {
    pub bindings: Vec<(CourseId, TeacherId)>,
    pub failures: Vec<MatchFailure>,
}

/// Score for a single (course, teacher) candidate pair, or `None` if the
/// teacher is not a legal candidate (unqualified or at/over hard cap).
fn candidate_score(
    course: &Course,
    teacher: &Teacher,
    workload: &WorkloadIndex,
    config: &SchedulerConfiguration,
) -> Option<f64> {
    let qualification_score = match certification_match_for(teacher, course) {
        CertificationMatch::Exact => 100.0,
        CertificationMatch::Family => 75.0,
        CertificationMatch::None => return None,
    };

    let load = workload.current_load(&teacher.id);
    let thresholds = config.workload_thresholds;

    let workload_bonus = if load >= thresholds.hard_cap {
        return None;
    } else if load <= 0.0 {
        50.0
    } else if load < thresholds.optimal {
        45.0
    } else if load == thresholds.optimal {
        20.0
    } else {
        5.0
    };

    Some(qualification_score + workload_bonus)
}

fn certification_match_for(teacher: &Teacher, course: &Course) -> CertificationMatch {
    teacher
        .certifications
        .iter()
        .map(|cert| certification_match(cert, &course.subject))
        .max_by(|a, b| rank(*a).cmp(&rank(*b)))
        .unwrap_or(CertificationMatch::None)
}

fn rank(m: CertificationMatch) -> u8 {
    match m {
        CertificationMatch::Exact => 2,
        CertificationMatch::Family => 1,
        CertificationMatch::None => 0,
    }
}

/// Pick the best legal candidate for `course` among `teachers`, breaking ties
/// by lowest current workload then stable id order (spec.md §4.2 step 3).
fn best_candidate<'a>(
    course: &Course,
    teachers: &'a [Teacher],
    workload: &WorkloadIndex,
    config: &SchedulerConfiguration,
) -> Option<&'a Teacher> {
    teachers
        .iter()
        .filter_map(|t| candidate_score(course, t, workload, config).map(|s| (t, s)))
        .max_by(|(t1, s1), (t2, s2)| {
            s1.partial_cmp(s2)
                .unwrap()
                .then_with(|| workload.current_load(&t2.id).partial_cmp(&workload.current_load(&t1.id)).unwrap())
                .then_with(|| t2.id.0.cmp(&t1.id.0))
        })
        .map(|(t, _)| t)
}

fn any_candidate_qualifies(course: &Course, teachers: &[Teacher]) -> bool {
    teachers
        .iter()
        .any(|t| certification_match_for(t, course) != CertificationMatch::None)
}

/// Bind every unassigned, active course in `courses` to a qualified teacher.
/// Mutates `courses[*].teacher_id` in place and returns a report of bindings
/// made and failures encountered. Never exceeds the hard cap (spec.md §8
/// quantified invariant); failures leave prior successful bindings intact
/// (spec.md §4.2, "side-effect-free on failure").
pub fn assign_teachers(
    courses: &mut [Course],
    teachers: &[Teacher],
    config: &SchedulerConfiguration,
) -> MatchReport {
    let mut workload = WorkloadIndex::from_courses(courses, config.workload_mode);
    let mut report = MatchReport::default();

    let unassigned_refs: Vec<&Course> = courses.iter().filter(|c| c.active && !c.is_assigned()).collect();
    let groups = partition_sequences(&unassigned_refs);

    // Map from the filtered index space back to the real index in `courses`.
    let unassigned_ids: Vec<CourseId> = unassigned_refs.iter().map(|c| c.id.clone()).collect();
    let index_of: HashMap<CourseId, usize> = courses
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id.clone(), i))
        .collect();

    // Tracks, per sequence key, the teacher bound to the most recent member
    // with headroom — the "reuse predecessor" rule of spec.md §4.2 step 3.
    let mut sequence_teacher: HashMap<(String, String), TeacherId> = HashMap::new();

    for group in groups {
        for local_idx in group {
            let course_id = unassigned_ids[local_idx].clone();
            let real_idx = index_of[&course_id];
            let sequence_key = courses[real_idx].sequence_key();

            let chosen = sequence_teacher
                .get(&sequence_key)
                .and_then(|tid| teachers.iter().find(|t| &t.id == tid))
                .filter(|t| {
                    candidate_score(&courses[real_idx], t, &workload, config).is_some()
                })
                .or_else(|| best_candidate(&courses[real_idx], teachers, &workload, config));

            match chosen {
                Some(teacher) => {
                    let teacher_id = teacher.id.clone();
                    workload.add(&teacher_id, &courses[real_idx], config.workload_mode);
                    courses[real_idx].teacher_id = Some(teacher_id.clone());
                    sequence_teacher.insert(sequence_key, teacher_id.clone());
                    debug!(course_id = %course_id.0, teacher_id = %teacher_id.0, "bound course to teacher");
                    report.bindings.push((course_id, teacher_id));
                }
                None => {
                    let reason = if any_candidate_qualifies(&courses[real_idx], teachers) {
                        MatchFailureReason::TeachersAtCapacity
                    } else {
                        MatchFailureReason::NoCertifiedTeacher
                    };
                    debug!(course_id = %course_id.0, ?reason, "could not bind course");
                    report.failures.push(MatchFailure { course_id, reason });
                }
            }
        }
    }

    info!(
        bindings = report.bindings.len(),
        failures = report.failures.len(),
        "teacher matching complete"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CourseId;

    fn teacher(id: &str, certs: &[&str]) -> Teacher {
        Teacher {
            id: TeacherId(id.into()),
            name: id.into(),
            department: "dept".into(),
            certifications: certs.iter().map(|s| s.to_string()).collect(),
            planning_period: None,
            max_periods_per_day: 7,
        }
    }

    fn course(id: &str, name: &str, subject: &str, sessions: u8) -> Course {
        Course {
            id: CourseId(id.into()),
            code: id.into(),
            name: name.into(),
            subject: subject.into(),
            requires_lab: false,
            required_room_type: None,
            enrollment: 0,
            max_students: 30,
            min_enrollment: 0,
            sessions_per_week: sessions,
            credits: None,
            priority_level: None,
            teacher_id: None,
            room_id: None,
            active: true,
        }
    }

    #[test]
    fn sequence_reuse_binds_both_levels_to_same_teacher() {
        // Scenario 3 of spec.md §8.
        let mut courses = vec![
            course("e9", "English 9", "English", 1),
            course("e10", "English 10", "English", 1),
        ];
        let teachers = vec![teacher("t1", &["English"])];
        let mut config = SchedulerConfiguration::default();
        config.workload_thresholds.hard_cap = 2.0;

        let report = assign_teachers(&mut courses, &teachers, &config);

        assert!(report.failures.is_empty());
        assert_eq!(courses[0].teacher_id, Some(TeacherId("t1".into())));
        assert_eq!(courses[1].teacher_id, Some(TeacherId("t1".into())));

        let workload = WorkloadIndex::from_courses(&courses, config.workload_mode);
        assert_eq!(workload.current_load(&TeacherId("t1".into())), 2.0);
    }

    #[test]
    fn never_exceeds_hard_cap() {
        let mut courses = vec![
            course("c1", "Algebra 1", "Math", 3),
            course("c2", "Algebra 2", "Math", 3),
            course("c3", "Geometry", "Math", 3),
        ];
        let teachers = vec![teacher("t1", &["Math"])];
        let mut config = SchedulerConfiguration::default();
        config.workload_thresholds.hard_cap = 6.0;

        let report = assign_teachers(&mut courses, &teachers, &config);

        let workload = WorkloadIndex::from_courses(&courses, config.workload_mode);
        assert!(workload.current_load(&TeacherId("t1".into())) <= 6.0);
        assert!(!report.failures.is_empty());
    }

    #[test]
    fn no_certified_teacher_reported_distinctly() {
        let mut courses = vec![course("c1", "Art", "Art", 1)];
        let teachers = vec![teacher("t1", &["Math"])];
        let config = SchedulerConfiguration::default();

        let report = assign_teachers(&mut courses, &teachers, &config);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(
            report.failures[0].reason,
            MatchFailureReason::NoCertifiedTeacher
        );
    }

    #[test]
    fn determinism_given_identical_inputs() {
        let make = || {
            vec![
                course("c1", "Algebra 1", "Math", 3),
                course("c2", "Biology", "Science", 3),
                course("c3", "Geometry", "Math", 3),
            ]
        };
        let teachers = vec![teacher("t1", &["Math"]), teacher("t2", &["Science"])];
        let config = SchedulerConfiguration::default();

        let mut a = make();
        let mut b = make();
        assign_teachers(&mut a, &teachers, &config);
        assign_teachers(&mut b, &teachers, &config);

        let a_bindings: Vec<_> = a.iter().map(|c| c.teacher_id.clone()).collect();
        let b_bindings: Vec<_> = b.iter().map(|c| c.teacher_id.clone()).collect();
        assert_eq!(a_bindings, b_bindings);
    }
}
