//! Pre-schedule feasibility analyzer (C2, spec.md §4.1). Pure, read-only
//! audits over the cached inventory that answer "can supply meet demand?"
//! and propose concrete remediations — it never attempts a solve.

use std::collections::HashMap;

use tracing::info;

use crate::families::certification_match;
use crate::matcher::WorkloadIndex;
use crate::types::{Conflict, ConflictType, Course, Room, SchedulerConfiguration, Severity, Teacher};

#[derive(Debug, Clone)]
pub struct SuggestedAction {
    pub action_type: String,
    pub params: HashMap<String, String>,
    pub target_entity: String,
}

impl SuggestedAction {
    fn new(action_type: &str, target_entity: impl Into<String>) -> Self {
        Self {
            action_type: action_type.to_string(),
            params: HashMap::new(),
            target_entity: target_entity.into(),
        }
    }

    fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct FeasibilityViolation {
    pub kind: ConflictType,
    pub severity: Severity,
    pub entity: String,
    pub description: String,
    pub suggested_actions: Vec<SuggestedAction>,
}

#[derive(Debug, Clone, Default)]
pub struct FeasibilityReport {
    pub violations: Vec<FeasibilityViolation>,
    pub severity_counts: HashMap<Severity, usize>,
    pub can_auto_fix: bool,
}

impl FeasibilityReport {
    fn push(&mut self, v: FeasibilityViolation) {
        *self.severity_counts.entry(v.severity).or_insert(0) += 1;
        self.violations.push(v);
    }
}

/// Run every audit over the current inventory. Pure and idempotent: calling
/// twice with the same inputs yields an equal report.
pub fn analyze(
    courses: &[Course],
    teachers: &[Teacher],
    rooms: &[Room],
    config: &SchedulerConfiguration,
) -> FeasibilityReport {
    let mut report = FeasibilityReport::default();

    audit_course_teacher(courses, teachers, config, &mut report);
    audit_room_supply_vs_demand(courses, rooms, &mut report);
    audit_room_capacity(courses, rooms, &mut report);
    audit_teacher_workload(courses, teachers, config, &mut report);

    report.can_auto_fix = report
        .violations
        .iter()
        .all(|v| !v.suggested_actions.is_empty());

    info!(
        violations = report.violations.len(),
        can_auto_fix = report.can_auto_fix,
        "feasibility analysis complete"
    );

    report
}

fn audit_course_teacher(
    courses: &[Course],
    teachers: &[Teacher],
    config: &SchedulerConfiguration,
    report: &mut FeasibilityReport,
) {
    let workload = WorkloadIndex::from_courses(courses, config.workload_mode);

    for course in courses.iter().filter(|c| c.active && c.teacher_id.is_none()) {
        let qualified: Vec<&Teacher> = teachers
            .iter()
            .filter(|t| {
                t.certifications
                    .iter()
                    .any(|cert| certification_match(cert, &course.subject) != crate::families::CertificationMatch::None)
            })
            .filter(|t| !workload.would_exceed_cap(&t.id, course, config))
            .collect();

        if qualified.is_empty() {
            let has_any_certified = teachers.iter().any(|t| {
                t.certifications
                    .iter()
                    .any(|cert| certification_match(cert, &course.subject) != crate::families::CertificationMatch::None)
            });

            let mut actions = Vec::new();
            if !has_any_certified {
                actions.push(
                    SuggestedAction::new("hire", course.subject.clone())
                        .with("subject", course.subject.clone()),
                );
            }

            report.push(FeasibilityViolation {
                kind: ConflictType::NoTeacher,
                severity: Severity::Critical,
                entity: course.id.0.clone(),
                description: format!(
                    "Course '{}' ({}) has no qualified, available teacher",
                    course.code, course.subject
                ),
                suggested_actions: actions,
            });
        }
    }
}

/// Subjects treated as "specialized" for room-supply auditing: anything
/// whose required room type isn't a plain classroom.
fn specialized_subject_key(course: &Course) -> Option<String> {
    course
        .required_room_type
        .map(|rt| format!("{:?}", rt))
        .or_else(|| course.requires_lab.then(|| "Lab".to_string()))
}

fn audit_room_supply_vs_demand(courses: &[Course], rooms: &[Room], report: &mut FeasibilityReport) {
    let mut demand: HashMap<String, (u32, usize)> = HashMap::new();
    for course in courses.iter().filter(|c| c.active) {
        if let Some(key) = specialized_subject_key(course) {
            let entry = demand.entry(key).or_insert((0, 0));
            entry.0 += course.sessions_per_week as u32;
            entry.1 += 1;
        }
    }

    for (subject_key, (required, affected_sections)) in demand {
        let matching_rooms: Vec<&Room> = rooms
            .iter()
            .filter(|r| r.schedulable() && format!("{:?}", r.room_type) == subject_key)
            .collect();

        let available: u32 = matching_rooms
            .iter()
            .map(|r| if r.allow_sharing { r.max_concurrent_classes } else { 1 })
            .sum::<u32>()
            * 5; // weekly sessions a single room-slot can host, one per weekday

        if required > available {
            let deficit = required - available;
            let room_count = matching_rooms.len() as u32;
            let capacity_per_room = 5;
            let rooms_needed = ((required + capacity_per_room - 1) / capacity_per_room).max(1);
            let extra_rooms = rooms_needed.saturating_sub(room_count).max(1);

            let actions = vec![
                SuggestedAction::new("add_rooms", subject_key.clone())
                    .with("count", extra_rooms.to_string())
                    .with("total_needed", rooms_needed.to_string()),
                SuggestedAction::new("enable_sharing", subject_key.clone())
                    .with("max_concurrent_classes", rooms_needed.to_string()),
                SuggestedAction::new("reduce_sections", subject_key.clone())
                    .with("reduce_by", ((deficit + 4) / 5).to_string()),
            ];

            report.push(FeasibilityViolation {
                kind: ConflictType::InsufficientRooms,
                severity: if affected_sections > 3 {
                    Severity::High
                } else {
                    Severity::Medium
                },
                entity: subject_key.clone(),
                description: format!(
                    "Insufficient '{}' rooms: need {} weekly periods, have {} (deficit {})",
                    subject_key, required, available, deficit
                ),
                suggested_actions: actions,
            });
        }
    }
}

fn audit_room_capacity(courses: &[Course], rooms: &[Room], report: &mut FeasibilityReport) {
    let largest_standard = rooms
        .iter()
        .filter(|r| matches!(r.room_type, crate::types::RoomType::Classroom))
        .map(|r| r.capacity)
        .max()
        .unwrap_or(0);

    for course in courses.iter().filter(|c| c.active) {
        if course.enrollment > largest_standard && course.enrollment > 0 {
            let fitting: Vec<&Room> = rooms
                .iter()
                .filter(|r| r.schedulable() && r.effective_max_capacity() >= course.enrollment)
                .collect();

            let excess = course.enrollment - largest_standard;
            let severity = if excess > 20 {
                Severity::High
            } else if excess > 5 {
                Severity::Medium
            } else {
                Severity::Low
            };

            let actions = fitting
                .iter()
                .map(|r| {
                    SuggestedAction::new("use_room", r.id.0.clone())
                        .with("capacity", r.capacity.to_string())
                })
                .collect();

            report.push(FeasibilityViolation {
                kind: ConflictType::RoomCapacityShortfall,
                severity,
                entity: course.id.0.clone(),
                description: format!(
                    "Course '{}' enrollment {} exceeds largest standard classroom ({})",
                    course.code, course.enrollment, largest_standard
                ),
                suggested_actions: actions,
            });
        }
    }
}

fn audit_teacher_workload(
    courses: &[Course],
    teachers: &[Teacher],
    config: &SchedulerConfiguration,
    report: &mut FeasibilityReport,
) {
    let workload = WorkloadIndex::from_courses(courses, config.workload_mode);

    for teacher in teachers {
        let load = workload.current_load(&teacher.id);
        if load > config.workload_thresholds.hard_cap {
            let overloaded_courses: Vec<&Course> = courses
                .iter()
                .filter(|c| c.teacher_id.as_ref() == Some(&teacher.id))
                .collect();

            let mut actions = Vec::new();
            for course in &overloaded_courses {
                let targets: Vec<&Teacher> = teachers
                    .iter()
                    .filter(|t| t.id != teacher.id)
                    .filter(|t| {
                        t.certifications
                            .iter()
                            .any(|cert| certification_match(cert, &course.subject) != crate::families::CertificationMatch::None)
                    })
                    .filter(|t| !workload.would_exceed_cap(&t.id, course, config))
                    .collect();

                for target in targets {
                    actions.push(
                        SuggestedAction::new("reassign", course.id.0.clone())
                            .with("from_teacher", teacher.id.0.clone())
                            .with("to_teacher", target.id.0.clone()),
                    );
                }
            }

            report.push(FeasibilityViolation {
                kind: ConflictType::TeacherOverloadRisk,
                severity: Severity::High,
                entity: teacher.id.0.clone(),
                description: format!(
                    "Teacher '{}' workload {} exceeds hard cap {}",
                    teacher.name, load, config.workload_thresholds.hard_cap
                ),
                suggested_actions: actions,
            });
        }
    }

    audit_period_floor_and_ceiling(courses, teachers, config, report);
}

/// Floor/ceiling on total weekly periods assigned per teacher (spec.md §6:
/// `min_periods_per_teacher`/`max_periods_per_teacher`, defaults 4/7). This
/// is a separate, coarser check from the workload-mode thresholds above: it
/// counts raw periods regardless of `workload_mode`, and flags both too few
/// (understaffed) and too many.
fn audit_period_floor_and_ceiling(
    courses: &[Course],
    teachers: &[Teacher],
    config: &SchedulerConfiguration,
    report: &mut FeasibilityReport,
) {
    for teacher in teachers {
        let periods: u32 = courses
            .iter()
            .filter(|c| c.active && c.teacher_id.as_ref() == Some(&teacher.id))
            .map(|c| c.sessions_per_week as u32)
            .sum();

        if periods > config.max_periods_per_teacher as u32 {
            report.push(FeasibilityViolation {
                kind: ConflictType::TeacherOverloadRisk,
                severity: Severity::Medium,
                entity: teacher.id.0.clone(),
                description: format!(
                    "Teacher '{}' has {periods} periods/week, exceeding the configured max of {}",
                    teacher.name, config.max_periods_per_teacher
                ),
                suggested_actions: Vec::new(),
            });
        } else if periods > 0 && periods < config.min_periods_per_teacher as u32 {
            report.push(FeasibilityViolation {
                kind: ConflictType::SchedulingConflictRisk,
                severity: Severity::Low,
                entity: teacher.id.0.clone(),
                description: format!(
                    "Teacher '{}' has only {periods} periods/week, below the configured min of {}",
                    teacher.name, config.min_periods_per_teacher
                ),
                suggested_actions: Vec::new(),
            });
        }
    }
}

/// Convert a feasibility violation into a schedule-scoped `Conflict` record
/// when callers want to persist pre-solve audits alongside detector output.
pub fn to_conflict(
    v: &FeasibilityViolation,
    schedule_id: crate::types::ScheduleId,
    id: crate::types::ConflictId,
) -> Conflict {
    Conflict {
        id,
        schedule_id,
        kind: v.kind,
        severity: v.severity,
        slot_ids: Vec::new(),
        teacher_ids: Vec::new(),
        room_ids: Vec::new(),
        course_ids: Vec::new(),
        description: v.description.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CourseId, RoomId, RoomType, TeacherId};

    fn lab_course(id: &str, sessions: u8) -> Course {
        Course {
            id: CourseId(id.into()),
            code: id.into(),
            name: "Biology".into(),
            subject: "science".into(),
            requires_lab: true,
            required_room_type: Some(RoomType::ScienceLab),
            enrollment: 20,
            max_students: 24,
            min_enrollment: 0,
            sessions_per_week: sessions,
            credits: None,
            priority_level: None,
            teacher_id: Some(TeacherId("t1".into())),
            room_id: None,
            active: true,
        }
    }

    fn science_lab_room(max_concurrent: u32) -> Room {
        Room {
            id: RoomId("lab1".into()),
            number: "201".into(),
            building: "Main".into(),
            floor: 1,
            capacity: 24,
            room_type: RoomType::ScienceLab,
            allow_sharing: max_concurrent > 1,
            max_concurrent_classes: max_concurrent,
            available: true,
            features: vec![],
        }
    }

    #[test]
    fn insufficient_rooms_flagged_when_demand_exceeds_supply() {
        let courses: Vec<Course> = (0..4).map(|i| lab_course(&format!("c{i}"), 5)).collect();
        let rooms = vec![science_lab_room(1)];
        let config = SchedulerConfiguration::default();

        let report = analyze(&courses, &[], &rooms, &config);

        let insufficient = report
            .violations
            .iter()
            .find(|v| v.kind == ConflictType::InsufficientRooms)
            .expect("expected INSUFFICIENT_ROOMS violation");

        // required = 4 * 5 = 20, available = 1 room * 1 concurrent * 5 days = 5
        assert!(insufficient.description.contains("need 20"));
        assert!(insufficient.description.contains("have 5"));
        assert_eq!(insufficient.severity, Severity::High);
        assert!(insufficient
            .suggested_actions
            .iter()
            .any(|a| a.action_type == "add_rooms"));
        assert!(insufficient
            .suggested_actions
            .iter()
            .any(|a| a.action_type == "enable_sharing"));
    }

    #[test]
    fn course_without_any_certified_teacher_suggests_hire() {
        let mut course = lab_course("c1", 5);
        course.teacher_id = None;
        let config = SchedulerConfiguration::default();

        let report = analyze(&[course], &[], &[science_lab_room(1)], &config);

        let v = report
            .violations
            .iter()
            .find(|v| v.kind == ConflictType::NoTeacher)
            .unwrap();
        assert_eq!(v.severity, Severity::Critical);
        assert!(v.suggested_actions.iter().any(|a| a.action_type == "hire"));
    }
}
