//! Conflict detector (C4, spec.md §4.3): runs the thirteen detection
//! categories over a schedule, answers `hasConflicts?` in O(1), and exposes
//! a fast per-slot oracle the solver uses to score candidate placements.

mod categories;

use std::collections::HashMap;

use tracing::debug;

use crate::families::matches_family;
use crate::types::{
    Conflict, ConflictId, ConflictType, Course, CourseId, Enrollment, Room, RoomId,
    Schedule, ScheduleId, ScheduleSlot, Severity, Student, Teacher, TeacherId,
};

pub use categories::PREFERRED_BREAK_MINUTES;

/// Everything the detector needs to look things up by id; callers build this
/// once per run from whatever repository or in-memory cache they hold.
pub struct Inventory<'a> {
    pub courses: HashMap<&'a CourseId, &'a Course>,
    pub teachers: HashMap<&'a TeacherId, &'a Teacher>,
    pub rooms: HashMap<&'a RoomId, &'a Room>,
    pub enrollments: &'a [Enrollment],
    pub students: HashMap<&'a crate::types::StudentId, &'a Student>,
}

impl<'a> Inventory<'a> {
    pub fn new(
        courses: &'a [Course],
        teachers: &'a [Teacher],
        rooms: &'a [Room],
        enrollments: &'a [Enrollment],
        students: &'a [Student],
    ) -> Self {
        Self {
            courses: courses.iter().map(|c| (&c.id, c)).collect(),
            teachers: teachers.iter().map(|t| (&t.id, t)).collect(),
            rooms: rooms.iter().map(|r| (&r.id, r)).collect(),
            enrollments,
            students: students.iter().map(|s| (&s.id, s)).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
    pub info_count: usize,
    pub valid: bool,
}

impl ValidationSummary {
    fn from_conflicts(conflicts: &[Conflict]) -> Self {
        let mut s = ValidationSummary::default();
        for c in conflicts {
            match c.severity {
                Severity::Critical => s.critical_count += 1,
                Severity::High => s.high_count += 1,
                Severity::Medium => s.medium_count += 1,
                Severity::Low => s.low_count += 1,
                Severity::Info => s.info_count += 1,
            }
        }
        s.valid = s.critical_count == 0;
        s
    }
}

/// Run every detection category over `schedule`. Deterministic: identical
/// inputs in identical order always yield an identical (and identically
/// ordered) conflict list, which is what makes `refreshConflicts` idempotent.
pub fn detect_all(schedule: &Schedule, inventory: &Inventory) -> Vec<Conflict> {
    let mut raw = Vec::new();
    raw.extend(categories::teacher_and_room_overlap(&schedule.slots, inventory));
    raw.extend(categories::back_to_back_without_break(&schedule.slots));
    raw.extend(categories::missing_lunch_break(&schedule.slots));
    raw.extend(categories::excessive_consecutive(&schedule.slots));
    raw.extend(categories::room_capacity_exceeded(&schedule.slots, inventory));
    raw.extend(categories::room_type_mismatch(&schedule.slots, inventory));
    raw.extend(categories::teacher_overload(&schedule.slots, inventory));
    raw.extend(categories::missing_preparation_period(&schedule.slots, inventory));
    raw.extend(categories::subject_mismatch(&schedule.slots, inventory));
    raw.extend(categories::building_travel_time(&schedule.slots, inventory));
    raw.extend(categories::student_schedule_conflicts(&schedule.slots, inventory));
    raw.extend(categories::section_enrollment(inventory));
    raw.extend(categories::duplicate_enrollments(inventory));

    let stamped = stamp_ids(&schedule.id, raw);
    debug!(schedule_id = %schedule.id.0, conflicts = stamped.len(), "full conflict sweep complete");
    stamped
}

/// Categories 1, 5-7 only, evaluated as if `candidate` were inserted into
/// `schedule` — the fast oracle the solver uses while scoring placements.
pub fn detect_potential(schedule: &Schedule, candidate: &ScheduleSlot, inventory: &Inventory) -> Vec<Conflict> {
    let mut with_candidate = schedule.slots.clone();
    with_candidate.push(candidate.clone());

    let mut raw = Vec::new();
    raw.extend(categories::teacher_and_room_overlap(&with_candidate, inventory));
    raw.extend(categories::room_capacity_exceeded(&with_candidate, inventory));
    raw.extend(categories::room_type_mismatch(&with_candidate, inventory));
    raw.extend(categories::teacher_overload(&with_candidate, inventory));

    stamp_ids(&schedule.id, raw)
        .into_iter()
        .filter(|c| c.slot_ids.contains(&candidate.id))
        .collect()
}

pub fn validate_schedule(schedule: &Schedule, inventory: &Inventory) -> ValidationSummary {
    ValidationSummary::from_conflicts(&detect_all(schedule, inventory))
}

fn stamp_ids(schedule_id: &ScheduleId, conflicts: Vec<Conflict>) -> Vec<Conflict> {
    conflicts
        .into_iter()
        .enumerate()
        .map(|(i, mut c)| {
            c.id = ConflictId(format!("{}-conflict-{:04}", schedule_id.0, i));
            c
        })
        .collect()
}

/// Schedule-keyed conflict cache. `save`/`clear`/`refresh` are the only
/// mutating operations (spec.md §4.3); `has_conflicts` is O(1).
#[derive(Debug, Default)]
pub struct ConflictStore {
    by_schedule: HashMap<ScheduleId, Vec<Conflict>>,
}

impl ConflictStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self, schedule_id: ScheduleId, conflicts: Vec<Conflict>) {
        self.by_schedule.insert(schedule_id, conflicts);
    }

    pub fn clear(&mut self, schedule_id: &ScheduleId) {
        self.by_schedule.remove(schedule_id);
    }

    pub fn conflicts_for(&self, schedule_id: &ScheduleId) -> &[Conflict] {
        self.by_schedule
            .get(schedule_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_conflicts(&self, schedule_id: &ScheduleId) -> bool {
        self.by_schedule
            .get(schedule_id)
            .is_some_and(|c| !c.is_empty())
    }

    pub fn critical_count(&self, schedule_id: &ScheduleId) -> usize {
        self.conflicts_for(schedule_id)
            .iter()
            .filter(|c| c.is_critical())
            .count()
    }

    /// `clear + detect + save` under one call, as spec.md §4.3 defines refresh.
    pub fn refresh(&mut self, schedule: &Schedule, inventory: &Inventory) -> &[Conflict] {
        self.clear(&schedule.id);
        let fresh = detect_all(schedule, inventory);
        self.save(schedule.id.clone(), fresh);
        self.conflicts_for(&schedule.id)
    }
}

pub(crate) fn subject_matches_department(department: &str, subject: &str) -> bool {
    department.eq_ignore_ascii_case(subject) || matches_family(department, subject_family_or_self(subject))
}

fn subject_family_or_self(subject: &str) -> &str {
    crate::families::family_of(subject).unwrap_or(subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClockTime, RoomType, ScheduleId, ScheduleStatus, SlotId, Weekday};

    fn course(id: &str, subject: &str, enrollment: u32, max_students: u32) -> Course {
        Course {
            id: CourseId(id.into()),
            code: id.into(),
            name: id.into(),
            subject: subject.into(),
            requires_lab: false,
            required_room_type: None,
            enrollment,
            max_students,
            min_enrollment: 0,
            sessions_per_week: 1,
            credits: None,
            priority_level: None,
            teacher_id: Some(TeacherId("t1".into())),
            room_id: None,
            active: true,
        }
    }

    fn teacher(id: &str) -> Teacher {
        Teacher {
            id: TeacherId(id.into()),
            name: id.into(),
            department: "Math".into(),
            certifications: vec!["Math".into()],
            planning_period: None,
            max_periods_per_day: 7,
        }
    }

    fn room(id: &str, capacity: u32) -> Room {
        Room {
            id: RoomId(id.into()),
            number: id.into(),
            building: "Main".into(),
            floor: 1,
            capacity,
            room_type: RoomType::Classroom,
            allow_sharing: false,
            max_concurrent_classes: 1,
            available: true,
            features: vec![],
        }
    }

    fn slot(id: &str, course: &str, teacher: &str, room: &str, start: u8, end: u8) -> ScheduleSlot {
        ScheduleSlot {
            id: SlotId(id.into()),
            schedule_id: ScheduleId("s1".into()),
            course_id: CourseId(course.into()),
            teacher_id: Some(TeacherId(teacher.into())),
            room_id: Some(RoomId(room.into())),
            day_of_week: Weekday::Monday,
            start_time: ClockTime::hm(start, 0),
            end_time: ClockTime::hm(end, 0),
        }
    }

    #[test]
    fn double_booking_yields_one_critical_conflict_referencing_both_slots() {
        // Scenario 1 of spec.md §8.
        let c1 = course("c1", "Math", 10, 30);
        let c2 = course("c2", "Math", 10, 30);
        let t = teacher("t1");
        let r1 = room("r1", 30);
        let r2 = room("r2", 30);
        let s1 = slot("sl1", "c1", "t1", "r1", 9, 10);
        let s2 = slot("sl2", "c2", "t1", "r2", 9, 10);

        let schedule = Schedule {
            id: ScheduleId("s1".into()),
            name: "S".into(),
            status: ScheduleStatus::Review,
            slots: vec![s1, s2],
            score: 0.0,
        };

        let courses = vec![c1, c2];
        let teachers = vec![t];
        let rooms = vec![r1, r2];
        let enrollments = vec![];
        let students = vec![];
        let inventory = Inventory::new(&courses, &teachers, &rooms, &enrollments, &students);

        let conflicts = detect_all(&schedule, &inventory);
        let overlaps: Vec<_> = conflicts
            .iter()
            .filter(|c| c.kind == ConflictType::TeacherOverlap)
            .collect();

        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].severity, Severity::Critical);
        assert_eq!(overlaps[0].slot_ids.len(), 2);
    }

    #[test]
    fn room_capacity_exceeded_mentions_both_numbers() {
        // Scenario 2 of spec.md §8.
        let c = course("c1", "Math", 32, 32);
        let t = teacher("t1");
        let r = room("r1", 30);
        let s = slot("sl1", "c1", "t1", "r1", 9, 10);

        let schedule = Schedule {
            id: ScheduleId("s1".into()),
            name: "S".into(),
            status: ScheduleStatus::Review,
            slots: vec![s],
            score: 0.0,
        };
        let courses = vec![c];
        let teachers = vec![t];
        let rooms = vec![r];
        let enrollments = vec![];
        let students = vec![];
        let inventory = Inventory::new(&courses, &teachers, &rooms, &enrollments, &students);

        let conflicts = detect_all(&schedule, &inventory);
        let hit = conflicts
            .iter()
            .find(|c| c.kind == ConflictType::RoomCapacityExceeded)
            .expect("expected ROOM_CAPACITY_EXCEEDED");

        assert_eq!(hit.severity, Severity::High);
        assert!(hit.description.contains("32"));
        assert!(hit.description.contains("30"));
    }

    #[test]
    fn missing_lunch_break_detected_for_five_contiguous_periods() {
        // Scenario 5 of spec.md §8.
        let courses: Vec<Course> = (0..5).map(|i| course(&format!("c{i}"), "Math", 10, 30)).collect();
        let t = teacher("t1");
        let r = room("r1", 30);
        let slots: Vec<ScheduleSlot> = (0..5)
            .map(|i| {
                let start_minutes = 9 * 60 + i * 50;
                ScheduleSlot {
                    id: SlotId(format!("sl{i}")),
                    schedule_id: ScheduleId("s1".into()),
                    course_id: CourseId(format!("c{i}")),
                    teacher_id: Some(TeacherId("t1".into())),
                    room_id: Some(RoomId("r1".into())),
                    day_of_week: Weekday::Monday,
                    start_time: ClockTime(start_minutes as u16),
                    end_time: ClockTime((start_minutes + 50) as u16),
                }
            })
            .collect();

        let schedule = Schedule {
            id: ScheduleId("s1".into()),
            name: "S".into(),
            status: ScheduleStatus::Review,
            slots,
            score: 0.0,
        };
        let teachers = vec![t];
        let rooms = vec![r];
        let enrollments = vec![];
        let students = vec![];
        let inventory = Inventory::new(&courses, &teachers, &rooms, &enrollments, &students);

        let conflicts = detect_all(&schedule, &inventory);
        let hits: Vec<_> = conflicts
            .iter()
            .filter(|c| c.kind == ConflictType::MissingLunchBreak)
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].severity, Severity::Medium);
    }

    #[test]
    fn refresh_is_idempotent() {
        let c = course("c1", "Math", 32, 32);
        let t = teacher("t1");
        let r = room("r1", 30);
        let s = slot("sl1", "c1", "t1", "r1", 9, 10);
        let schedule = Schedule {
            id: ScheduleId("s1".into()),
            name: "S".into(),
            status: ScheduleStatus::Review,
            slots: vec![s],
            score: 0.0,
        };
        let courses = vec![c];
        let teachers = vec![t];
        let rooms = vec![r];
        let enrollments = vec![];
        let students = vec![];
        let inventory = Inventory::new(&courses, &teachers, &rooms, &enrollments, &students);

        let mut store = ConflictStore::new();
        let first = store.refresh(&schedule, &inventory).to_vec();
        let second = store.refresh(&schedule, &inventory).to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn incremental_oracle_is_subset_of_batch_for_the_candidate_slot() {
        let c1 = course("c1", "Math", 10, 30);
        let c2 = course("c2", "Math", 10, 30);
        let t = teacher("t1");
        let r1 = room("r1", 30);
        let existing = slot("sl1", "c1", "t1", "r1", 9, 10);
        let candidate = slot("sl2", "c2", "t1", "r1", 9, 10);

        let schedule = Schedule {
            id: ScheduleId("s1".into()),
            name: "S".into(),
            status: ScheduleStatus::InProgress,
            slots: vec![existing],
            score: 0.0,
        };
        let courses = vec![c1, c2];
        let teachers = vec![t];
        let rooms = vec![r1];
        let enrollments = vec![];
        let students = vec![];
        let inventory = Inventory::new(&courses, &teachers, &rooms, &enrollments, &students);

        let potential = detect_potential(&schedule, &candidate, &inventory);

        let mut with_candidate = schedule.clone();
        with_candidate.slots.push(candidate.clone());
        let batch = detect_all(&with_candidate, &inventory);
        let batch_for_candidate: Vec<_> = batch
            .iter()
            .filter(|c| c.slot_ids.contains(&candidate.id))
            .collect();

        assert!(!potential.is_empty());
        for p in &potential {
            assert!(batch_for_candidate.iter().any(|b| b.kind == p.kind));
        }
    }
}
