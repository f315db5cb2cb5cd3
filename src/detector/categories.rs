//! The thirteen detection passes (spec.md §4.3). Each takes the slots under
//! consideration plus an `Inventory` lookup and returns conflicts with a
//! placeholder id — `stamp_ids` in `mod.rs` assigns the final, stable ids.

use std::collections::HashMap;

use crate::types::{Conflict, ConflictId, ConflictType, RoomType, ScheduleId, ScheduleSlot, Severity, TeacherId};

use super::{subject_matches_department, Inventory};

pub const PREFERRED_BREAK_MINUTES: i32 = 15;
const LUNCH_WINDOW_START_MINUTES: u16 = 11 * 60;
const LUNCH_WINDOW_END_MINUTES: u16 = 13 * 60;
const LUNCH_GAP_MINUTES: i32 = 30;
const LUNCH_TRIGGER_PERIOD_COUNT: usize = 5;
const DEFAULT_MAX_CONSECUTIVE: u8 = 4;
const PREP_PERIOD_TRIGGER_COUNT: usize = 7;

fn placeholder() -> ConflictId {
    ConflictId(String::new())
}

fn conflict(kind: ConflictType, severity: Severity, description: String) -> Conflict {
    Conflict {
        id: placeholder(),
        schedule_id: ScheduleId(String::new()),
        kind,
        severity,
        slot_ids: Vec::new(),
        teacher_ids: Vec::new(),
        room_ids: Vec::new(),
        course_ids: Vec::new(),
        description,
    }
}

/// Category 1: same-teacher and same-room overlap within a day.
pub fn teacher_and_room_overlap(slots: &[ScheduleSlot], inventory: &Inventory) -> Vec<Conflict> {
    let mut out = Vec::new();

    for i in 0..slots.len() {
        for j in (i + 1)..slots.len() {
            let (a, b) = (&slots[i], &slots[j]);
            if !a.overlaps(b) {
                continue;
            }

            if a.same_teacher(b) {
                let mut c = conflict(
                    ConflictType::TeacherOverlap,
                    Severity::Critical,
                    format!(
                        "Teacher {} double-booked on {} between {} and {}",
                        a.teacher_id.as_ref().unwrap(),
                        a.day_of_week,
                        a.start_time,
                        a.end_time
                    ),
                );
                c.slot_ids = vec![a.id.clone(), b.id.clone()];
                c.teacher_ids = vec![a.teacher_id.clone().unwrap()];
                out.push(c);
            }

            if a.same_room(b) {
                let room = a.room_id.as_ref().and_then(|id| inventory.rooms.get(id));
                let sharing_ok = room.is_some_and(|r| r.allow_sharing && r.max_concurrent_classes > 1);
                if !sharing_ok {
                    let mut c = conflict(
                        ConflictType::RoomDoubleBooking,
                        Severity::Critical,
                        format!(
                            "Room {} double-booked on {} between {} and {}",
                            a.room_id.as_ref().unwrap(),
                            a.day_of_week,
                            a.start_time,
                            a.end_time
                        ),
                    );
                    c.slot_ids = vec![a.id.clone(), b.id.clone()];
                    c.room_ids = vec![a.room_id.clone().unwrap()];
                    out.push(c);
                }
            }
        }
    }

    out
}

fn slots_by_teacher_and_day(slots: &[ScheduleSlot]) -> HashMap<(TeacherId, crate::types::Weekday), Vec<&ScheduleSlot>> {
    let mut map: HashMap<(TeacherId, crate::types::Weekday), Vec<&ScheduleSlot>> = HashMap::new();
    for slot in slots {
        if let Some(teacher_id) = &slot.teacher_id {
            map.entry((teacher_id.clone(), slot.day_of_week)).or_default().push(slot);
        }
    }
    for group in map.values_mut() {
        group.sort_by_key(|s| s.start_time);
    }
    map
}

/// Category 2: periods that truly touch (no passing time at all) between
/// the same teacher's consecutive periods on a day. This is narrower than
/// "gap under `PREFERRED_BREAK_MINUTES`" — the routine few-minute passing
/// period between ordinary periods is not itself a conflict.
pub fn back_to_back_without_break(slots: &[ScheduleSlot]) -> Vec<Conflict> {
    let mut out = Vec::new();
    for ((teacher_id, day), group) in slots_by_teacher_and_day(slots) {
        for pair in group.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let gap = a.time_slot().gap_minutes(&b.time_slot());
            if gap == Some(0) {
                let mut c = conflict(
                    ConflictType::BackToBackNoBreak,
                    Severity::Low,
                    format!(
                        "Teacher {teacher_id} has back-to-back periods with no break on {day} at {}",
                        a.end_time
                    ),
                );
                c.slot_ids = vec![a.id.clone(), b.id.clone()];
                c.teacher_ids = vec![teacher_id.clone()];
                out.push(c);
            }
        }
    }
    out
}

/// Category 3: ≥5 periods in a day with no ≥30-minute gap inside [11:00,13:00].
pub fn missing_lunch_break(slots: &[ScheduleSlot]) -> Vec<Conflict> {
    let mut out = Vec::new();
    for ((teacher_id, day), group) in slots_by_teacher_and_day(slots) {
        if group.len() < LUNCH_TRIGGER_PERIOD_COUNT {
            continue;
        }

        let has_lunch_gap = group.windows(2).any(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let gap_start = a.end_time.0.max(LUNCH_WINDOW_START_MINUTES);
            let gap_end = b.start_time.0.min(LUNCH_WINDOW_END_MINUTES);
            gap_end > gap_start && (gap_end - gap_start) as i32 >= LUNCH_GAP_MINUTES
        });

        if !has_lunch_gap {
            let mut c = conflict(
                ConflictType::MissingLunchBreak,
                Severity::Medium,
                format!("Teacher {teacher_id} has no lunch break on {day}"),
            );
            c.teacher_ids = vec![teacher_id];
            c.slot_ids = group.iter().map(|s| s.id.clone()).collect();
            out.push(c);
        }
    }
    out
}

/// Category 4: more than `maxConsecutive` touching periods in a row.
pub fn excessive_consecutive(slots: &[ScheduleSlot]) -> Vec<Conflict> {
    let mut out = Vec::new();
    for ((teacher_id, day), group) in slots_by_teacher_and_day(slots) {
        let mut run: Vec<&ScheduleSlot> = Vec::new();
        let mut flush = |run: &mut Vec<&ScheduleSlot>, out: &mut Vec<Conflict>| {
            if run.len() as u8 > DEFAULT_MAX_CONSECUTIVE {
                let mut c = conflict(
                    ConflictType::ExcessiveConsecutive,
                    Severity::Medium,
                    format!(
                        "Teacher {teacher_id} has {} consecutive periods on {day}, exceeding the configured maximum",
                        run.len()
                    ),
                );
                c.teacher_ids = vec![teacher_id.clone()];
                c.slot_ids = run.iter().map(|s| s.id.clone()).collect();
                out.push(c);
            }
            run.clear();
        };

        for slot in &group {
            match run.last() {
                Some(prev) if prev.end_time == slot.start_time => run.push(slot),
                _ => {
                    flush(&mut run, &mut out);
                    run.push(slot);
                }
            }
        }
        flush(&mut run, &mut out);
    }
    out
}

/// Category 5: active enrollment on the slot exceeds room capacity.
pub fn room_capacity_exceeded(slots: &[ScheduleSlot], inventory: &Inventory) -> Vec<Conflict> {
    let mut out = Vec::new();
    for slot in slots {
        let Some(room) = slot.room_id.as_ref().and_then(|id| inventory.rooms.get(id)) else {
            continue;
        };
        let Some(course) = inventory.courses.get(&slot.course_id) else {
            continue;
        };

        if course.enrollment > room.effective_max_capacity() {
            let mut c = conflict(
                ConflictType::RoomCapacityExceeded,
                Severity::High,
                format!(
                    "Course '{}' enrollment {} exceeds room {} capacity {}",
                    course.code, course.enrollment, room.number, room.capacity
                ),
            );
            c.slot_ids = vec![slot.id.clone()];
            c.room_ids = vec![room.id.clone()];
            c.course_ids = vec![course.id.clone()];
            out.push(c);
        }
    }
    out
}

const HEURISTIC_SUBJECT_ROOM_TYPES: &[(&str, &[RoomType])] = &[
    ("science", &[RoomType::ScienceLab, RoomType::StemLab]),
    ("computer", &[RoomType::ComputerLab]),
    ("art", &[RoomType::ArtStudio]),
    ("music", &[RoomType::MusicRoom, RoomType::BandRoom, RoomType::ChorusRoom]),
    ("pe", &[RoomType::Gymnasium]),
    ("drama", &[RoomType::Theater]),
    ("culinary", &[RoomType::CulinaryLab]),
];

/// Category 6: lab requirement unmet (MEDIUM), or a heuristic subject/room-type mismatch (LOW).
pub fn room_type_mismatch(slots: &[ScheduleSlot], inventory: &Inventory) -> Vec<Conflict> {
    let mut out = Vec::new();
    for slot in slots {
        let Some(room) = slot.room_id.as_ref().and_then(|id| inventory.rooms.get(id)) else {
            continue;
        };
        let Some(course) = inventory.courses.get(&slot.course_id) else {
            continue;
        };

        if course.requires_lab && !room.room_type.is_lab_type() {
            let mut c = conflict(
                ConflictType::RoomTypeMismatch,
                Severity::Medium,
                format!(
                    "Course '{}' requires a lab but is placed in {:?} room {}",
                    course.code, room.room_type, room.number
                ),
            );
            c.slot_ids = vec![slot.id.clone()];
            c.room_ids = vec![room.id.clone()];
            c.course_ids = vec![course.id.clone()];
            out.push(c);
            continue;
        }

        let subject_lower = course.subject.to_lowercase();
        if let Some((_, expected_types)) = HEURISTIC_SUBJECT_ROOM_TYPES
            .iter()
            .find(|(keyword, _)| subject_lower.contains(keyword))
        {
            if !expected_types.contains(&room.room_type) {
                let mut c = conflict(
                    ConflictType::RoomTypeMismatch,
                    Severity::Low,
                    format!(
                        "Course '{}' ({}) placed in {:?} room {}, expected one of {:?}",
                        course.code, course.subject, room.room_type, room.number, expected_types
                    ),
                );
                c.slot_ids = vec![slot.id.clone()];
                c.room_ids = vec![room.id.clone()];
                c.course_ids = vec![course.id.clone()];
                out.push(c);
            }
        }
    }
    out
}

/// Category 7: periods per day per teacher above `maxPeriodsPerDay`.
pub fn teacher_overload(slots: &[ScheduleSlot], inventory: &Inventory) -> Vec<Conflict> {
    let mut out = Vec::new();
    for ((teacher_id, day), group) in slots_by_teacher_and_day(slots) {
        let Some(teacher) = inventory.teachers.get(&teacher_id) else {
            continue;
        };
        if group.len() as u8 > teacher.max_periods_per_day {
            let mut c = conflict(
                ConflictType::TeacherOverload,
                Severity::High,
                format!(
                    "Teacher {} has {} periods on {day}, exceeding max {}",
                    teacher.name,
                    group.len(),
                    teacher.max_periods_per_day
                ),
            );
            c.teacher_ids = vec![teacher_id];
            c.slot_ids = group.iter().map(|s| s.id.clone()).collect();
            out.push(c);
        }
    }
    out
}

/// Category 8: ≥7 teaching periods in a day with no non-teaching slot. With
/// no explicit "free period" concept on `ScheduleSlot`, a non-teaching slot
/// is inferred from the teacher's declared planning period falling inside
/// the day's occupied span.
pub fn missing_preparation_period(slots: &[ScheduleSlot], inventory: &Inventory) -> Vec<Conflict> {
    let mut out = Vec::new();
    for ((teacher_id, day), group) in slots_by_teacher_and_day(slots) {
        if group.len() < PREP_PERIOD_TRIGGER_COUNT {
            continue;
        }
        let Some(teacher) = inventory.teachers.get(&teacher_id) else {
            continue;
        };

        let has_planning_slot = teacher
            .planning_period
            .as_ref()
            .is_some_and(|p| p.day == day);

        if !has_planning_slot {
            let mut c = conflict(
                ConflictType::MissingPreparationPeriod,
                Severity::Medium,
                format!(
                    "Teacher {} has {} teaching periods on {day} with no preparation period",
                    teacher.name,
                    group.len()
                ),
            );
            c.teacher_ids = vec![teacher_id];
            c.slot_ids = group.iter().map(|s| s.id.clone()).collect();
            out.push(c);
        }
    }
    out
}

/// Category 9: teacher department shares no family keyword with the course subject.
pub fn subject_mismatch(slots: &[ScheduleSlot], inventory: &Inventory) -> Vec<Conflict> {
    let mut out = Vec::new();
    for slot in slots {
        let Some(teacher_id) = &slot.teacher_id else { continue };
        let Some(teacher) = inventory.teachers.get(teacher_id) else { continue };
        let Some(course) = inventory.courses.get(&slot.course_id) else { continue };

        if !subject_matches_department(&teacher.department, &course.subject) {
            let mut c = conflict(
                ConflictType::SubjectMismatch,
                Severity::Low,
                format!(
                    "Teacher {} (dept '{}') assigned to '{}' subject course '{}'",
                    teacher.name, teacher.department, course.subject, course.code
                ),
            );
            c.slot_ids = vec![slot.id.clone()];
            c.teacher_ids = vec![teacher_id.clone()];
            c.course_ids = vec![course.id.clone()];
            out.push(c);
        }
    }
    out
}

/// Category 10: consecutive touching slots of the same teacher in different buildings.
pub fn building_travel_time(slots: &[ScheduleSlot], inventory: &Inventory) -> Vec<Conflict> {
    let mut out = Vec::new();
    for ((teacher_id, day), group) in slots_by_teacher_and_day(slots) {
        for pair in group.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.end_time != b.start_time {
                continue;
            }
            let buildings = (
                a.room_id.as_ref().and_then(|id| inventory.rooms.get(id)).map(|r| &r.building),
                b.room_id.as_ref().and_then(|id| inventory.rooms.get(id)).map(|r| &r.building),
            );
            if let (Some(building_a), Some(building_b)) = buildings {
                if building_a != building_b {
                    let mut c = conflict(
                        ConflictType::BuildingTravelTime,
                        Severity::Low,
                        format!(
                            "Teacher {teacher_id} moves from {building_a} to {building_b} with no passing time on {day}"
                        ),
                    );
                    c.slot_ids = vec![a.id.clone(), b.id.clone()];
                    c.teacher_ids = vec![teacher_id.clone()];
                    out.push(c);
                }
            }
        }
    }
    out
}

/// Category 11: overlapping slots for the same student across active enrollments.
pub fn student_schedule_conflicts(slots: &[ScheduleSlot], inventory: &Inventory) -> Vec<Conflict> {
    let mut out = Vec::new();
    let slots_by_course: HashMap<_, Vec<&ScheduleSlot>> = {
        let mut map: HashMap<_, Vec<&ScheduleSlot>> = HashMap::new();
        for slot in slots {
            map.entry(slot.course_id.clone()).or_default().push(slot);
        }
        map
    };

    let mut by_student: HashMap<&crate::types::StudentId, Vec<&ScheduleSlot>> = HashMap::new();
    for enrollment in inventory.enrollments.iter().filter(|e| e.active) {
        if let Some(course_slots) = slots_by_course.get(&enrollment.course_id) {
            by_student
                .entry(&enrollment.student_id)
                .or_default()
                .extend(course_slots.iter().copied());
        }
    }

    for (student_id, student_slots) in by_student {
        for i in 0..student_slots.len() {
            for j in (i + 1)..student_slots.len() {
                let (a, b) = (student_slots[i], student_slots[j]);
                if a.id != b.id && a.overlaps(b) {
                    let mut c = conflict(
                        ConflictType::StudentOverlap,
                        Severity::Critical,
                        format!("Student {student_id} has overlapping classes on {}", a.day_of_week),
                    );
                    c.slot_ids = vec![a.id.clone(), b.id.clone()];
                    out.push(c);
                }
            }
        }
    }
    out
}

/// Category 12: active enrollment vs `maxStudents`/`minEnrollment`.
pub fn section_enrollment(inventory: &Inventory) -> Vec<Conflict> {
    let mut out = Vec::new();
    for course in inventory.courses.values() {
        if !course.active {
            continue;
        }
        if course.enrollment > course.max_students {
            let mut c = conflict(
                ConflictType::SectionOverEnrolled,
                Severity::High,
                format!(
                    "Course '{}' enrollment {} exceeds max {}",
                    course.code, course.enrollment, course.max_students
                ),
            );
            c.course_ids = vec![course.id.clone()];
            out.push(c);
        } else if course.enrollment < course.min_enrollment {
            let mut c = conflict(
                ConflictType::SectionUnderEnrolled,
                Severity::Medium,
                format!(
                    "Course '{}' enrollment {} is below minimum {}",
                    course.code, course.enrollment, course.min_enrollment
                ),
            );
            c.course_ids = vec![course.id.clone()];
            out.push(c);
        }
    }
    out
}

/// Category 13: the same (student, course) pair appears in more than one active enrollment.
pub fn duplicate_enrollments(inventory: &Inventory) -> Vec<Conflict> {
    let mut counts: HashMap<(crate::types::StudentId, crate::types::CourseId), u32> = HashMap::new();
    for e in inventory.enrollments.iter().filter(|e| e.active) {
        *counts.entry((e.student_id.clone(), e.course_id.clone())).or_insert(0) += 1;
    }

    let mut out = Vec::new();
    for ((student_id, course_id), count) in counts {
        if count > 1 {
            let mut c = conflict(
                ConflictType::DuplicateEnrollment,
                Severity::High,
                format!("Student {student_id} has {count} active enrollments in course {course_id}"),
            );
            c.course_ids = vec![course_id];
            out.push(c);
        }
    }
    out
}
