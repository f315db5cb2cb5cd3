//! Hard-constraint violation counting and soft-penalty scoring shared by the
//! three search strategies (spec.md §4.4). Hard violations push the score to
//! infinity in the solver's eyes (they're tracked separately so the search
//! can still gradient-descend toward feasibility); soft penalties are the
//! weighted objective once feasible.

use std::collections::HashMap;

use crate::detector::Inventory;
use crate::types::{ScheduleSlot, SchedulerConfiguration, TeacherId, Weekday};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Score {
    pub hard_violations: u32,
    pub soft_penalty: f64,
}

impl Score {
    pub fn is_feasible(&self) -> bool {
        self.hard_violations == 0
    }

    /// Total ordering used to compare candidate states: violation count
    /// dominates so the search can always gradient-descend toward
    /// feasibility, soft penalty only breaks ties once feasible.
    pub fn total(&self) -> f64 {
        if self.hard_violations > 0 {
            self.hard_violations as f64 * 1e12 + self.soft_penalty
        } else {
            self.soft_penalty
        }
    }
}

fn group_by_teacher_day(slots: &[ScheduleSlot]) -> HashMap<(TeacherId, Weekday), Vec<&ScheduleSlot>> {
    let mut map: HashMap<(TeacherId, Weekday), Vec<&ScheduleSlot>> = HashMap::new();
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

/// Count every hard-constraint violation across the whole slot set: teacher
/// double-booking, room double-booking (respecting sharing), student
/// double-booking, room capacity, lab/room-type requirement, and teacher
/// subject certification.
pub fn hard_violations(slots: &[ScheduleSlot], inventory: &Inventory) -> u32 {
    let mut count = 0;

    for i in 0..slots.len() {
        for j in (i + 1)..slots.len() {
            let (a, b) = (&slots[i], &slots[j]);
            if !a.overlaps(b) {
                continue;
            }
            if a.same_teacher(b) {
                count += 1;
            }
            if a.same_room(b) {
                let sharing_ok = a
                    .room_id
                    .as_ref()
                    .and_then(|id| inventory.rooms.get(id))
                    .is_some_and(|r| r.allow_sharing && r.max_concurrent_classes > 1);
                if !sharing_ok {
                    count += 1;
                }
            }
        }
    }

    count += student_overlap_count(slots, inventory);

    for slot in slots {
        let Some(course) = inventory.courses.get(&slot.course_id) else { continue };

        if let Some(room) = slot.room_id.as_ref().and_then(|id| inventory.rooms.get(id)) {
            if course.enrollment > room.effective_max_capacity() {
                count += 1;
            }
            if course.requires_lab && !room.room_type.is_lab_type() {
                count += 1;
            }
            if let Some(required) = course.required_room_type {
                if required != room.room_type {
                    count += 1;
                }
            }
        }

        if let Some(teacher_id) = &slot.teacher_id {
            if let Some(teacher) = inventory.teachers.get(teacher_id) {
                let certified = teacher
                    .certifications
                    .iter()
                    .any(|cert| crate::families::certification_match(cert, &course.subject) != crate::families::CertificationMatch::None);
                if !certified {
                    count += 1;
                }
            }
        }
    }

    count
}

fn student_overlap_count(slots: &[ScheduleSlot], inventory: &Inventory) -> u32 {
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
            by_student.entry(&enrollment.student_id).or_default().extend(course_slots.iter().copied());
        }
    }

    let mut count = 0;
    for slots in by_student.values() {
        for i in 0..slots.len() {
            for j in (i + 1)..slots.len() {
                if slots[i].id != slots[j].id && slots[i].overlaps(slots[j]) {
                    count += 1;
                }
            }
        }
    }
    count
}

/// Weighted sum of soft objectives (spec.md §4.4). Lower is better.
pub fn soft_penalty(slots: &[ScheduleSlot], inventory: &Inventory, config: &SchedulerConfiguration) -> f64 {
    let weights = config.weights;
    let mut penalty = 0.0;

    penalty += weights.teacher_workload_balance * teacher_workload_variance(slots);
    penalty += weights.minimize_student_gaps * student_gap_minutes(slots, inventory) as f64 / 60.0;
    penalty += weights.lunch_break_preference * missing_lunch_breaks(slots) as f64;
    penalty += weights.minimize_building_moves * cross_building_moves(slots, inventory) as f64;
    penalty += weights.mid_morning_difficult_courses * misplaced_difficult_courses(slots, inventory) as f64;
    penalty += weights.group_related_subjects * ungrouped_sequence_members(slots, inventory) as f64;
    penalty += weights.honor_preferences * preference_violations(slots, inventory) as f64;

    penalty
}

fn teacher_workload_variance(slots: &[ScheduleSlot]) -> f64 {
    let mut counts: HashMap<&TeacherId, u32> = HashMap::new();
    for slot in slots {
        if let Some(t) = &slot.teacher_id {
            *counts.entry(t).or_insert(0) += 1;
        }
    }
    if counts.len() < 2 {
        return 0.0;
    }
    let values: Vec<f64> = counts.values().map(|&v| v as f64).collect();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

fn student_gap_minutes(slots: &[ScheduleSlot], inventory: &Inventory) -> u32 {
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
            by_student.entry(&enrollment.student_id).or_default().extend(course_slots.iter().copied());
        }
    }

    let mut total = 0u32;
    for student_slots in by_student.values() {
        let mut by_day: HashMap<Weekday, Vec<&ScheduleSlot>> = HashMap::new();
        for s in student_slots {
            by_day.entry(s.day_of_week).or_default().push(s);
        }
        for group in by_day.values_mut() {
            group.sort_by_key(|s| s.start_time);
            for pair in group.windows(2) {
                if let Some(gap) = pair[0].time_slot().gap_minutes(&pair[1].time_slot()) {
                    total += gap.max(0) as u32;
                }
            }
        }
    }
    total
}

fn missing_lunch_breaks(slots: &[ScheduleSlot]) -> u32 {
    const LUNCH_START: u16 = 11 * 60;
    const LUNCH_END: u16 = 13 * 60;
    const LUNCH_GAP: i32 = 30;

    let mut violations = 0;
    for ((_, _), group) in group_by_teacher_day(slots) {
        if group.len() < 5 {
            continue;
        }
        let has_gap = group.windows(2).any(|pair| {
            let gap_start = pair[0].end_time.0.max(LUNCH_START);
            let gap_end = pair[1].start_time.0.min(LUNCH_END);
            gap_end > gap_start && (gap_end - gap_start) as i32 >= LUNCH_GAP
        });
        if !has_gap {
            violations += 1;
        }
    }
    violations
}

fn cross_building_moves(slots: &[ScheduleSlot], inventory: &Inventory) -> u32 {
    let mut moves = 0;
    for ((_, _), group) in group_by_teacher_day(slots) {
        for pair in group.windows(2) {
            if pair[0].end_time != pair[1].start_time {
                continue;
            }
            let buildings = (
                pair[0].room_id.as_ref().and_then(|id| inventory.rooms.get(id)).map(|r| &r.building),
                pair[1].room_id.as_ref().and_then(|id| inventory.rooms.get(id)).map(|r| &r.building),
            );
            if let (Some(a), Some(b)) = buildings {
                if a != b {
                    moves += 1;
                }
            }
        }
    }
    moves
}

/// Courses at `level()` 80+ (Honors/Advanced/AP) placed outside the
/// mid-morning band (09:00-11:00) accrue a small penalty.
fn misplaced_difficult_courses(slots: &[ScheduleSlot], inventory: &Inventory) -> u32 {
    const MID_MORNING_START: u16 = 9 * 60;
    const MID_MORNING_END: u16 = 11 * 60;

    slots
        .iter()
        .filter(|slot| {
            inventory
                .courses
                .get(&slot.course_id)
                .is_some_and(|c| c.level() >= 80)
        })
        .filter(|slot| !(slot.start_time.0 >= MID_MORNING_START && slot.end_time.0 <= MID_MORNING_END))
        .count() as u32
}

/// Courses with a preferred room set (`Course.room_id`, e.g. an operator
/// pinning a science course to its home lab) that landed somewhere else.
/// Teacher preference has no separate term: `course.teacher_id` is already
/// honored as a hard binding by `greedy::candidate_teacher`, and no search
/// move ever reassigns a slot's teacher away from it (see DESIGN.md).
fn preference_violations(slots: &[ScheduleSlot], inventory: &Inventory) -> u32 {
    slots
        .iter()
        .filter(|slot| {
            inventory
                .courses
                .get(&slot.course_id)
                .and_then(|c| c.room_id.as_ref())
                .is_some_and(|preferred| slot.room_id.as_ref() != Some(preferred))
        })
        .count() as u32
}

/// Sequence members (e.g. "English 9"/"English 10") placed on different days
/// accrue a small penalty; grouping adjacent sections is a soft preference.
fn ungrouped_sequence_members(slots: &[ScheduleSlot], inventory: &Inventory) -> u32 {
    let mut by_sequence: HashMap<(String, String), Vec<Weekday>> = HashMap::new();
    for slot in slots {
        if let Some(course) = inventory.courses.get(&slot.course_id) {
            by_sequence.entry(course.sequence_key()).or_default().push(slot.day_of_week);
        }
    }
    by_sequence
        .values()
        .filter(|days| days.len() > 1 && days.iter().collect::<std::collections::HashSet<_>>().len() > 1)
        .count() as u32
}
