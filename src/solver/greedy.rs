//! Deterministic greedy seeding (spec.md §4.4 step 1): place the most
//! "critical" sections first, each into the first feasible slot with the
//! lowest marginal penalty as scored by the detector's per-slot oracle.

use std::collections::HashMap;

use crate::detector::{self, Inventory};
use crate::types::{
    ClockTime, Course, Room, Schedule, ScheduleId, ScheduleSlot, SchedulerConfiguration, SlotId,
    Teacher, TeacherId, TimeSlot,
};

use super::cancellation::CancellationToken;
use super::section::{criticality_key, SectionUnit};

fn matching_rooms<'a>(course: &Course, rooms: &'a [Room]) -> Vec<&'a Room> {
    rooms
        .iter()
        .filter(|r| r.schedulable())
        .filter(|r| r.effective_max_capacity() >= course.enrollment)
        .filter(|r| !course.requires_lab || r.room_type.is_lab_type())
        .filter(|r| course.required_room_type.map_or(true, |rt| rt == r.room_type))
        .collect()
}

fn candidate_teacher(
    course: &Course,
    teachers: &[Teacher],
    day: crate::types::Weekday,
    start: ClockTime,
    end: ClockTime,
    placed: &[ScheduleSlot],
) -> Option<TeacherId> {
    if let Some(id) = &course.teacher_id {
        return Some(id.clone());
    }

    let mut load: HashMap<&TeacherId, u32> = HashMap::new();
    for slot in placed {
        if let Some(t) = &slot.teacher_id {
            *load.entry(t).or_insert(0) += 1;
        }
    }

    teachers
        .iter()
        .filter(|t| {
            t.certifications.iter().any(|cert| {
                crate::families::certification_match(cert, &course.subject) != crate::families::CertificationMatch::None
            })
        })
        .filter(|t| {
            let candidate = TimeSlot::new(day, start, end);
            !placed.iter().any(|s| {
                s.teacher_id.as_ref() == Some(&t.id) && s.time_slot().overlaps(&candidate)
            })
        })
        .min_by_key(|t| (load.get(&t.id).copied().unwrap_or(0), t.id.0.clone()))
        .map(|t| t.id.clone())
}

/// Severity-weighted count used to rank candidate placements; any CRITICAL
/// hit disqualifies the candidate outright.
fn marginal_penalty(conflicts: &[crate::types::Conflict]) -> Option<u32> {
    use crate::types::Severity;
    let mut score = 0u32;
    for c in conflicts {
        match c.severity {
            Severity::Critical => return None,
            Severity::High => score += 10,
            Severity::Medium => score += 3,
            Severity::Low => score += 1,
            Severity::Info => {}
        }
    }
    Some(score)
}

pub fn greedy_seed(
    schedule_id: &ScheduleId,
    sections: &[SectionUnit],
    courses: &[Course],
    teachers: &[Teacher],
    rooms: &[Room],
    config: &SchedulerConfiguration,
    inventory: &Inventory,
    cancel: &CancellationToken,
) -> (Vec<ScheduleSlot>, Vec<String>) {
    let course_by_id: HashMap<_, _> = courses.iter().map(|c| (&c.id, c)).collect();
    let candidate_slots = config.candidate_time_slots();

    let mut ordered: Vec<&SectionUnit> = sections.iter().collect();
    ordered.sort_by_key(|s| {
        let course = course_by_id[&s.course_id];
        criticality_key(course, matching_rooms(course, rooms).len())
    });

    let mut placed: Vec<ScheduleSlot> = Vec::new();
    let mut warnings = Vec::new();
    let mut working = Schedule::new(schedule_id.clone(), "seed");

    for section in ordered {
        if cancel.is_cancelled() {
            warnings.push("greedy seeding cancelled before completion".to_string());
            break;
        }

        let course = course_by_id[&section.course_id];
        let rooms_for_course = matching_rooms(course, rooms);
        if rooms_for_course.is_empty() {
            warnings.push(format!("no candidate room for course '{}'", course.code));
            continue;
        }

        let mut best: Option<(u32, ScheduleSlot)> = None;

        for time in &candidate_slots {
            for room in &rooms_for_course {
                let teacher_id = match candidate_teacher(course, teachers, time.day, time.start, time.end, &placed) {
                    Some(t) => t,
                    None => continue,
                };

                let trial = ScheduleSlot {
                    id: SlotId(format!("{}-{}-{}", course.id.0, section.ordinal.0, placed.len())),
                    schedule_id: schedule_id.clone(),
                    course_id: course.id.clone(),
                    teacher_id: Some(teacher_id),
                    room_id: Some(room.id.clone()),
                    day_of_week: time.day,
                    start_time: time.start,
                    end_time: time.end,
                };

                working.slots = placed.clone();
                let conflicts = detector::detect_potential(&working, &trial, inventory);
                if let Some(score) = marginal_penalty(&conflicts) {
                    if best.as_ref().map_or(true, |(best_score, _)| score < *best_score) {
                        best = Some((score, trial));
                        if score == 0 {
                            break;
                        }
                    }
                }
            }
            if best.as_ref().is_some_and(|(score, _)| *score == 0) {
                break;
            }
        }

        match best {
            Some((_, slot)) => placed.push(slot),
            None => warnings.push(format!(
                "could not place a feasible slot for course '{}' section {}",
                course.code, section.ordinal.0
            )),
        }
    }

    (placed, warnings)
}
