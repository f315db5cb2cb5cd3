use serde::{Deserialize, Serialize};

use super::{CourseId, RoomId, ScheduleId, SlotId, TeacherId, TimeSlot, Weekday};
use super::time::ClockTime;

/// One concrete placement: a course's session bound to a day/time, a room,
/// and a teacher, within a specific schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub id: SlotId,
    pub schedule_id: ScheduleId,
    pub course_id: CourseId,
    pub teacher_id: Option<TeacherId>,
    pub room_id: Option<RoomId>,
    pub day_of_week: Weekday,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

impl ScheduleSlot {
    pub fn time_slot(&self) -> TimeSlot {
        TimeSlot::new(self.day_of_week, self.start_time, self.end_time)
    }

    pub fn overlaps(&self, other: &ScheduleSlot) -> bool {
        self.time_slot().overlaps(&other.time_slot())
    }

    pub fn same_teacher(&self, other: &ScheduleSlot) -> bool {
        matches!((&self.teacher_id, &other.teacher_id), (Some(a), Some(b)) if a == b)
    }

    pub fn same_room(&self, other: &ScheduleSlot) -> bool {
        matches!((&self.room_id, &other.room_id), (Some(a), Some(b)) if a == b)
    }

    pub fn is_well_formed(&self) -> bool {
        self.start_time < self.end_time
    }
}
