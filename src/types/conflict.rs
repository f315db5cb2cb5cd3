use serde::{Deserialize, Serialize};

use super::{ConflictId, CourseId, RoomId, ScheduleId, SlotId, TeacherId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn blocks_publication(&self) -> bool {
        matches!(self, Severity::Critical)
    }
}

/// Every detector category (spec.md §4.3) maps to exactly one of these, plus
/// the feasibility-analyzer-only variants used by C2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictType {
    TeacherOverlap,
    RoomDoubleBooking,
    StudentOverlap,
    BackToBackNoBreak,
    MissingLunchBreak,
    ExcessiveConsecutive,
    RoomCapacityExceeded,
    RoomTypeMismatch,
    TeacherOverload,
    MissingPreparationPeriod,
    SubjectMismatch,
    BuildingTravelTime,
    SectionOverEnrolled,
    SectionUnderEnrolled,
    DuplicateEnrollment,
    // Feasibility-analyzer-only categories (C2, not produced by C4).
    NoTeacher,
    NoRoom,
    RoomCapacityShortfall,
    TeacherOverloadRisk,
    RoomTypeMismatchRisk,
    SchedulingConflictRisk,
    InsufficientRooms,
}

/// A single violation attached to a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub id: ConflictId,
    pub schedule_id: ScheduleId,
    pub kind: ConflictType,
    pub severity: Severity,
    #[serde(default)]
    pub slot_ids: Vec<SlotId>,
    #[serde(default)]
    pub teacher_ids: Vec<TeacherId>,
    #[serde(default)]
    pub room_ids: Vec<RoomId>,
    #[serde(default)]
    pub course_ids: Vec<CourseId>,
    pub description: String,
}

impl Conflict {
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}
