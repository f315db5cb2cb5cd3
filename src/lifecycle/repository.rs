//! Repository contract (spec.md §6): storage exposes CRUD plus the small
//! set of compound queries the core actually needs. The in-memory
//! implementation backs tests and the CLI demo; a real deployment swaps in
//! a database-backed adapter behind the same trait.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Result, SchedulerError};
use crate::types::{
    Conflict, Course, CourseId, Enrollment, Room, Schedule, ScheduleId, ScheduleSlot, SlotId,
    Student, Teacher,
};

pub trait ScheduleRepository: Send + Sync {
    fn list_active_teachers(&self) -> Vec<Teacher>;
    fn list_active_courses(&self) -> Vec<Course>;
    fn list_active_rooms(&self) -> Vec<Room>;
    fn list_students(&self) -> Vec<Student>;

    fn find_schedule(&self, id: &ScheduleId) -> Option<Schedule>;
    fn find_schedule_slots_by_schedule_id(&self, id: &ScheduleId) -> Vec<ScheduleSlot>;
    fn find_enrollments_by_schedule_id(&self, id: &ScheduleId) -> Vec<Enrollment>;
    fn find_enrollments_by_slot_id(&self, slot_id: &SlotId) -> Vec<Enrollment>;

    fn find_conflicts_by_schedule(&self, id: &ScheduleId) -> Vec<Conflict>;
    fn save_conflicts(&self, id: &ScheduleId, conflicts: Vec<Conflict>);
    fn delete_conflicts_by_schedule(&self, id: &ScheduleId);
    fn count_active_by_schedule(&self, id: &ScheduleId) -> usize;

    fn save_schedule(&self, schedule: Schedule) -> Result<()>;
    fn delete_schedule(&self, id: &ScheduleId) -> Result<()>;
}

struct ScheduleRecord {
    schedule: Schedule,
    conflicts: Vec<Conflict>,
}

/// Thread-safe in-memory reference implementation. Course-to-enrollment and
/// slot-to-enrollment lookups join through `course_id`, since `Enrollment`
/// (spec.md §3) only ever records student-to-course membership.
pub struct InMemoryScheduleRepository {
    teachers: RwLock<Vec<Teacher>>,
    courses: RwLock<Vec<Course>>,
    rooms: RwLock<Vec<Room>>,
    students: RwLock<Vec<Student>>,
    enrollments: RwLock<Vec<Enrollment>>,
    schedules: RwLock<HashMap<ScheduleId, ScheduleRecord>>,
}

impl InMemoryScheduleRepository {
    pub fn new(
        teachers: Vec<Teacher>,
        courses: Vec<Course>,
        rooms: Vec<Room>,
        students: Vec<Student>,
        enrollments: Vec<Enrollment>,
    ) -> Self {
        Self {
            teachers: RwLock::new(teachers),
            courses: RwLock::new(courses),
            rooms: RwLock::new(rooms),
            students: RwLock::new(students),
            enrollments: RwLock::new(enrollments),
            schedules: RwLock::new(HashMap::new()),
        }
    }

    fn course_ids_in_schedule(&self, id: &ScheduleId) -> Vec<CourseId> {
        self.schedules
            .read()
            .unwrap()
            .get(id)
            .map(|r| r.schedule.slots.iter().map(|s| s.course_id.clone()).collect())
            .unwrap_or_default()
    }
}

impl ScheduleRepository for InMemoryScheduleRepository {
    fn list_active_teachers(&self) -> Vec<Teacher> {
        self.teachers.read().unwrap().clone()
    }

    fn list_active_courses(&self) -> Vec<Course> {
        self.courses.read().unwrap().iter().filter(|c| c.active).cloned().collect()
    }

    fn list_active_rooms(&self) -> Vec<Room> {
        self.rooms.read().unwrap().iter().filter(|r| r.available).cloned().collect()
    }

    fn list_students(&self) -> Vec<Student> {
        self.students.read().unwrap().clone()
    }

    fn find_schedule(&self, id: &ScheduleId) -> Option<Schedule> {
        self.schedules.read().unwrap().get(id).map(|r| r.schedule.clone())
    }

    fn find_schedule_slots_by_schedule_id(&self, id: &ScheduleId) -> Vec<ScheduleSlot> {
        self.schedules
            .read()
            .unwrap()
            .get(id)
            .map(|r| r.schedule.slots.clone())
            .unwrap_or_default()
    }

    fn find_enrollments_by_schedule_id(&self, id: &ScheduleId) -> Vec<Enrollment> {
        let course_ids = self.course_ids_in_schedule(id);
        self.enrollments
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.active && course_ids.contains(&e.course_id))
            .cloned()
            .collect()
    }

    fn find_enrollments_by_slot_id(&self, slot_id: &SlotId) -> Vec<Enrollment> {
        let schedules = self.schedules.read().unwrap();
        let course_id = schedules
            .values()
            .flat_map(|r| r.schedule.slots.iter())
            .find(|s| &s.id == slot_id)
            .map(|s| s.course_id.clone());
        drop(schedules);

        match course_id {
            Some(cid) => self
                .enrollments
                .read()
                .unwrap()
                .iter()
                .filter(|e| e.active && e.course_id == cid)
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    fn find_conflicts_by_schedule(&self, id: &ScheduleId) -> Vec<Conflict> {
        self.schedules
            .read()
            .unwrap()
            .get(id)
            .map(|r| r.conflicts.clone())
            .unwrap_or_default()
    }

    fn save_conflicts(&self, id: &ScheduleId, conflicts: Vec<Conflict>) {
        if let Some(record) = self.schedules.write().unwrap().get_mut(id) {
            record.conflicts = conflicts;
        }
    }

    fn delete_conflicts_by_schedule(&self, id: &ScheduleId) {
        if let Some(record) = self.schedules.write().unwrap().get_mut(id) {
            record.conflicts.clear();
        }
    }

    fn count_active_by_schedule(&self, id: &ScheduleId) -> usize {
        self.find_conflicts_by_schedule(id).len()
    }

    fn save_schedule(&self, schedule: Schedule) -> Result<()> {
        let mut schedules = self.schedules.write().unwrap();
        let conflicts = schedules.get(&schedule.id).map(|r| r.conflicts.clone()).unwrap_or_default();
        schedules.insert(schedule.id.clone(), ScheduleRecord { schedule, conflicts });
        Ok(())
    }

    fn delete_schedule(&self, id: &ScheduleId) -> Result<()> {
        let mut schedules = self.schedules.write().unwrap();
        if schedules.remove(id).is_none() {
            return Err(SchedulerError::ScheduleNotFound(id.0.clone()));
        }
        Ok(())
    }
}
