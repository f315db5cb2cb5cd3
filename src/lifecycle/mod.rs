//! Lifecycle manager (C6, spec.md §4.5): owns the state machine over
//! `Schedule` and the per-schedule exclusive lock that serializes every
//! mutation (spec.md §5). Nothing outside this module is permitted to
//! change a schedule's status directly.

mod repository;
mod sis;

pub use repository::{InMemoryScheduleRepository, ScheduleRepository};
pub use sis::{SisGateway, StaticSisGateway};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use tracing::{info, warn};

use crate::detector::{self, Inventory};
use crate::error::{Result, SchedulerError};
use crate::solver::{self, CancellationToken};
use crate::types::{
    Schedule, ScheduleId, ScheduleSlot, ScheduleStatus, SchedulerConfiguration, Severity, SlotId,
};

#[derive(Debug, Clone)]
pub struct GenerateScheduleRequest {
    pub schedule_id: ScheduleId,
    pub schedule_name: String,
    pub academic_year: Option<String>,
    pub config: SchedulerConfiguration,
}

#[derive(Debug, Clone)]
pub struct GenerateScheduleResult {
    pub schedule_id: ScheduleId,
    pub status: ScheduleStatus,
    pub summary_score: f64,
    pub severity_counts: HashMap<Severity, usize>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub duration_ms: u128,
}

/// Coordinates C2-C5 against a repository, enforcing the lifecycle state
/// machine and the one-writer-per-schedule locking rule.
pub struct LifecycleManager<R: ScheduleRepository> {
    repo: R,
    locks: Mutex<HashMap<ScheduleId, Arc<RwLock<()>>>>,
}

impl<R: ScheduleRepository> LifecycleManager<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn lock_for(&self, id: &ScheduleId) -> Arc<RwLock<()>> {
        self.locks
            .lock()
            .unwrap()
            .entry(id.clone())
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }

    /// DRAFT -> IN_PROGRESS -> REVIEW. Runs the solver under the per-schedule
    /// lock and persists the resulting slots and a freshly refreshed conflict
    /// set. Per spec.md §7, only `INVALID_INPUT`, `INFEASIBLE_WITHIN_BUDGET`
    /// and `CANCELLED` from the solver escape this call; anything else the
    /// solver reports travels back as a warning and the draft is left
    /// untouched.
    pub fn generate(
        &self,
        request: GenerateScheduleRequest,
        cancel: &CancellationToken,
    ) -> Result<GenerateScheduleResult> {
        let lock = self.lock_for(&request.schedule_id);
        let _guard = lock.write().unwrap();
        let started = Instant::now();

        let mut schedule = Schedule::new(request.schedule_id.clone(), request.schedule_name.clone());
        schedule.status = ScheduleStatus::InProgress;
        self.repo.save_schedule(schedule.clone())?;
        info!(schedule_id = %request.schedule_id, "generation started");

        let courses = self.repo.list_active_courses();
        let teachers = self.repo.list_active_teachers();
        let rooms = self.repo.list_active_rooms();
        let students = self.repo.list_students();
        let enrollments = self.repo.find_enrollments_by_schedule_id(&request.schedule_id);

        let outcome = solver::solve(
            &request.schedule_id,
            &courses,
            &teachers,
            &rooms,
            &enrollments,
            &students,
            &request.config,
            cancel,
        );

        let elapsed = started.elapsed().as_millis();

        let outcome = match outcome {
            Ok(o) => o,
            Err(SchedulerError::Cancelled { partial }) => {
                warn!(schedule_id = %request.schedule_id, "generation cancelled; persisting partial result");
                schedule.slots = partial.clone();
                self.repo.save_schedule(schedule)?;
                return Err(SchedulerError::Cancelled { partial });
            }
            Err(SchedulerError::InfeasibleWithinBudget { blocking_constraint, partial }) => {
                warn!(schedule_id = %request.schedule_id, %blocking_constraint, "generation infeasible within budget; persisting partial result");
                schedule.slots = partial.clone();
                self.repo.save_schedule(schedule)?;
                return Err(SchedulerError::InfeasibleWithinBudget { blocking_constraint, partial });
            }
            Err(err @ SchedulerError::InvalidInput(_)) => {
                warn!(schedule_id = %request.schedule_id, error = %err, "generation failed");
                return Err(err);
            }
            Err(other) => {
                // Everything else is a soft warning (spec.md §7); the draft
                // is left untouched.
                return Ok(GenerateScheduleResult {
                    schedule_id: request.schedule_id,
                    status: ScheduleStatus::InProgress,
                    summary_score: 0.0,
                    severity_counts: HashMap::new(),
                    warnings: vec![other.to_string()],
                    errors: Vec::new(),
                    duration_ms: elapsed,
                });
            }
        };

        schedule.status = ScheduleStatus::Review;
        schedule.slots = outcome.slots;
        schedule.score = outcome.score.soft_penalty;
        self.repo.save_schedule(schedule.clone())?;

        let inventory = Inventory::new(&courses, &teachers, &rooms, &enrollments, &students);
        let conflicts = detector::detect_all(&schedule, &inventory);
        let severity_counts = tally_severities(&conflicts);
        let critical = severity_counts.get(&Severity::Critical).copied().unwrap_or(0);
        self.repo.delete_conflicts_by_schedule(&schedule.id);
        self.repo.save_conflicts(&schedule.id, conflicts);

        info!(schedule_id = %request.schedule_id, critical, "generation complete");

        Ok(GenerateScheduleResult {
            schedule_id: schedule.id,
            status: ScheduleStatus::Review,
            summary_score: schedule.score,
            severity_counts,
            warnings: outcome.warnings,
            errors: Vec::new(),
            duration_ms: elapsed,
        })
    }

    /// REVIEW -> PUBLISHED iff zero CRITICAL conflicts (spec.md §8 scenario 6).
    pub fn publish(&self, id: &ScheduleId) -> Result<()> {
        let lock = self.lock_for(id);
        let _guard = lock.write().unwrap();

        let mut schedule = self
            .repo
            .find_schedule(id)
            .ok_or_else(|| SchedulerError::ScheduleNotFound(id.0.clone()))?;

        if schedule.status.is_terminal() {
            return Err(SchedulerError::ScheduleImmutable(id.0.clone()));
        }
        if schedule.status != ScheduleStatus::Review {
            return Err(SchedulerError::InvalidInput(format!(
                "schedule '{}' must be in REVIEW to publish (is {:?})",
                id.0, schedule.status
            )));
        }

        let critical_count = self
            .repo
            .find_conflicts_by_schedule(id)
            .iter()
            .filter(|c| c.is_critical())
            .count();

        if critical_count > 0 {
            return Err(SchedulerError::ScheduleHasCriticalConflicts {
                schedule_id: id.0.clone(),
                critical_count,
            });
        }

        schedule.status = ScheduleStatus::Published;
        self.repo.save_schedule(schedule)
    }

    /// Any non-ARCHIVED status -> ARCHIVED, directly. ARCHIVED is terminal.
    pub fn archive(&self, id: &ScheduleId) -> Result<()> {
        let lock = self.lock_for(id);
        let _guard = lock.write().unwrap();

        let mut schedule = self
            .repo
            .find_schedule(id)
            .ok_or_else(|| SchedulerError::ScheduleNotFound(id.0.clone()))?;

        if schedule.status.is_terminal() {
            return Ok(());
        }

        schedule.status = ScheduleStatus::Archived;
        self.repo.save_schedule(schedule)
    }

    /// Produces a new DRAFT with deep-copied slots (fresh slot ids) and an
    /// empty conflict set; every other field of every slot is equal to the
    /// source (spec.md §8 clone invariant).
    pub fn clone_schedule(&self, source_id: &ScheduleId, new_id: ScheduleId) -> Result<Schedule> {
        let source = self
            .repo
            .find_schedule(source_id)
            .ok_or_else(|| SchedulerError::ScheduleNotFound(source_id.0.clone()))?;

        let cloned_slots: Vec<ScheduleSlot> = source
            .slots
            .iter()
            .enumerate()
            .map(|(i, s)| ScheduleSlot {
                id: SlotId(format!("{}-clone-{:04}", new_id.0, i)),
                schedule_id: new_id.clone(),
                course_id: s.course_id.clone(),
                teacher_id: s.teacher_id.clone(),
                room_id: s.room_id.clone(),
                day_of_week: s.day_of_week,
                start_time: s.start_time,
                end_time: s.end_time,
            })
            .collect();

        let cloned = Schedule {
            id: new_id.clone(),
            name: format!("{} (copy)", source.name),
            status: ScheduleStatus::Draft,
            slots: cloned_slots,
            score: source.score,
        };

        self.repo.save_schedule(cloned.clone())?;
        self.repo.delete_conflicts_by_schedule(&new_id);
        Ok(cloned)
    }

    /// Allowed only for DRAFT or ARCHIVED schedules; cascades to conflicts.
    pub fn delete(&self, id: &ScheduleId) -> Result<()> {
        let lock = self.lock_for(id);
        let _guard = lock.write().unwrap();

        let schedule = self
            .repo
            .find_schedule(id)
            .ok_or_else(|| SchedulerError::ScheduleNotFound(id.0.clone()))?;

        if !matches!(schedule.status, ScheduleStatus::Draft | ScheduleStatus::Archived) {
            return Err(SchedulerError::ScheduleImmutable(id.0.clone()));
        }

        self.repo.delete_conflicts_by_schedule(id);
        self.repo.delete_schedule(id)
    }
}

fn tally_severities(conflicts: &[crate::types::Conflict]) -> HashMap<Severity, usize> {
    let mut counts = HashMap::new();
    for c in conflicts {
        *counts.entry(c.severity).or_insert(0) += 1;
    }
    for severity in [Severity::Critical, Severity::High, Severity::Medium, Severity::Low, Severity::Info] {
        counts.entry(severity).or_insert(0);
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConflictId, ConflictType, SlotId};

    fn empty_repo() -> InMemoryScheduleRepository {
        InMemoryScheduleRepository::new(Vec::new(), Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }

    fn critical_conflict(schedule_id: &ScheduleId) -> crate::types::Conflict {
        crate::types::Conflict {
            id: ConflictId("conf-1".into()),
            schedule_id: schedule_id.clone(),
            kind: ConflictType::TeacherOverlap,
            severity: Severity::Critical,
            slot_ids: Vec::new(),
            teacher_ids: Vec::new(),
            room_ids: Vec::new(),
            course_ids: Vec::new(),
            description: "teacher double-booked".into(),
        }
    }

    fn schedule_in_review(id: &ScheduleId) -> Schedule {
        let mut schedule = Schedule::new(id.clone(), "Test Schedule");
        schedule.status = ScheduleStatus::Review;
        schedule
    }

    #[test]
    fn publish_refuses_when_a_critical_conflict_is_present() {
        let id = ScheduleId::from("s1");
        let repo = empty_repo();
        repo.save_schedule(schedule_in_review(&id)).unwrap();
        repo.save_conflicts(&id, vec![critical_conflict(&id)]);

        let manager = LifecycleManager::new(repo);
        let err = manager.publish(&id).unwrap_err();

        assert!(matches!(err, SchedulerError::ScheduleHasCriticalConflicts { critical_count: 1, .. }));
        let schedule = manager.repository().find_schedule(&id).unwrap();
        assert_eq!(schedule.status, ScheduleStatus::Review);
    }

    #[test]
    fn publish_succeeds_once_no_critical_conflicts_remain() {
        let id = ScheduleId::from("s1");
        let repo = empty_repo();
        repo.save_schedule(schedule_in_review(&id)).unwrap();

        let manager = LifecycleManager::new(repo);
        manager.publish(&id).unwrap();

        let schedule = manager.repository().find_schedule(&id).unwrap();
        assert_eq!(schedule.status, ScheduleStatus::Published);
    }

    #[test]
    fn publish_rejects_a_schedule_still_in_draft() {
        let id = ScheduleId::from("s1");
        let repo = empty_repo();
        repo.save_schedule(Schedule::new(id.clone(), "Draft Schedule")).unwrap();

        let manager = LifecycleManager::new(repo);
        let err = manager.publish(&id).unwrap_err();

        assert!(matches!(err, SchedulerError::InvalidInput(_)));
    }

    #[test]
    fn clone_schedule_produces_fresh_ids_and_an_empty_conflict_set() {
        let source_id = ScheduleId::from("s1");
        let repo = empty_repo();
        let mut source = Schedule::new(source_id.clone(), "Source");
        source.status = ScheduleStatus::Published;
        source.slots = vec![ScheduleSlot {
            id: SlotId("slot-1".into()),
            schedule_id: source_id.clone(),
            course_id: crate::types::CourseId("c1".into()),
            teacher_id: None,
            room_id: None,
            day_of_week: crate::types::Weekday::Monday,
            start_time: crate::types::ClockTime::hm(9, 0),
            end_time: crate::types::ClockTime::hm(9, 50),
        }];
        repo.save_schedule(source.clone()).unwrap();
        repo.save_conflicts(&source_id, vec![critical_conflict(&source_id)]);

        let manager = LifecycleManager::new(repo);
        let new_id = ScheduleId::from("s2");
        let cloned = manager.clone_schedule(&source_id, new_id.clone()).unwrap();

        assert_eq!(cloned.status, ScheduleStatus::Draft);
        assert_eq!(cloned.slots.len(), source.slots.len());
        assert_ne!(cloned.slots[0].id, source.slots[0].id);
        assert_eq!(cloned.slots[0].course_id, source.slots[0].course_id);
        assert_eq!(cloned.slots[0].day_of_week, source.slots[0].day_of_week);
        assert!(manager.repository().find_conflicts_by_schedule(&new_id).is_empty());
    }

    #[test]
    fn delete_is_rejected_for_a_published_schedule() {
        let id = ScheduleId::from("s1");
        let repo = empty_repo();
        let mut schedule = Schedule::new(id.clone(), "Live Schedule");
        schedule.status = ScheduleStatus::Published;
        repo.save_schedule(schedule).unwrap();

        let manager = LifecycleManager::new(repo);
        let err = manager.delete(&id).unwrap_err();

        assert!(matches!(err, SchedulerError::ScheduleImmutable(_)));
        assert!(manager.repository().find_schedule(&id).is_some());
    }

    #[test]
    fn delete_cascades_conflicts_for_a_draft_schedule() {
        let id = ScheduleId::from("s1");
        let repo = empty_repo();
        repo.save_schedule(Schedule::new(id.clone(), "Draft Schedule")).unwrap();
        repo.save_conflicts(&id, vec![critical_conflict(&id)]);

        let manager = LifecycleManager::new(repo);
        manager.delete(&id).unwrap();

        assert!(manager.repository().find_schedule(&id).is_none());
    }

    #[test]
    fn archive_is_terminal_and_idempotent() {
        let id = ScheduleId::from("s1");
        let repo = empty_repo();
        repo.save_schedule(schedule_in_review(&id)).unwrap();

        let manager = LifecycleManager::new(repo);
        manager.archive(&id).unwrap();
        manager.archive(&id).unwrap();

        let schedule = manager.repository().find_schedule(&id).unwrap();
        assert_eq!(schedule.status, ScheduleStatus::Archived);

        let err = manager.publish(&id).unwrap_err();
        assert!(matches!(err, SchedulerError::ScheduleImmutable(_)));
    }
}
