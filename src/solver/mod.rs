//! Constraint solver (C5, spec.md §4.4): produces a full `ScheduleSlot`
//! assignment with zero CRITICAL violations and a minimized weighted
//! soft-penalty sum, subject to a time budget.

mod annealing;
mod cancellation;
mod greedy;
mod local_search;
mod scoring;
mod section;

pub use cancellation::{CancellationToken, Deadline, CANCELLATION_GRACE};
pub use scoring::Score;
pub use section::{expand_sections, SectionUnit};

use crate::detector::Inventory;
use crate::error::{SchedulerError, Result};
use crate::types::{
    Course, Enrollment, Room, Schedule, ScheduleId, ScheduleSlot, SchedulerConfiguration,
    SolverAlgorithm, Student, Teacher,
};

#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub slots: Vec<ScheduleSlot>,
    pub score: Score,
    pub warnings: Vec<String>,
}

/// Run the configured algorithm end to end: greedy seed, then (depending on
/// `config.algorithm`) local search or simulated annealing refinement.
/// Returns `INFEASIBLE_WITHIN_BUDGET` only when the time budget elapses
/// without ever reaching zero hard violations.
pub fn solve(
    schedule_id: &ScheduleId,
    courses: &[Course],
    teachers: &[Teacher],
    rooms: &[Room],
    enrollments: &[Enrollment],
    students: &[Student],
    config: &SchedulerConfiguration,
    cancel: &CancellationToken,
) -> Result<SolveOutcome> {
    let inventory = Inventory::new(courses, teachers, rooms, enrollments, students);
    let sections = expand_sections(courses);

    let (seeded, mut warnings) =
        greedy::greedy_seed(schedule_id, &sections, courses, teachers, rooms, config, &inventory, cancel);

    let mut deadline = Deadline::new(config.time_budget_secs, config.unimproved_seconds_budget);

    let refined = match config.algorithm {
        SolverAlgorithm::GreedySeed => seeded,
        SolverAlgorithm::LocalSearch => {
            local_search::local_search(seeded, rooms, config, &inventory, cancel, &mut deadline)
        }
        SolverAlgorithm::SimulatedAnnealing => {
            annealing::simulated_annealing(seeded, rooms, config, &inventory, cancel, &mut deadline)
        }
    };

    let final_score = Score {
        hard_violations: scoring::hard_violations(&refined, &inventory),
        soft_penalty: scoring::soft_penalty(&refined, &inventory, config),
    };

    let expected_sections = sections.len();
    if refined.len() < expected_sections {
        warnings.push(format!(
            "only {} of {} sections were placed",
            refined.len(),
            expected_sections
        ));
    }

    if cancel.is_cancelled() {
        return Err(SchedulerError::Cancelled { partial: refined });
    }

    if !final_score.is_feasible() {
        let blocking = first_blocking_constraint(&refined, &inventory);
        return Err(SchedulerError::InfeasibleWithinBudget {
            blocking_constraint: blocking,
            partial: refined,
        });
    }

    Ok(SolveOutcome {
        slots: refined,
        score: final_score,
        warnings,
    })
}

fn first_blocking_constraint(slots: &[ScheduleSlot], inventory: &Inventory) -> String {
    let working = Schedule {
        id: crate::types::ScheduleId("_solve_probe".into()),
        name: "probe".into(),
        status: crate::types::ScheduleStatus::InProgress,
        slots: slots.to_vec(),
        score: 0.0,
    };
    crate::detector::detect_all(&working, inventory)
        .into_iter()
        .filter(|c| c.is_critical())
        .map(|c| c.description)
        .next()
        .unwrap_or_else(|| "unknown hard constraint".to_string())
}
