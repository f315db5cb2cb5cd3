use thiserror::Error;

use crate::types::ScheduleSlot;

/// Error taxonomy surfaced to callers (spec.md §6/§7). Each variant carries
/// enough context to act on without inspecting the message string. Expected
/// failures (no teacher, infeasible, etc.) travel as these values; only
/// programmer mistakes (broken invariants) panic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// `partial` is the best-feasible-so-far (or lowest-infeasibility)
    /// placement the solver had reached when the budget ran out (spec.md
    /// §4.4/§5); callers must not discard it.
    #[error("no feasible schedule found within the time budget; first blocking constraint: {blocking_constraint}")]
    InfeasibleWithinBudget {
        blocking_constraint: String,
        partial: Vec<ScheduleSlot>,
    },

    #[error("course '{course_id}' has no certified teacher")]
    NoCertifiedTeacher { course_id: String },

    #[error("all qualified teachers for course '{course_id}' are at capacity")]
    TeachersAtCapacity { course_id: String },

    #[error("insufficient rooms: need {needed}, have {available} (subject: {subject})")]
    InsufficientRooms {
        subject: String,
        needed: u32,
        available: u32,
    },

    #[error("schedule '{schedule_id}' has {critical_count} critical conflict(s) and cannot be published")]
    ScheduleHasCriticalConflicts {
        schedule_id: String,
        critical_count: usize,
    },

    #[error("schedule '{0}' not found")]
    ScheduleNotFound(String),

    #[error("schedule '{0}' is archived and immutable")]
    ScheduleImmutable(String),

    /// `partial` carries the same best-feasible-so-far placement as
    /// `InfeasibleWithinBudget` (spec.md §5: "on cancel, the solver returns
    /// the best-feasible-so-far").
    #[error("operation cancelled")]
    Cancelled { partial: Vec<ScheduleSlot> },

    #[error("internal error: {0}")]
    Internal(String),
}

/// Library-internal result alias; the CLI binary wraps these in `anyhow`
/// at the application boundary the same way the teacher crate does.
pub type Result<T> = std::result::Result<T, SchedulerError>;
