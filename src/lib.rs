//! Master Scheduler - constraint-based K-12 master schedule generator.
//!
//! Five components cooperate over a shared `types` model:
//!
//! 1. **Feasibility analyzer** (`feasibility`, C2) — read-only audits that
//!    flag structural problems (no certified teacher, insufficient rooms)
//!    before a solve is ever attempted.
//! 2. **Teacher-course matcher** (`matcher`, C3) — binds each course to a
//!    qualified teacher, balancing workload against sequence continuity.
//! 3. **Conflict detector** (`detector`, C4) — thirteen detection categories
//!    plus a fast per-slot oracle the solver uses while scoring candidates.
//! 4. **Constraint solver** (`solver`, C5) — greedy seeding refined by local
//!    search or simulated annealing, subject to a cancellable time budget.
//! 5. **Lifecycle manager** (`lifecycle`, C6) — the schedule state machine
//!    (Draft → InProgress → Review → Published → Archived) and the
//!    per-schedule lock that serializes every mutation.
//!
//! # Example
//!
//! ```no_run
//! use master_scheduler::lifecycle::{GenerateScheduleRequest, InMemoryScheduleRepository, LifecycleManager};
//! use master_scheduler::solver::CancellationToken;
//! use master_scheduler::types::{ScheduleId, SchedulerConfiguration};
//!
//! let repo = InMemoryScheduleRepository::new(vec![], vec![], vec![], vec![], vec![]);
//! let manager = LifecycleManager::new(repo);
//! let request = GenerateScheduleRequest {
//!     schedule_id: ScheduleId::from("fall-2026"),
//!     schedule_name: "Fall 2026".to_string(),
//!     academic_year: Some("2026-2027".to_string()),
//!     config: SchedulerConfiguration::default(),
//! };
//! let result = manager.generate(request, &CancellationToken::new());
//! ```

pub mod detector;
pub mod error;
pub mod families;
pub mod feasibility;
pub mod lifecycle;
pub mod matcher;
pub mod solver;
pub mod types;

pub use error::{Result, SchedulerError};
