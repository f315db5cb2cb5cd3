use std::path::Path;

use serde::{Deserialize, Serialize};

use super::time::ClockTime;
use super::Weekday;

/// How the matcher accumulates a teacher's current load against the
/// OPTIMAL/WARNING/HARD_CAP thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkloadMode {
    CourseCount,
    CreditSum,
    SessionsPerWeek,
}

impl Default for WorkloadMode {
    fn default() -> Self {
        WorkloadMode::SessionsPerWeek
    }
}

/// Thresholds for a workload mode. Defaults match spec.md §4.2 (5/5/6 for
/// sessions-per-week mode).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorkloadThresholds {
    pub optimal: f64,
    pub warning: f64,
    pub hard_cap: f64,
}

impl Default for WorkloadThresholds {
    fn default() -> Self {
        Self {
            optimal: 5.0,
            warning: 5.0,
            hard_cap: 6.0,
        }
    }
}

/// Selects which search strategy the constraint solver runs (spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverAlgorithm {
    GreedySeed,
    LocalSearch,
    SimulatedAnnealing,
}

impl Default for SolverAlgorithm {
    fn default() -> Self {
        SolverAlgorithm::LocalSearch
    }
}

/// Weight vector for the soft-constraint objective (spec.md §4.4).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SoftWeights {
    pub teacher_workload_balance: f64,
    pub minimize_student_gaps: f64,
    pub lunch_break_preference: f64,
    pub minimize_building_moves: f64,
    pub honor_preferences: f64,
    pub mid_morning_difficult_courses: f64,
    pub group_related_subjects: f64,
}

impl Default for SoftWeights {
    fn default() -> Self {
        Self {
            teacher_workload_balance: 50.0,
            minimize_student_gaps: 30.0,
            lunch_break_preference: 20.0,
            minimize_building_moves: 5.0,
            honor_preferences: 10.0,
            mid_morning_difficult_courses: 5.0,
            group_related_subjects: 10.0,
        }
    }
}

/// Knobs for the solver and detector, as specified in spec.md §3/§6.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfiguration {
    #[serde(default = "default_earliest")]
    pub earliest_start: ClockTime,
    #[serde(default = "default_latest")]
    pub latest_end: ClockTime,
    #[serde(default = "default_period_minutes")]
    pub period_minutes: u16,
    #[serde(default = "default_passing_minutes")]
    pub passing_minutes: u16,
    #[serde(default = "default_weekdays")]
    pub weekdays: Vec<Weekday>,
    #[serde(default = "default_min_periods")]
    pub min_periods_per_teacher: u8,
    #[serde(default = "default_max_periods")]
    pub max_periods_per_teacher: u8,
    #[serde(default = "default_max_consecutive")]
    pub max_consecutive: u8,
    #[serde(default)]
    pub workload_mode: WorkloadMode,
    #[serde(default)]
    pub workload_thresholds: WorkloadThresholds,
    #[serde(default)]
    pub algorithm: SolverAlgorithm,
    #[serde(default)]
    pub weights: SoftWeights,
    #[serde(default = "default_time_budget_secs")]
    pub time_budget_secs: u64,
    #[serde(default = "default_unimproved_secs")]
    pub unimproved_seconds_budget: u64,
}

fn default_earliest() -> ClockTime {
    ClockTime::hm(7, 30)
}

fn default_latest() -> ClockTime {
    ClockTime::hm(15, 30)
}

fn default_period_minutes() -> u16 {
    50
}

fn default_passing_minutes() -> u16 {
    5
}

fn default_weekdays() -> Vec<Weekday> {
    Weekday::WEEKDAYS.to_vec()
}

fn default_min_periods() -> u8 {
    4
}

fn default_max_periods() -> u8 {
    7
}

fn default_max_consecutive() -> u8 {
    3
}

fn default_time_budget_secs() -> u64 {
    300
}

fn default_unimproved_secs() -> u64 {
    30
}

impl Default for SchedulerConfiguration {
    fn default() -> Self {
        Self {
            earliest_start: default_earliest(),
            latest_end: default_latest(),
            period_minutes: default_period_minutes(),
            passing_minutes: default_passing_minutes(),
            weekdays: default_weekdays(),
            min_periods_per_teacher: default_min_periods(),
            max_periods_per_teacher: default_max_periods(),
            max_consecutive: default_max_consecutive(),
            workload_mode: WorkloadMode::default(),
            workload_thresholds: WorkloadThresholds::default(),
            algorithm: SolverAlgorithm::default(),
            weights: SoftWeights::default(),
            time_budget_secs: default_time_budget_secs(),
            unimproved_seconds_budget: default_unimproved_secs(),
        }
    }
}

impl SchedulerConfiguration {
    /// Load from a TOML file at `path`, falling back to `Default` when the
    /// file is absent or fails to parse.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            std::fs::read_to_string(path)
                .ok()
                .and_then(|content| toml::from_str(&content).ok())
                .unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Number of discrete periods that fit in the configured school day.
    pub fn periods_per_day(&self) -> u16 {
        let window = self.latest_end.0.saturating_sub(self.earliest_start.0);
        let slot = self.period_minutes + self.passing_minutes;
        if slot == 0 {
            0
        } else {
            window / slot
        }
    }

    /// Generate the discrete `(day, start, end)` time slots the solver may
    /// choose from, derived from earliest/latest and passing minutes.
    pub fn candidate_time_slots(&self) -> Vec<super::TimeSlot> {
        let mut slots = Vec::new();
        let periods = self.periods_per_day();
        for &day in &self.weekdays {
            for p in 0..periods {
                let start = self
                    .earliest_start
                    .plus_minutes(p * (self.period_minutes + self.passing_minutes));
                let end = start.plus_minutes(self.period_minutes);
                slots.push(super::TimeSlot::new(day, start, end));
            }
        }
        slots
    }
}
