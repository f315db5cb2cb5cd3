use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Checked at natural boundaries (each move accepted/rejected, each outer
/// iteration) rather than preemptively — spec.md §5. Cloning shares the
/// underlying flag, so a caller can hold one end and the solver the other.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

/// Cancellation must resolve within this grace period (spec.md §5).
pub const CANCELLATION_GRACE: Duration = Duration::from_millis(500);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Tracks the two independent stopping conditions the solver obeys besides
/// cancellation: an overall time budget and an unimproved-seconds budget
/// that only starts counting once a feasible solution exists.
pub struct Deadline {
    started: Instant,
    time_budget: Duration,
    unimproved_budget: Duration,
    last_improved: Instant,
    feasible_seen: bool,
}

impl Deadline {
    pub fn new(time_budget_secs: u64, unimproved_secs: u64) -> Self {
        let now = Instant::now();
        Self {
            started: now,
            time_budget: Duration::from_secs(time_budget_secs),
            unimproved_budget: Duration::from_secs(unimproved_secs),
            last_improved: now,
            feasible_seen: false,
        }
    }

    pub fn note_feasible(&mut self) {
        self.feasible_seen = true;
    }

    pub fn note_improvement(&mut self) {
        self.last_improved = Instant::now();
    }

    pub fn expired(&self) -> bool {
        if self.started.elapsed() >= self.time_budget {
            return true;
        }
        self.feasible_seen && self.last_improved.elapsed() >= self.unimproved_budget
    }
}
