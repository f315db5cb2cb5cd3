use serde::{Deserialize, Serialize};

use super::{ScheduleId, ScheduleSlot};

/// Lifecycle states driven solely by the lifecycle manager (C6); nothing
/// else is permitted to transition a schedule's status directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleStatus {
    Draft,
    InProgress,
    Review,
    Published,
    Archived,
}

impl ScheduleStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScheduleStatus::Archived)
    }

    pub fn is_mutable(&self) -> bool {
        !self.is_terminal()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub name: String,
    pub status: ScheduleStatus,
    #[serde(default)]
    pub slots: Vec<ScheduleSlot>,
    #[serde(default)]
    pub score: f64,
}

impl Schedule {
    pub fn new(id: ScheduleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: ScheduleStatus::Draft,
            slots: Vec::new(),
            score: 0.0,
        }
    }
}
