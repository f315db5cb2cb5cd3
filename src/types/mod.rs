mod conflict;
mod config;
mod course;
mod enrollment;
mod ids;
mod room;
mod schedule;
mod slot;
mod student;
mod teacher;
mod time;

pub use conflict::*;
pub use config::*;
pub use course::*;
pub use enrollment::*;
pub use ids::*;
pub use room::*;
pub use schedule::*;
pub use slot::*;
pub use student::*;
pub use teacher::*;
pub use time::*;

/// Alias kept for readability at call sites that think in terms of "a period"
/// rather than "a time slot" (teacher availability windows, planning periods).
pub type Period = TimeSlot;
