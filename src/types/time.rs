use serde::{Deserialize, Serialize};
use std::fmt;

/// Day of the school week. Ordered Monday..Sunday for deterministic sorting;
/// typical configurations only ever use Monday..Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    pub const WEEKDAYS: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Minutes since midnight. Using a plain integer rather than `chrono::NaiveTime`
/// keeps interval arithmetic (overlap, passing time) simple integer math, which
/// is all the solver and detector ever need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClockTime(pub u16);

impl ClockTime {
    pub fn hm(hour: u8, minute: u8) -> Self {
        Self(hour as u16 * 60 + minute as u16)
    }

    pub fn hour(&self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.0 % 60) as u8
    }

    pub fn plus_minutes(&self, minutes: u16) -> Self {
        Self(self.0 + minutes)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// A half-open `[start, end)` interval on a single day, the atomic unit of
/// time the solver places and the detector compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: Weekday,
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeSlot {
    pub fn new(day: Weekday, start: ClockTime, end: ClockTime) -> Self {
        Self { day, start, end }
    }

    /// Half-open interval overlap, same day required.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }

    /// True when `self` ends exactly where `other` begins (touching, no gap),
    /// or vice versa.
    pub fn touches(&self, other: &TimeSlot) -> bool {
        self.day == other.day && (self.end == other.start || other.end == self.start)
    }

    /// Gap in minutes between the end of the earlier slot and the start of the
    /// later one on the same day. `None` if they don't share a day or overlap.
    pub fn gap_minutes(&self, other: &TimeSlot) -> Option<i32> {
        if self.day != other.day {
            return None;
        }
        if self.overlaps(other) {
            return None;
        }
        let gap = if self.end <= other.start {
            other.start.0 as i32 - self.end.0 as i32
        } else {
            self.start.0 as i32 - other.end.0 as i32
        };
        Some(gap)
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.0.saturating_sub(self.start.0)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.day, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_requires_same_day() {
        let a = TimeSlot::new(Weekday::Monday, ClockTime::hm(9, 0), ClockTime::hm(9, 50));
        let b = TimeSlot::new(Weekday::Tuesday, ClockTime::hm(9, 0), ClockTime::hm(9, 50));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn half_open_interval_touching_is_not_overlap() {
        let a = TimeSlot::new(Weekday::Monday, ClockTime::hm(9, 0), ClockTime::hm(9, 50));
        let b = TimeSlot::new(Weekday::Monday, ClockTime::hm(9, 50), ClockTime::hm(10, 40));
        assert!(!a.overlaps(&b));
        assert!(a.touches(&b));
    }

    #[test]
    fn gap_minutes_computes_break_length() {
        let a = TimeSlot::new(Weekday::Monday, ClockTime::hm(9, 0), ClockTime::hm(9, 50));
        let b = TimeSlot::new(Weekday::Monday, ClockTime::hm(10, 5), ClockTime::hm(10, 55));
        assert_eq!(a.gap_minutes(&b), Some(15));
    }
}
