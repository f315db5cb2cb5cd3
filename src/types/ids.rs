use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

id_type!(TeacherId);
id_type!(CourseId);
id_type!(RoomId);
id_type!(StudentId);
id_type!(ScheduleId);
id_type!(SlotId);
id_type!(ConflictId);

/// Identifies one concrete weekly session of a course, e.g. the 2nd of 5
/// `sessionsPerWeek` sessions. Sections are not stored separately from their
/// course; this ordinal distinguishes sibling slots of the same course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionOrdinal(pub u8);
