use serde::{Deserialize, Serialize};

use super::RoomId;

/// Closed set of room types. Administrative types (offices, storage) are not
/// schedulable; everything else is a candidate surface for a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Classroom,
    Lab,
    ScienceLab,
    ComputerLab,
    Gymnasium,
    Auditorium,
    ArtStudio,
    MusicRoom,
    BandRoom,
    ChorusRoom,
    Workshop,
    StemLab,
    CulinaryLab,
    Theater,
    MediaCenter,
    Library,
    Administrative,
}

impl RoomType {
    /// True for every type except purely administrative space.
    pub fn schedulable(&self) -> bool {
        !matches!(self, RoomType::Administrative)
    }

    /// Room types that satisfy `Course::requires_lab`.
    pub fn is_lab_type(&self) -> bool {
        matches!(
            self,
            RoomType::Lab | RoomType::ScienceLab | RoomType::ComputerLab | RoomType::StemLab
        )
    }
}

/// A physical room. `max_concurrent_classes` only matters when `allow_sharing`
/// is set; otherwise a room hosts at most one section per time slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub number: String,
    pub building: String,
    pub floor: i32,
    pub capacity: u32,
    pub room_type: RoomType,
    #[serde(default)]
    pub allow_sharing: bool,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_classes: u32,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub features: Vec<String>,
}

fn default_max_concurrent() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Room {
    pub fn schedulable(&self) -> bool {
        self.available && self.room_type.schedulable()
    }

    /// Effective seat count usable when deciding if a course's enrollment fits.
    pub fn effective_max_capacity(&self) -> u32 {
        self.capacity
    }

    pub fn has_features(&self, required: &[String]) -> bool {
        required.iter().all(|f| self.features.contains(f))
    }
}
