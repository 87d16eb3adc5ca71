//! Location validation for new orders.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A building or room number outside the configured bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Building number must be between {min} and {max}.")]
    BuildingOutOfRange { building: u32, min: u32, max: u32 },

    #[error("Room number must be between {min} and {max}.")]
    RoomOutOfRange { room: u32, min: u32, max: u32 },
}

/// Inclusive bounds for building and room numbers.
///
/// `min <= max` is expected but not enforced; inverted bounds simply reject
/// every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationBounds {
    pub min_building: u32,
    pub max_building: u32,
    pub min_room: u32,
    pub max_room: u32,
}

impl LocationBounds {
    pub fn new(min_building: u32, max_building: u32, min_room: u32, max_room: u32) -> Self {
        Self {
            min_building,
            max_building,
            min_room,
            max_room,
        }
    }

    /// Checks a location against the bounds. The building is checked first.
    pub fn validate(&self, building: u32, room: u32) -> Result<(), ValidationError> {
        if !(self.min_building..=self.max_building).contains(&building) {
            return Err(ValidationError::BuildingOutOfRange {
                building,
                min: self.min_building,
                max: self.max_building,
            });
        }
        if !(self.min_room..=self.max_room).contains(&room) {
            return Err(ValidationError::RoomOutOfRange {
                room,
                min: self.min_room,
                max: self.max_room,
            });
        }
        Ok(())
    }
}

impl Default for LocationBounds {
    fn default() -> Self {
        Self::new(1, 10, 1, 1000)
    }
}
