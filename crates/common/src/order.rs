//! The order identity record.

use serde::{Deserialize, Serialize};

use crate::OrderId;

/// An order placed for a physical location.
///
/// Orders are immutable once created; identity is the id alone, so two
/// orders compare equal only when their ids match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    building: u32,
    room: u32,
}

impl Order {
    /// Creates an order with a freshly generated id.
    ///
    /// Location bounds are not checked here; callers validate first.
    pub fn new(building: u32, room: u32) -> Self {
        Self::with_id(OrderId::new(), building, room)
    }

    /// Creates an order with a known id.
    pub fn with_id(id: OrderId, building: u32, room: u32) -> Self {
        Self { id, building, room }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn building(&self) -> u32 {
        self.building
    }

    pub fn room(&self) -> u32 {
        self.room
    }
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Order {}

impl std::hash::Hash for Order {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
