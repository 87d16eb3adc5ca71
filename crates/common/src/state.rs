//! Order lifecycle states.

use serde::{Deserialize, Serialize};

/// The lifecycle state of a live order.
///
/// State transitions:
/// ```text
/// Created ──► Completed ──► Prepared ──► (delivered)
///    │                         ▲
///    └─────────────────────────┘
///
/// any live state ──► (cancelled)
/// ```
///
/// Delivered and cancelled orders have no state at all: they are removed
/// from every store instead of being parked in a terminal variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderState {
    /// Order exists and items can be attached.
    #[default]
    Created,

    /// Customer finished the order; it is ready for the kitchen.
    Completed,

    /// Kitchen finished; the order is ready for delivery.
    Prepared,
}

impl OrderState {
    /// All states, in lifecycle order.
    pub const ALL: [OrderState; 3] = [
        OrderState::Created,
        OrderState::Completed,
        OrderState::Prepared,
    ];

    /// Position in the lifecycle. Later states have a higher rank.
    pub fn rank(&self) -> u8 {
        match self {
            OrderState::Created => 0,
            OrderState::Completed => 1,
            OrderState::Prepared => 2,
        }
    }

    /// Returns true if moving from `self` to `next` does not go backwards.
    pub fn can_advance_to(&self, next: OrderState) -> bool {
        next.rank() >= self.rank()
    }

    /// Returns true if the order can be handed to delivery.
    pub fn is_ready_for_delivery(&self) -> bool {
        matches!(self, OrderState::Prepared)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::Created => "Created",
            OrderState::Completed => "Completed",
            OrderState::Prepared => "Prepared",
        }
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
