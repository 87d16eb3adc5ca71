//! Order lifecycle orchestration.

mod menu;
mod service;

pub use menu::MenuItem;
pub use service::{Delivery, DeliveryOutcome, OrderService};
