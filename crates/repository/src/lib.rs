pub mod memory;
pub mod store;

pub use common::{Order, OrderId, OrderState, Recipe};
pub use memory::{InMemoryLineItemRepository, InMemoryOrderRepository, InMemoryStateTracker};
pub use store::{LineItemRepository, OrderRepository, StateTracker};
