use std::collections::HashSet;
use std::sync::Arc;

use crate::{Order, OrderId, OrderState, Recipe};

/// Storage for order identity records.
///
/// Each call is atomic on its own. Nothing here spans several calls; callers
/// that need a sequence of operations to appear atomic must serialize them.
pub trait OrderRepository: Send + Sync {
    /// Inserts or overwrites the order under its id.
    ///
    /// No uniqueness check is performed; ids are expected to be fresh.
    fn save(&self, order: Order);

    /// Looks up an order by id.
    fn find_by_id(&self, order_id: OrderId) -> Option<Order>;

    /// Removes an order. Removing an unknown id is not an error.
    fn delete_by_id(&self, order_id: OrderId);
}

/// Storage for the recipes attached to each order.
///
/// Items keep their insertion order.
pub trait LineItemRepository: Send + Sync {
    /// Returns the descriptions of all items on the order, oldest first.
    ///
    /// Unknown orders have no items.
    fn view_order_items(&self, order_id: OrderId) -> Vec<String>;

    /// Appends one item and returns the new item count for the order.
    fn add_item(&self, order_id: OrderId, recipe: Recipe) -> usize;

    /// Removes up to `count` items whose description equals `description`.
    ///
    /// Matching items are removed oldest first and the relative order of the
    /// remaining items is preserved. Returns how many items were removed.
    /// An order left without items is dropped from the store.
    fn remove_items(&self, order_id: OrderId, description: &str, count: usize) -> usize;

    /// Drops every item attached to the order.
    fn remove(&self, order_id: OrderId);

    /// Returns the number of items attached to the order.
    fn count(&self, order_id: OrderId) -> usize;
}

/// Storage for the lifecycle state of each live order.
///
/// Updates are blind overwrites; transition rules belong to the caller.
pub trait StateTracker: Send + Sync {
    fn get(&self, order_id: OrderId) -> Option<OrderState>;

    fn update(&self, order_id: OrderId, state: OrderState);

    fn remove(&self, order_id: OrderId);

    /// Returns the ids currently mapped to `state`.
    ///
    /// This is a point-in-time view and may miss concurrent changes.
    fn ids_in_state(&self, state: OrderState) -> HashSet<OrderId>;
}

impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    fn save(&self, order: Order) {
        (**self).save(order)
    }

    fn find_by_id(&self, order_id: OrderId) -> Option<Order> {
        (**self).find_by_id(order_id)
    }

    fn delete_by_id(&self, order_id: OrderId) {
        (**self).delete_by_id(order_id)
    }
}

impl<T: LineItemRepository + ?Sized> LineItemRepository for Arc<T> {
    fn view_order_items(&self, order_id: OrderId) -> Vec<String> {
        (**self).view_order_items(order_id)
    }

    fn add_item(&self, order_id: OrderId, recipe: Recipe) -> usize {
        (**self).add_item(order_id, recipe)
    }

    fn remove_items(&self, order_id: OrderId, description: &str, count: usize) -> usize {
        (**self).remove_items(order_id, description, count)
    }

    fn remove(&self, order_id: OrderId) {
        (**self).remove(order_id)
    }

    fn count(&self, order_id: OrderId) -> usize {
        (**self).count(order_id)
    }
}

impl<T: StateTracker + ?Sized> StateTracker for Arc<T> {
    fn get(&self, order_id: OrderId) -> Option<OrderState> {
        (**self).get(order_id)
    }

    fn update(&self, order_id: OrderId, state: OrderState) {
        (**self).update(order_id, state)
    }

    fn remove(&self, order_id: OrderId) {
        (**self).remove(order_id)
    }

    fn ids_in_state(&self, state: OrderState) -> HashSet<OrderId> {
        (**self).ids_in_state(state)
    }
}
