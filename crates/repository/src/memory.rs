use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;

use crate::{LineItemRepository, Order, OrderId, OrderRepository, OrderState, Recipe, StateTracker};

/// In-memory order repository.
///
/// Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<DashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn save(&self, order: Order) {
        self.orders.insert(order.id(), order);
    }

    fn find_by_id(&self, order_id: OrderId) -> Option<Order> {
        self.orders.get(&order_id).map(|entry| *entry.value())
    }

    fn delete_by_id(&self, order_id: OrderId) {
        self.orders.remove(&order_id);
    }
}

/// In-memory line item repository.
///
/// Each order's items live in one map entry, so an append or a removal on a
/// single order is atomic. Empty collections are never kept around.
#[derive(Clone, Default)]
pub struct InMemoryLineItemRepository {
    items: Arc<DashMap<OrderId, Vec<Recipe>>>,
}

impl InMemoryLineItemRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of orders that currently have items.
    pub fn order_count(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the order has an entry in the store.
    pub fn contains_order(&self, order_id: OrderId) -> bool {
        self.items.contains_key(&order_id)
    }
}

impl LineItemRepository for InMemoryLineItemRepository {
    fn view_order_items(&self, order_id: OrderId) -> Vec<String> {
        self.items
            .get(&order_id)
            .map(|entry| {
                entry
                    .iter()
                    .map(|recipe| recipe.description().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn add_item(&self, order_id: OrderId, recipe: Recipe) -> usize {
        let mut entry = self.items.entry(order_id).or_default();
        entry.push(recipe);
        entry.len()
    }

    fn remove_items(&self, order_id: OrderId, description: &str, count: usize) -> usize {
        let removed = match self.items.get_mut(&order_id) {
            Some(mut entry) => {
                let mut removed = 0;
                entry.retain(|recipe| {
                    if removed < count && recipe.description() == description {
                        removed += 1;
                        false
                    } else {
                        true
                    }
                });
                removed
            }
            None => return 0,
        };

        // The shard lock from get_mut is released above; re-check under a
        // fresh lock so a concurrent append is never discarded.
        self.items.remove_if(&order_id, |_, items| items.is_empty());

        tracing::trace!(%order_id, description, requested = count, removed, "removed line items");
        removed
    }

    fn remove(&self, order_id: OrderId) {
        self.items.remove(&order_id);
    }

    fn count(&self, order_id: OrderId) -> usize {
        self.items.get(&order_id).map_or(0, |entry| entry.len())
    }
}

/// In-memory order state tracker.
#[derive(Clone, Default)]
pub struct InMemoryStateTracker {
    states: Arc<DashMap<OrderId, OrderState>>,
}

impl InMemoryStateTracker {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of tracked orders.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl StateTracker for InMemoryStateTracker {
    fn get(&self, order_id: OrderId) -> Option<OrderState> {
        self.states.get(&order_id).map(|entry| *entry.value())
    }

    fn update(&self, order_id: OrderId, state: OrderState) {
        self.states.insert(order_id, state);
    }

    fn remove(&self, order_id: OrderId) {
        self.states.remove(&order_id);
    }

    fn ids_in_state(&self, state: OrderState) -> HashSet<OrderId> {
        self.states
            .iter()
            .filter(|entry| *entry.value() == state)
            .map(|entry| *entry.key())
            .collect()
    }
}
