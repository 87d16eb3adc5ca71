//! Order service: the only entry point that mutates orders.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use common::{Order, OrderId, OrderState, Recipe};
use repository::{
    InMemoryLineItemRepository, InMemoryOrderRepository, InMemoryStateTracker,
    LineItemRepository, OrderRepository, StateTracker,
};
use serde::Serialize;

use crate::config::{ServiceConfig, TransitionPolicy};
use crate::error::OrderError;
use crate::locks::{OrderGuard, OrderLocks};
use crate::logger::{OrderLogger, TracingOrderLogger};

use super::MenuItem;

/// An order handed over for delivery, with the items it carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub order: Order,
    pub items: Vec<String>,
}

/// Result of a delivery request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The order is not prepared yet; nothing was changed.
    NotReady { state: Option<OrderState> },

    /// The order left the kitchen and was removed from every store.
    Delivered(Delivery),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered(_))
    }

    /// Returns the delivery, if one happened.
    pub fn into_delivery(self) -> Option<Delivery> {
        match self {
            DeliveryOutcome::Delivered(delivery) => Some(delivery),
            DeliveryOutcome::NotReady { .. } => None,
        }
    }
}

/// Service for managing orders.
///
/// Every mutating operation holds the lock for its order id from start to
/// finish, so operations on the same order never interleave while operations
/// on different orders run in parallel. Repository calls inside the lock are
/// synchronous: once an operation holds its lock it runs to completion, even
/// if the caller stops waiting for it.
///
/// Reads that skip the lock (`view_order`, `find_order`, the state listings)
/// may observe an order in the middle of a change.
pub struct OrderService<
    O = InMemoryOrderRepository,
    I = InMemoryLineItemRepository,
    S = InMemoryStateTracker,
> where
    O: OrderRepository,
    I: LineItemRepository,
    S: StateTracker,
{
    orders: O,
    items: I,
    states: S,
    config: ServiceConfig,
    logger: Arc<dyn OrderLogger>,
    locks: OrderLocks,
}

impl OrderService {
    /// Creates a service over fresh in-memory repositories.
    pub fn in_memory(config: ServiceConfig) -> Self {
        Self::new(
            InMemoryOrderRepository::new(),
            InMemoryLineItemRepository::new(),
            InMemoryStateTracker::new(),
            config,
        )
    }
}

impl<O, I, S> OrderService<O, I, S>
where
    O: OrderRepository,
    I: LineItemRepository,
    S: StateTracker,
{
    /// Creates a service over the given repositories.
    ///
    /// Activity is reported through [`TracingOrderLogger`] until another
    /// logger is installed with [`with_logger`](Self::with_logger).
    pub fn new(orders: O, items: I, states: S, config: ServiceConfig) -> Self {
        Self {
            orders,
            items,
            states,
            config,
            logger: Arc::new(TracingOrderLogger),
            locks: OrderLocks::new(),
        }
    }

    pub fn with_logger(mut self, logger: impl OrderLogger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn orders(&self) -> &O {
        &self.orders
    }

    pub fn items(&self) -> &I {
        &self.items
    }

    pub fn states(&self) -> &S {
        &self.states
    }

    pub fn locks(&self) -> &OrderLocks {
        &self.locks
    }

    /// Creates an order for a building and room.
    ///
    /// The location is validated before anything is stored.
    #[tracing::instrument(skip(self))]
    pub async fn create_order(&self, building: u32, room: u32) -> Result<Order, OrderError> {
        self.config.bounds.validate(building, room)?;

        let order = Order::new(building, room);
        let _guard = self.locks.acquire(order.id()).await;

        self.orders.save(order);
        self.states.update(order.id(), OrderState::Created);

        metrics::counter!("orders_created_total").increment(1);
        tracing::debug!(order_id = %order.id(), "order created");
        Ok(order)
    }

    /// Appends `count` copies of `recipe` to the order.
    ///
    /// Returns the order's item count afterwards.
    #[tracing::instrument(skip(self, recipe), fields(description = recipe.description()))]
    pub async fn add_item(
        &self,
        order_id: OrderId,
        recipe: Recipe,
        count: usize,
    ) -> Result<usize, OrderError> {
        let guard = self.locks.acquire(order_id).await;
        let (_guard, order) = self.require_order(guard)?;

        let mut item_count = self.items.count(order_id);
        for _ in 0..count {
            item_count = self.items.add_item(order_id, recipe.clone());
            self.notify("item_added", |logger| {
                logger.on_item_added(&order, &recipe, item_count)
            });
        }

        metrics::counter!("order_items_added_total").increment(count as u64);
        Ok(item_count)
    }

    /// Appends `count` pancakes from the standard menu.
    pub async fn add_menu_item(
        &self,
        order_id: OrderId,
        item: MenuItem,
        count: usize,
    ) -> Result<usize, OrderError> {
        self.add_item(order_id, item.recipe(), count).await
    }

    /// Removes up to `count` items matching `description`, oldest first.
    ///
    /// Returns how many were removed. The order lookup happens after the
    /// removal attempt, which is harmless for unknown ids since nothing
    /// matches them.
    #[tracing::instrument(skip(self))]
    pub async fn remove_items(
        &self,
        description: &str,
        order_id: OrderId,
        count: usize,
    ) -> Result<usize, OrderError> {
        let guard = self.locks.acquire(order_id).await;
        let removed = self.items.remove_items(order_id, description, count);
        let (_guard, order) = self.require_order(guard)?;

        let item_count = self.items.count(order_id);
        self.notify("items_removed", |logger| {
            logger.on_items_removed(&order, description, item_count, removed)
        });

        metrics::counter!("order_items_removed_total").increment(removed as u64);
        Ok(removed)
    }

    /// Cancels an order, dropping its items, record and state together.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<(), OrderError> {
        let guard = self.locks.acquire(order_id).await;
        let (guard, order) = self.require_order(guard)?;

        let item_count = self.items.count(order_id);
        self.notify("cancelled", |logger| logger.on_cancelled(&order, item_count));

        self.discard(order_id);
        guard.retire();

        metrics::counter!("orders_cancelled_total").increment(1);
        tracing::debug!(%order_id, item_count, "order cancelled");
        Ok(())
    }

    /// Marks an order as completed by the customer.
    #[tracing::instrument(skip(self))]
    pub async fn complete_order(&self, order_id: OrderId) -> Result<(), OrderError> {
        self.transition(order_id, OrderState::Completed, "complete")
            .await
    }

    /// Marks an order as prepared by the kitchen.
    ///
    /// Completing first is optional.
    #[tracing::instrument(skip(self))]
    pub async fn prepare_order(&self, order_id: OrderId) -> Result<(), OrderError> {
        self.transition(order_id, OrderState::Prepared, "prepare")
            .await
    }

    /// Hands a prepared order to delivery.
    ///
    /// Orders in any other state are left untouched and reported as not
    /// ready. A delivered order is removed from every store and the item
    /// descriptions it carried are returned with it.
    #[tracing::instrument(skip(self))]
    pub async fn deliver_order(&self, order_id: OrderId) -> Result<DeliveryOutcome, OrderError> {
        let guard = self.locks.acquire(order_id).await;

        let state = self.states.get(order_id);
        if !state.is_some_and(|state| state.is_ready_for_delivery()) {
            if state.is_none() && self.orders.find_by_id(order_id).is_none() {
                guard.retire();
            }
            metrics::counter!("order_delivery_not_ready_total").increment(1);
            tracing::debug!(%order_id, ?state, "order not ready for delivery");
            return Ok(DeliveryOutcome::NotReady { state });
        }

        let Some(order) = self.orders.find_by_id(order_id) else {
            // Only reachable through a permissive transition on an unknown id.
            self.states.remove(order_id);
            guard.retire();
            return Err(OrderError::NotFound(order_id));
        };

        let items = self.items.view_order_items(order_id);
        let item_count = items.len();
        self.notify("delivered", |logger| logger.on_delivered(&order, item_count));

        self.discard(order_id);
        guard.retire();

        metrics::counter!("orders_delivered_total").increment(1);
        tracing::debug!(%order_id, item_count, "order delivered");
        Ok(DeliveryOutcome::Delivered(Delivery { order, items }))
    }

    /// Returns the descriptions of the order's items, oldest first.
    ///
    /// Unknown and finished orders have no items.
    pub fn view_order(&self, order_id: OrderId) -> Vec<String> {
        self.items.view_order_items(order_id)
    }

    pub fn find_order(&self, order_id: OrderId) -> Option<Order> {
        self.orders.find_by_id(order_id)
    }

    /// Returns the ids of orders currently in `state`.
    pub fn list_by_state(&self, state: OrderState) -> HashSet<OrderId> {
        self.states.ids_in_state(state)
    }

    pub fn list_completed_orders(&self) -> HashSet<OrderId> {
        self.list_by_state(OrderState::Completed)
    }

    pub fn list_prepared_orders(&self) -> HashSet<OrderId> {
        self.list_by_state(OrderState::Prepared)
    }

    async fn transition(
        &self,
        order_id: OrderId,
        target: OrderState,
        action: &'static str,
    ) -> Result<(), OrderError> {
        let guard = self.locks.acquire(order_id).await;

        if self.config.transitions == TransitionPolicy::Permissive {
            let previous = self.states.get(order_id);
            self.states.update(order_id, target);
            tracing::debug!(%order_id, from = ?previous, to = %target, "order state changed");
            if self.orders.find_by_id(order_id).is_none() {
                guard.retire();
            }
            return Ok(());
        }

        let (_guard, _order) = self.require_order(guard)?;
        let current = self.states.get(order_id).unwrap_or_default();
        if !current.can_advance_to(target) {
            return Err(OrderError::InvalidTransition { current, action });
        }

        self.states.update(order_id, target);
        tracing::debug!(%order_id, from = %current, to = %target, "order state changed");
        Ok(())
    }

    /// Resolves the order held by `guard`.
    ///
    /// An unknown id gets its lock slot retired before the error is returned,
    /// so failed lookups do not leave slots behind.
    fn require_order<'a>(
        &self,
        guard: OrderGuard<'a>,
    ) -> Result<(OrderGuard<'a>, Order), OrderError> {
        let order_id = guard.order_id();
        match self.orders.find_by_id(order_id) {
            Some(order) => Ok((guard, order)),
            None => {
                guard.retire();
                Err(OrderError::NotFound(order_id))
            }
        }
    }

    fn discard(&self, order_id: OrderId) {
        self.items.remove(order_id);
        self.orders.delete_by_id(order_id);
        self.states.remove(order_id);
    }

    fn notify(&self, event: &'static str, f: impl FnOnce(&dyn OrderLogger)) {
        let logger = self.logger.as_ref();
        if panic::catch_unwind(AssertUnwindSafe(|| f(logger))).is_err() {
            tracing::warn!(event, "order logger panicked, continuing");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::logger::NoopOrderLogger;

    fn service() -> OrderService {
        OrderService::in_memory(ServiceConfig::default()).with_logger(NoopOrderLogger)
    }

    #[derive(Default)]
    struct RecordingLogger {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl OrderLogger for RecordingLogger {
        fn on_item_added(&self, _order: &Order, recipe: &Recipe, item_count: usize) {
            self.lines
                .lock()
                .unwrap()
                .push(format!("added {} -> {item_count}", recipe.description()));
        }

        fn on_items_removed(&self, _order: &Order, description: &str, item_count: usize, removed: usize) {
            self.lines
                .lock()
                .unwrap()
                .push(format!("removed {removed} {description} -> {item_count}"));
        }

        fn on_cancelled(&self, _order: &Order, item_count: usize) {
            self.lines.lock().unwrap().push(format!("cancelled with {item_count}"));
        }

        fn on_delivered(&self, _order: &Order, item_count: usize) {
            self.lines.lock().unwrap().push(format!("delivered with {item_count}"));
        }
    }

    struct PanickingLogger;

    impl OrderLogger for PanickingLogger {
        fn on_item_added(&self, _order: &Order, _recipe: &Recipe, _item_count: usize) {
            panic!("sink unavailable");
        }

        fn on_items_removed(&self, _order: &Order, _description: &str, _item_count: usize, _removed: usize) {
            panic!("sink unavailable");
        }

        fn on_cancelled(&self, _order: &Order, _item_count: usize) {
            panic!("sink unavailable");
        }

        fn on_delivered(&self, _order: &Order, _item_count: usize) {
            panic!("sink unavailable");
        }
    }

    #[tokio::test]
    async fn test_create_order() {
        let service = service();

        let order = service.create_order(3, 42).await.unwrap();

        assert_eq!(order.building(), 3);
        assert_eq!(order.room(), 42);
        assert_eq!(service.find_order(order.id()), Some(order));
        assert_eq!(service.states().get(order.id()), Some(OrderState::Created));
    }

    #[tokio::test]
    async fn test_create_order_rejects_bad_location() {
        let service = service();

        let result = service.create_order(0, 42).await;

        assert!(matches!(result, Err(OrderError::Validation(_))));
        assert!(service.orders().is_empty());
        assert!(service.states().is_empty());
    }

    #[tokio::test]
    async fn test_add_item_returns_total() {
        let service = service();
        let order = service.create_order(1, 1).await.unwrap();

        let total = service
            .add_menu_item(order.id(), MenuItem::DarkChocolate, 2)
            .await
            .unwrap();
        assert_eq!(total, 2);

        let total = service
            .add_menu_item(order.id(), MenuItem::MilkChocolate, 1)
            .await
            .unwrap();
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn test_add_zero_items_reports_current_total() {
        let service = service();
        let order = service.create_order(1, 1).await.unwrap();
        service
            .add_menu_item(order.id(), MenuItem::DarkChocolate, 2)
            .await
            .unwrap();

        let total = service
            .add_menu_item(order.id(), MenuItem::DarkChocolate, 0)
            .await
            .unwrap();

        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_add_item_to_unknown_order() {
        let service = service();
        let id = OrderId::new();

        let result = service.add_menu_item(id, MenuItem::DarkChocolate, 1).await;

        assert_eq!(result, Err(OrderError::NotFound(id)));
        assert!(service.view_order(id).is_empty());
        assert!(service.locks().is_empty());
    }

    #[tokio::test]
    async fn test_remove_items_from_unknown_order() {
        let service = service();
        let id = OrderId::new();

        let result = service.remove_items("dark chocolate", id, 1).await;

        assert_eq!(result, Err(OrderError::NotFound(id)));
    }

    #[tokio::test]
    async fn test_logger_sees_running_totals() {
        let logger = RecordingLogger::default();
        let lines = Arc::clone(&logger.lines);
        let service = OrderService::in_memory(ServiceConfig::default()).with_logger(logger);
        let order = service.create_order(1, 1).await.unwrap();

        service
            .add_menu_item(order.id(), MenuItem::MilkChocolate, 2)
            .await
            .unwrap();
        service
            .remove_items("milk chocolate", order.id(), 1)
            .await
            .unwrap();
        service.cancel_order(order.id()).await.unwrap();

        assert_eq!(
            *lines.lock().unwrap(),
            vec![
                "added milk chocolate -> 1",
                "added milk chocolate -> 2",
                "removed 1 milk chocolate -> 1",
                "cancelled with 1",
            ]
        );
    }

    #[tokio::test]
    async fn test_panicking_logger_does_not_abort_operations() {
        let service = OrderService::in_memory(ServiceConfig::default()).with_logger(PanickingLogger);
        let order = service.create_order(1, 1).await.unwrap();

        let total = service
            .add_menu_item(order.id(), MenuItem::DarkChocolate, 2)
            .await
            .unwrap();
        assert_eq!(total, 2);

        service.prepare_order(order.id()).await.unwrap();
        let outcome = service.deliver_order(order.id()).await.unwrap();

        assert!(outcome.is_delivered());
        assert!(service.find_order(order.id()).is_none());
    }

    #[tokio::test]
    async fn test_cancel_and_deliver_retire_lock_slots() {
        let service = service();
        let cancelled = service.create_order(1, 1).await.unwrap();
        let delivered = service.create_order(1, 2).await.unwrap();
        assert_eq!(service.locks().len(), 2);

        service.cancel_order(cancelled.id()).await.unwrap();
        service.prepare_order(delivered.id()).await.unwrap();
        service.deliver_order(delivered.id()).await.unwrap();

        assert!(service.locks().is_empty());
    }

    #[tokio::test]
    async fn test_strict_policy_rejects_moving_backwards() {
        let service = service();
        let order = service.create_order(1, 1).await.unwrap();
        service.prepare_order(order.id()).await.unwrap();

        let result = service.complete_order(order.id()).await;

        assert_eq!(
            result,
            Err(OrderError::InvalidTransition {
                current: OrderState::Prepared,
                action: "complete"
            })
        );
        assert_eq!(service.states().get(order.id()), Some(OrderState::Prepared));
    }

    #[tokio::test]
    async fn test_permissive_policy_overwrites_blindly() {
        let service = OrderService::in_memory(
            ServiceConfig::default().with_transitions(TransitionPolicy::Permissive),
        )
        .with_logger(NoopOrderLogger);
        let order = service.create_order(1, 1).await.unwrap();

        service.prepare_order(order.id()).await.unwrap();
        service.complete_order(order.id()).await.unwrap();

        assert_eq!(service.states().get(order.id()), Some(OrderState::Completed));
    }

    #[test]
    fn test_delivery_outcome_accessors() {
        let order = Order::new(1, 1);
        let delivered = DeliveryOutcome::Delivered(Delivery {
            order,
            items: vec!["dark chocolate".to_string()],
        });
        let not_ready = DeliveryOutcome::NotReady {
            state: Some(OrderState::Created),
        };

        assert!(delivered.is_delivered());
        assert!(!not_ready.is_delivered());
        assert_eq!(delivered.into_delivery().unwrap().order, order);
        assert!(not_ready.into_delivery().is_none());
    }

    #[tokio::test]
    async fn test_delivery_json_shape() {
        let service = service();
        let order = service.create_order(4, 12).await.unwrap();
        service
            .add_menu_item(order.id(), MenuItem::MilkChocolateHazelnuts, 2)
            .await
            .unwrap();
        service.prepare_order(order.id()).await.unwrap();

        let delivery = service
            .deliver_order(order.id())
            .await
            .unwrap()
            .into_delivery()
            .unwrap();

        assert_eq!(
            serde_json::to_value(&delivery).unwrap(),
            serde_json::json!({
                "order": {
                    "id": order.id().to_string(),
                    "building": 4,
                    "room": 12
                },
                "items": ["milk chocolate, hazelnuts", "milk chocolate, hazelnuts"]
            })
        );
    }
}
