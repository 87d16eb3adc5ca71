//! Order activity notifications.

use common::{Order, Recipe};

/// Receives one-way notifications about order activity.
///
/// Implementations are best-effort sinks. They are called while the order's
/// lock is held, so they should return quickly; a panic inside a sink is
/// caught by the service and never aborts the operation that triggered it.
pub trait OrderLogger: Send + Sync {
    /// An item was added; `item_count` is the order's total afterwards.
    fn on_item_added(&self, order: &Order, recipe: &Recipe, item_count: usize);

    /// Items were removed; `item_count` is the order's total afterwards.
    fn on_items_removed(&self, order: &Order, description: &str, item_count: usize, removed: usize);

    /// The order is about to be cancelled while holding `item_count` items.
    fn on_cancelled(&self, order: &Order, item_count: usize);

    /// The order is going out for delivery with `item_count` items.
    fn on_delivered(&self, order: &Order, item_count: usize);
}

/// Writes order activity as structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingOrderLogger;

impl OrderLogger for TracingOrderLogger {
    fn on_item_added(&self, order: &Order, recipe: &Recipe, item_count: usize) {
        tracing::info!(
            order_id = %order.id(),
            building = order.building(),
            room = order.room(),
            menu_text = %recipe.menu_text(),
            item_count,
            "Added pancake to order"
        );
    }

    fn on_items_removed(&self, order: &Order, description: &str, item_count: usize, removed: usize) {
        tracing::info!(
            order_id = %order.id(),
            building = order.building(),
            room = order.room(),
            description,
            removed,
            item_count,
            "Removed items from order"
        );
    }

    fn on_cancelled(&self, order: &Order, item_count: usize) {
        tracing::info!(
            order_id = %order.id(),
            building = order.building(),
            room = order.room(),
            item_count,
            "Cancelled order"
        );
    }

    fn on_delivered(&self, order: &Order, item_count: usize) {
        tracing::info!(
            order_id = %order.id(),
            building = order.building(),
            room = order.room(),
            item_count,
            "Order out for delivery"
        );
    }
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOrderLogger;

impl OrderLogger for NoopOrderLogger {
    fn on_item_added(&self, _order: &Order, _recipe: &Recipe, _item_count: usize) {}

    fn on_items_removed(&self, _order: &Order, _description: &str, _item_count: usize, _removed: usize) {}

    fn on_cancelled(&self, _order: &Order, _item_count: usize) {}

    fn on_delivered(&self, _order: &Order, _item_count: usize) {}
}
