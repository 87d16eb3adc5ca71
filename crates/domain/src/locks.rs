//! Per-order mutual exclusion.

use std::sync::Arc;

use common::OrderId;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type Slot = Arc<Mutex<()>>;

/// A registry of one lock per live order id.
///
/// Slots are created on first use and retired when an order ends. A caller
/// that was waiting on a slot while it was retired notices after acquiring
/// it (the map no longer holds that slot) and starts over with the current
/// one, so two holders can never run concurrently for the same id.
#[derive(Default)]
pub struct OrderLocks {
    slots: DashMap<OrderId, Slot>,
}

impl OrderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `order_id`.
    pub async fn acquire(&self, order_id: OrderId) -> OrderGuard<'_> {
        loop {
            let slot = self
                .slots
                .entry(order_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value()
                .clone();
            let guard = Arc::clone(&slot).lock_owned().await;

            let still_current = self
                .slots
                .get(&order_id)
                .is_some_and(|held| Arc::ptr_eq(held.value(), &slot));
            if still_current {
                return OrderGuard {
                    locks: self,
                    order_id,
                    slot,
                    _guard: guard,
                };
            }

            metrics::counter!("order_lock_retries_total").increment(1);
            tracing::trace!(%order_id, "lock slot retired while waiting, retrying");
        }
    }

    /// Number of ids that currently have a lock slot.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Exclusive access to one order id. Released on drop.
pub struct OrderGuard<'a> {
    locks: &'a OrderLocks,
    order_id: OrderId,
    slot: Slot,
    _guard: OwnedMutexGuard<()>,
}

impl OrderGuard<'_> {
    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Releases the lock and discards the id's slot.
    ///
    /// Used once the order no longer exists. The slot is removed while it is
    /// still held, and only if it has not already been replaced.
    pub fn retire(self) {
        self.locks
            .slots
            .remove_if(&self.order_id, |_, held| Arc::ptr_eq(held, &self.slot));
    }
}
