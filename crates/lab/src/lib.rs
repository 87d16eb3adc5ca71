//! Kitchen simulation for the order service.
//!
//! Spawns a number of workers that each place orders, fill them from the
//! menu, change their minds about some items and then either deliver or
//! cancel them, all against one shared [`OrderService`].

pub mod config;

use std::sync::Arc;

use domain::{LocationBounds, MenuItem, OrderError, OrderLogger, OrderService};
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinError;

pub use config::{Config, LogFormat};

/// Errors that stop a simulation run.
#[derive(Debug, Error)]
pub enum LabError {
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Worker failed: {0}")]
    Worker(#[from] JoinError),
}

/// What happened during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub orders_created: usize,
    pub orders_delivered: usize,
    pub orders_cancelled: usize,
    pub items_delivered: usize,
}

impl Summary {
    fn merge(mut self, other: Summary) -> Summary {
        self.orders_created += other.orders_created;
        self.orders_delivered += other.orders_delivered;
        self.orders_cancelled += other.orders_cancelled;
        self.items_delivered += other.items_delivered;
        self
    }
}

/// Runs the simulation with `config.workers` concurrent workers.
pub async fn run(config: &Config, logger: impl OrderLogger + 'static) -> Result<Summary, LabError> {
    let service = Arc::new(OrderService::in_memory(config.service).with_logger(logger));

    let handles: Vec<_> = (0..config.workers)
        .map(|worker| {
            let service = Arc::clone(&service);
            let orders = config.orders_per_worker;
            tokio::spawn(async move { work(&service, worker, orders).await })
        })
        .collect();

    let mut summary = Summary::default();
    for handle in handles {
        summary = summary.merge(handle.await??);
    }

    metrics::gauge!("lab_open_orders").set(service.orders().len() as f64);
    tracing::info!(
        created = summary.orders_created,
        delivered = summary.orders_delivered,
        cancelled = summary.orders_cancelled,
        items = summary.items_delivered,
        "simulation finished"
    );
    Ok(summary)
}

#[tracing::instrument(skip(service))]
async fn work(service: &OrderService, worker: usize, orders: usize) -> Result<Summary, LabError> {
    let mut summary = Summary::default();
    let bounds = service.config().bounds;

    for n in 0..orders {
        let (building, room) = location(&bounds, worker, n);
        let order = service.create_order(building, room).await?;
        summary.orders_created += 1;

        let first = MenuItem::ALL[(worker + n) % MenuItem::ALL.len()];
        let second = MenuItem::ALL[(worker + 2 * n + 1) % MenuItem::ALL.len()];
        service.add_menu_item(order.id(), first, 2).await?;
        service.add_menu_item(order.id(), second, 1).await?;
        service
            .remove_items(first.recipe().description(), order.id(), 1)
            .await?;

        if n % 5 == 4 {
            service.cancel_order(order.id()).await?;
            summary.orders_cancelled += 1;
            continue;
        }

        if n % 2 == 0 {
            service.complete_order(order.id()).await?;
        }
        service.prepare_order(order.id()).await?;

        if let Some(delivery) = service.deliver_order(order.id()).await?.into_delivery() {
            summary.orders_delivered += 1;
            summary.items_delivered += delivery.items.len();
        }
    }

    Ok(summary)
}

/// Spreads orders over the configured buildings and rooms.
fn location(bounds: &LocationBounds, worker: usize, n: usize) -> (u32, u32) {
    let spread = |min: u32, max: u32, k: usize| {
        let width = max.saturating_sub(min) as usize + 1;
        min + (k % width) as u32
    };
    (
        spread(bounds.min_building, bounds.max_building, worker),
        spread(bounds.min_room, bounds.max_room, n),
    )
}
