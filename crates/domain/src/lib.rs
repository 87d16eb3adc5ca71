//! Order lifecycle management.
//!
//! This crate provides:
//! - [`OrderService`], which creates orders, attaches and removes line items,
//!   advances orders through their states and delivers or cancels them
//! - [`OrderLocks`], the per-order lock registry the service runs under
//! - location validation, service configuration and activity loggers

pub mod config;
pub mod error;
pub mod locks;
pub mod logger;
pub mod order;
pub mod validation;

pub use common::{Ingredient, Order, OrderId, OrderState, Recipe, RecipeError};
pub use config::{ConfigError, ServiceConfig, TransitionPolicy};
pub use error::OrderError;
pub use locks::{OrderGuard, OrderLocks};
pub use logger::{NoopOrderLogger, OrderLogger, TracingOrderLogger};
pub use order::{Delivery, DeliveryOutcome, MenuItem, OrderService};
pub use validation::{LocationBounds, ValidationError};
