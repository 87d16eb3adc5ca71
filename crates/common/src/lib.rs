//! Shared types for the order management workspace.
//!
//! These are the plain values that every layer passes around:
//! - [`OrderId`], the identity of an order
//! - [`Order`], the immutable identity + location record
//! - [`OrderState`], the lifecycle state of a live order
//! - [`Ingredient`] and [`Recipe`], the line items attached to an order

mod order;
mod recipe;
mod state;
mod types;

pub use order::Order;
pub use recipe::{Ingredient, Recipe, RecipeError};
pub use state::OrderState;
pub use types::OrderId;
