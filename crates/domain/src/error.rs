//! Domain error types.

use common::{OrderId, OrderState, RecipeError};
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur during order operations.
///
/// Every variant is an expected outcome of bad caller input; none of them is
/// retried or rolled back internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The order id does not resolve to a live order.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// Building or room outside the configured bounds.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A recipe was built without ingredients.
    #[error("Invalid recipe: {0}")]
    InvalidRecipe(#[from] RecipeError),

    /// The order is already past the requested state.
    #[error("Invalid state transition: cannot {action} from {current} state")]
    InvalidTransition {
        current: OrderState,
        action: &'static str,
    },
}
