//! Error taxonomy for the matching engine
//!
//! Only internal invariant violations surface as errors. Recoverable
//! conditions (duplicate id on add, unknown id on cancel or modify, an order
//! rejected by its admission policy) are signalled by an empty trade list or
//! a silent no-op, never through this taxonomy.

use crate::ids::OrderId;
use crate::numeric::Quantity;
use thiserror::Error;

/// Order-level invariant violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error(
        "order {order_id} cannot be filled for more than its remaining \
         quantity (requested {requested}, remaining {remaining})"
    )]
    InvalidFill {
        order_id: OrderId,
        requested: Quantity,
        remaining: Quantity,
    },

    #[error("order {order_id} cannot have its price adjusted: only Market orders accept a tradable price")]
    InvalidMarketAdjustment { order_id: OrderId },
}

/// Top-level engine error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("order error: {0}")]
    Order(#[from] OrderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_fill_display() {
        let err = OrderError::InvalidFill {
            order_id: OrderId::new(9),
            requested: Quantity::new(5),
            remaining: Quantity::new(3),
        };
        let text = err.to_string();
        assert!(text.contains('9'));
        assert!(text.contains("requested 5"));
        assert!(text.contains("remaining 3"));
    }

    #[test]
    fn test_engine_error_from_order_error() {
        let order_err = OrderError::InvalidMarketAdjustment {
            order_id: OrderId::new(1),
        };
        let engine_err: EngineError = order_err.into();
        assert!(matches!(engine_err, EngineError::Order(_)));
    }
}
