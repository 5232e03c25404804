//! Order lifecycle types
//!
//! An order is a value object: identity, side, type, limit price, and
//! initial/remaining quantity. It mutates in exactly two ways: a partial or
//! full fill during matching, and the admission-time conversion of a Market
//! order into a FillAndKill priced at the worst opposite level.

use crate::errors::OrderError;
use crate::ids::OrderId;
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Time-in-force and execution policy for orders.
///
/// A small closed set; behaviour differences live in admission and
/// post-match branches, not in a trait hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Rests until filled or explicitly cancelled
    GoodTillCancel,
    /// Trade what crosses now, cancel any residue
    FillAndKill,
    /// Trade the full amount now or reject entirely
    FillOrKill,
    /// Rests until session close, then swept by the pruner
    GoodForDay,
    /// Price-insensitive; repriced at the worst opposite level on admission
    Market,
}

/// A live order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    order_type: OrderType,
    order_id: OrderId,
    side: Side,
    price: Price,
    initial_quantity: Quantity,
    remaining_quantity: Quantity,
}

impl Order {
    /// Create a new order.
    ///
    /// # Panics
    /// Panics if the quantity is zero.
    pub fn new(
        order_type: OrderType,
        order_id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        assert!(!quantity.is_zero(), "Order quantity must be positive");
        Self {
            order_type,
            order_id,
            side,
            price,
            initial_quantity: quantity,
            remaining_quantity: quantity,
        }
    }

    /// Create a Market order. Its price is the invalid sentinel until
    /// admission reprices it at the worst opposite level.
    ///
    /// # Panics
    /// Panics if the quantity is zero.
    pub fn market(order_id: OrderId, side: Side, quantity: Quantity) -> Self {
        Self::new(OrderType::Market, order_id, side, Price::INVALID, quantity)
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn initial_quantity(&self) -> Quantity {
        self.initial_quantity
    }

    pub fn remaining_quantity(&self) -> Quantity {
        self.remaining_quantity
    }

    pub fn filled_quantity(&self) -> Quantity {
        self.initial_quantity - self.remaining_quantity
    }

    /// Check if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    /// Fill the order by `quantity`.
    ///
    /// The matching loop only ever fills by `min` of the two front orders'
    /// remaining quantities, so an `InvalidFill` here is an internal
    /// invariant violation.
    pub fn fill(&mut self, quantity: Quantity) -> Result<(), OrderError> {
        if quantity > self.remaining_quantity {
            return Err(OrderError::InvalidFill {
                order_id: self.order_id,
                requested: quantity,
                remaining: self.remaining_quantity,
            });
        }
        self.remaining_quantity -= quantity;
        Ok(())
    }

    /// Convert a Market order into a FillAndKill bounded at `price`.
    ///
    /// Only Market orders can be repriced, and only at a tradable price.
    pub fn to_fill_and_kill(&mut self, price: Price) -> Result<(), OrderError> {
        if self.order_type != OrderType::Market || !price.is_valid() {
            return Err(OrderError::InvalidMarketAdjustment {
                order_id: self.order_id,
            });
        }
        self.price = price;
        self.order_type = OrderType::FillAndKill;
        Ok(())
    }
}

/// A request to modify a resting order.
///
/// Applied as cancel + add with the original order's type and side, so the
/// modified order goes to the back of its new price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderModify {
    order_id: OrderId,
    price: Price,
    quantity: Quantity,
}

impl OrderModify {
    pub fn new(order_id: OrderId, price: Price, quantity: Quantity) -> Self {
        Self {
            order_id,
            price,
            quantity,
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Build the replacement order, keeping the original type and side.
    pub fn into_order(self, order_type: OrderType, side: Side) -> Order {
        Order::new(order_type, self.order_id, side, self.price, self.quantity)
    }
}
