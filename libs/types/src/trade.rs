//! Trade records
//!
//! A trade is the immutable record of one fill between the front bid and the
//! front ask. Each side keeps its own (order id, price) pair; the resting
//! side's price is the execution price.

use crate::ids::OrderId;
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// One side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeInfo {
    pub order_id: OrderId,
    pub price: Price,
}

impl TradeInfo {
    pub fn new(order_id: OrderId, price: Price) -> Self {
        Self { order_id, price }
    }
}

/// A matched fill between a bid and an ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    bid: TradeInfo,
    ask: TradeInfo,
    quantity: Quantity,
}

impl Trade {
    pub fn new(bid: TradeInfo, ask: TradeInfo, quantity: Quantity) -> Self {
        Self { bid, ask, quantity }
    }

    pub fn bid(&self) -> &TradeInfo {
        &self.bid
    }

    pub fn ask(&self) -> &TradeInfo {
        &self.ask
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }
}

/// The ordered sequence of trades produced by one add operation.
pub type Trades = Vec<Trade>;
