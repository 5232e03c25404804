//! Read model for book observers
//!
//! An immutable summary of both sides: one `(price, quantity)` entry per
//! live level, bids highest-first, asks lowest-first. Quantities are
//! recomputed by summation over the live orders at snapshot time rather than
//! read from the level aggregate index, so the public read model cannot be
//! corrupted by aggregate drift.

use serde::{Deserialize, Serialize};
use types::numeric::{Price, Quantity};

/// Aggregate view of one price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub price: Price,
    pub quantity: Quantity,
}

impl LevelInfo {
    pub fn new(price: Price, quantity: Quantity) -> Self {
        Self { price, quantity }
    }
}

/// Consistent snapshot of both sides of the book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Bid levels, highest price first
    pub bids: Vec<LevelInfo>,
    /// Ask levels, lowest price first
    pub asks: Vec<LevelInfo>,
}

impl BookSnapshot {
    /// Best bid level, if any.
    pub fn best_bid(&self) -> Option<&LevelInfo> {
        self.bids.first()
    }

    /// Best ask level, if any.
    pub fn best_ask(&self) -> Option<&LevelInfo> {
        self.asks.first()
    }
}
