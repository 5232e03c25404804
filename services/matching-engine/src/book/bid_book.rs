//! Bid (buy-side) order book
//!
//! Maintains buy orders sorted by price descending (best bid first).
//! Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;

use super::arena::{OrderArena, OrderHandle};
use super::price_level::PriceLevel;
use types::numeric::Price;

/// Bid (buy) side order book.
///
/// Price levels sort ascending in the map; the best bid is the last key, the
/// worst bid the first. At each price level, orders are maintained in FIFO
/// order.
#[derive(Debug, Default)]
pub struct BidBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl BidBook {
    /// Create a new empty bid book
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Insert an order handle at the back of its price level.
    pub fn insert(&mut self, arena: &mut OrderArena, price: Price, handle: OrderHandle) {
        self.levels
            .entry(price)
            .or_default()
            .push_back(arena, handle);
    }

    /// Get the best bid price (highest)
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    /// Get the worst bid price (lowest). Bounds a Market sell sweep.
    pub fn worst_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// Borrow the level at a price.
    pub fn level(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    /// Mutably borrow the level at a price.
    pub fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Front order handle of the best bid level.
    pub fn best_front(&self) -> Option<OrderHandle> {
        self.levels
            .values()
            .next_back()
            .and_then(PriceLevel::front)
    }

    /// Drop the level at `price` if it holds no orders.
    pub fn remove_level_if_empty(&mut self, price: Price) {
        if self.levels.get(&price).is_some_and(PriceLevel::is_empty) {
            self.levels.remove(&price);
        }
    }

    /// Iterate levels best-first (highest price first).
    pub fn iter(&self) -> impl Iterator<Item = (Price, &PriceLevel)> {
        self.levels.iter().rev().map(|(price, level)| (*price, level))
    }

    /// Check if the bid book is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get the total number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
