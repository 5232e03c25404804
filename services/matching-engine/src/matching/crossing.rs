//! Admission predicates
//!
//! Determines whether an incoming order can trade against the current book:
//! the price-cross test used by FillAndKill admission, and the depth walk
//! used by the FillOrKill pre-check.

use crate::book::{AskBook, BidBook, LevelIndex};
use types::numeric::{Price, Quantity};
use types::order::Side;

/// Check whether an aggressor at `price` crosses the best opposite price.
///
/// For a buy, `price >= best ask`; for a sell, `price <= best bid`. False
/// when the opposite side is empty.
pub fn can_match(side: Side, price: Price, bids: &BidBook, asks: &AskBook) -> bool {
    match side {
        Side::Buy => asks.best_price().is_some_and(|best_ask| price >= best_ask),
        Side::Sell => bids.best_price().is_some_and(|best_bid| price <= best_bid),
    }
}

/// Check whether an aggressor of `quantity` at `price` would be completely
/// filled by the depth currently resting on the opposite side.
///
/// Walks the level aggregate index in its natural (unordered) iteration
/// order, skipping same-side levels (inside the spread relative to the best
/// opposite price) and levels beyond the aggressor's limit. Order does not
/// matter: quantity subtraction is commutative.
pub fn can_fully_fill(
    side: Side,
    price: Price,
    quantity: Quantity,
    bids: &BidBook,
    asks: &AskBook,
    levels: &LevelIndex,
) -> bool {
    if !can_match(side, price, bids, asks) {
        return false;
    }

    let threshold = match side {
        Side::Buy => asks.best_price(),
        Side::Sell => bids.best_price(),
    };

    let mut needed = quantity;
    for (level_price, data) in levels.iter() {
        let eligible = match side {
            // A level below the best ask belongs to the bid side; a level
            // above the limit is unaffordable.
            Side::Buy => threshold.is_some_and(|t| level_price >= t) && level_price <= price,
            Side::Sell => threshold.is_some_and(|t| level_price <= t) && level_price >= price,
        };
        if !eligible {
            continue;
        }

        if needed <= data.quantity() {
            return true;
        }
        needed -= data.quantity();
    }

    false
}
