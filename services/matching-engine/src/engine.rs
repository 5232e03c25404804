//! Matching engine core
//!
//! [`Book`] owns the two price-ordered sides, the identity index, and the
//! level aggregate index, and runs the matching loop. [`MatchingEngine`] is
//! the public facade: a single mutex serialises every mutating and reading
//! operation, and a background pruner sweeps GoodForDay orders at session
//! close.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, trace};

use crate::book::{
    AskBook, BidBook, LevelAction, LevelIndex, OrderArena, OrderHandle, PriceLevel,
};
use crate::matching::crossing;
use crate::pruner::{self, SessionSchedule};
use crate::snapshot::{BookSnapshot, LevelInfo};
use types::errors::EngineError;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderModify, OrderType, Side};
use types::trade::{Trade, TradeInfo, Trades};

/// Book state guarded by the facade's mutex.
///
/// Invariants, restored before every public operation returns:
/// - every live order appears in exactly one price level and has exactly one
///   identity-index entry pointing at it;
/// - the best bid is strictly below the best ask, or a side is empty;
/// - the level aggregate index matches the sum of remaining quantities at
///   each resting price.
pub(crate) struct Book {
    arena: OrderArena,
    bids: BidBook,
    asks: AskBook,
    levels: LevelIndex,
    /// Identity index: order id → arena handle (which is also the order's
    /// position within its price level)
    orders: HashMap<OrderId, OrderHandle>,
}

impl Book {
    pub(crate) fn new() -> Self {
        Self {
            arena: OrderArena::new(),
            bids: BidBook::new(),
            asks: AskBook::new(),
            levels: LevelIndex::new(),
            orders: HashMap::new(),
        }
    }

    /// Admit an order and run the matching loop.
    ///
    /// Returns the trades the order produced. An empty list means either no
    /// cross or a rejection: duplicate id, Market order against an empty
    /// opposite side, FillAndKill with nothing to match, or FillOrKill that
    /// cannot be completely filled.
    pub(crate) fn add_order(&mut self, mut order: Order) -> Result<Trades, EngineError> {
        if self.orders.contains_key(&order.order_id()) {
            debug!(order_id = %order.order_id(), "add rejected: duplicate order id");
            return Ok(Trades::new());
        }

        // A Market order becomes a FillAndKill sweep bounded by the depth
        // currently shown on the opposite side.
        if order.order_type() == OrderType::Market {
            let worst = match order.side() {
                Side::Buy => self.asks.worst_price(),
                Side::Sell => self.bids.worst_price(),
            };
            let Some(worst) = worst else {
                debug!(order_id = %order.order_id(), "add rejected: market order against empty book");
                return Ok(Trades::new());
            };
            order.to_fill_and_kill(worst)?;
        }

        if order.order_type() == OrderType::FillAndKill
            && !crossing::can_match(order.side(), order.price(), &self.bids, &self.asks)
        {
            debug!(order_id = %order.order_id(), "add rejected: fill-and-kill has no match");
            return Ok(Trades::new());
        }

        if order.order_type() == OrderType::FillOrKill
            && !crossing::can_fully_fill(
                order.side(),
                order.price(),
                order.remaining_quantity(),
                &self.bids,
                &self.asks,
                &self.levels,
            )
        {
            debug!(order_id = %order.order_id(), "add rejected: fill-or-kill not fully fillable");
            return Ok(Trades::new());
        }

        let order_id = order.order_id();
        let side = order.side();
        let price = order.price();
        let quantity = order.remaining_quantity();

        let handle = self.arena.insert(order);
        match side {
            Side::Buy => self.bids.insert(&mut self.arena, price, handle),
            Side::Sell => self.asks.insert(&mut self.arena, price, handle),
        }
        self.orders.insert(order_id, handle);
        self.levels.update(price, quantity, LevelAction::Add);

        self.match_orders()
    }

    /// Cancel a resting order. Unknown ids are a no-op.
    pub(crate) fn cancel_order(&mut self, order_id: OrderId) {
        let Some(&handle) = self.orders.get(&order_id) else {
            debug!(%order_id, "cancel for unknown order id");
            return;
        };
        self.remove_resting(order_id, handle);
    }

    /// Bulk-cancel path used by the pruner: one lock acquisition, many ids.
    pub(crate) fn cancel_orders(&mut self, order_ids: &[OrderId]) {
        for &order_id in order_ids {
            self.cancel_order(order_id);
        }
    }

    /// Remove a live order from its level, the identity index, and the
    /// level aggregate index.
    fn remove_resting(&mut self, order_id: OrderId, handle: OrderHandle) {
        let (side, price, remaining) = {
            let order = self.arena.get(handle);
            (order.side(), order.price(), order.remaining_quantity())
        };

        self.orders.remove(&order_id);
        match side {
            Side::Buy => {
                if let Some(level) = self.bids.level_mut(price) {
                    level.unlink(&mut self.arena, handle);
                }
                self.bids.remove_level_if_empty(price);
            }
            Side::Sell => {
                if let Some(level) = self.asks.level_mut(price) {
                    level.unlink(&mut self.arena, handle);
                }
                self.asks.remove_level_if_empty(price);
            }
        }
        // Remaining quantity, not initial: the aggregate must stay equal to
        // the sum of live remainders at this price.
        self.levels.update(price, remaining, LevelAction::Remove);
        self.arena.remove(handle);
    }

    /// Type and side of a live order, for the modify path.
    pub(crate) fn order_signature(&self, order_id: OrderId) -> Option<(OrderType, Side)> {
        self.orders.get(&order_id).map(|&handle| {
            let order = self.arena.get(handle);
            (order.order_type(), order.side())
        })
    }

    /// Ids of all resting GoodForDay orders.
    pub(crate) fn good_for_day_ids(&self) -> Vec<OrderId> {
        self.orders
            .iter()
            .filter(|&(_, &handle)| self.arena.get(handle).order_type() == OrderType::GoodForDay)
            .map(|(&order_id, _)| order_id)
            .collect()
    }

    /// Number of live orders.
    pub(crate) fn size(&self) -> usize {
        self.orders.len()
    }

    pub(crate) fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    pub(crate) fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Summarise both sides, recomputing each level's quantity by summation
    /// over its live orders.
    pub(crate) fn snapshot(&self) -> BookSnapshot {
        let arena = &self.arena;
        let summarise = |(price, level): (Price, &PriceLevel)| {
            let quantity: Quantity = level.iter(arena).map(Order::remaining_quantity).sum();
            LevelInfo::new(price, quantity)
        };
        BookSnapshot {
            bids: self.bids.iter().map(summarise).collect(),
            asks: self.asks.iter().map(summarise).collect(),
        }
    }

    /// Consume the top of both books while they cross, emitting trades in
    /// the order they are produced.
    fn match_orders(&mut self) -> Result<Trades, EngineError> {
        let mut trades = Trades::new();

        loop {
            let (Some(bid_price), Some(ask_price)) =
                (self.bids.best_price(), self.asks.best_price())
            else {
                break;
            };
            if bid_price < ask_price {
                break;
            }

            // Work through the two front queues; every pass fully fills at
            // least one order, so one of the levels eventually empties.
            loop {
                let Some(bid_handle) = self.bids.level(bid_price).and_then(PriceLevel::front)
                else {
                    break;
                };
                let Some(ask_handle) = self.asks.level(ask_price).and_then(PriceLevel::front)
                else {
                    break;
                };

                let quantity = self
                    .arena
                    .get(bid_handle)
                    .remaining_quantity()
                    .min(self.arena.get(ask_handle).remaining_quantity());

                self.arena.get_mut(bid_handle).fill(quantity)?;
                self.arena.get_mut(ask_handle).fill(quantity)?;

                let (bid_id, bid_filled) = {
                    let order = self.arena.get(bid_handle);
                    (order.order_id(), order.is_filled())
                };
                let (ask_id, ask_filled) = {
                    let order = self.arena.get(ask_handle);
                    (order.order_id(), order.is_filled())
                };

                trades.push(Trade::new(
                    TradeInfo::new(bid_id, bid_price),
                    TradeInfo::new(ask_id, ask_price),
                    quantity,
                ));
                trace!(bid = %bid_id, ask = %ask_id, %quantity, "trade");

                let bid_action = if bid_filled {
                    LevelAction::Remove
                } else {
                    LevelAction::Match
                };
                let ask_action = if ask_filled {
                    LevelAction::Remove
                } else {
                    LevelAction::Match
                };
                self.levels.update(bid_price, quantity, bid_action);
                self.levels.update(ask_price, quantity, ask_action);

                if bid_filled {
                    if let Some(level) = self.bids.level_mut(bid_price) {
                        level.pop_front(&mut self.arena);
                    }
                    self.orders.remove(&bid_id);
                    self.arena.remove(bid_handle);
                }
                if ask_filled {
                    if let Some(level) = self.asks.level_mut(ask_price) {
                        level.pop_front(&mut self.arena);
                    }
                    self.orders.remove(&ask_id);
                    self.arena.remove(ask_handle);
                }
            }

            self.bids.remove_level_if_empty(bid_price);
            self.asks.remove_level_if_empty(ask_price);
        }

        // A FillAndKill aggressor that only partially filled must not rest:
        // if one is still fronting a side, it is the residue of this call.
        if let Some(handle) = self.bids.best_front() {
            let order = self.arena.get(handle);
            if order.order_type() == OrderType::FillAndKill {
                let order_id = order.order_id();
                self.remove_resting(order_id, handle);
            }
        }
        if let Some(handle) = self.asks.best_front() {
            let order = self.arena.get(handle);
            if order.order_type() == OrderType::FillAndKill {
                let order_id = order.order_id();
                self.remove_resting(order_id, handle);
            }
        }

        Ok(trades)
    }
}

/// State shared between the facade and the pruner thread.
pub(crate) struct Shared {
    pub(crate) book: Mutex<Book>,
    pub(crate) shutdown: AtomicBool,
    pub(crate) wakeup: Condvar,
}

/// Thread-safe order book facade.
///
/// All operations serialise on one internal mutex. Dropping the engine
/// signals and joins the pruner thread.
pub struct MatchingEngine {
    shared: Arc<Shared>,
    pruner: Option<JoinHandle<()>>,
}

impl MatchingEngine {
    /// Create an engine with the default session schedule (16:00 Eastern).
    pub fn new() -> Self {
        Self::with_schedule(SessionSchedule::default())
    }

    /// Create an engine whose pruner follows `schedule`.
    pub fn with_schedule(schedule: SessionSchedule) -> Self {
        let shared = Arc::new(Shared {
            book: Mutex::new(Book::new()),
            shutdown: AtomicBool::new(false),
            wakeup: Condvar::new(),
        });
        let pruner = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || pruner::run(&shared, &schedule))
        };
        Self {
            shared,
            pruner: Some(pruner),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Book> {
        self.shared
            .book
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Admit an order and return the trades it produced.
    ///
    /// See [`Book::add_order`] for the rejection conditions that yield an
    /// empty trade list.
    pub fn add_order(&self, order: Order) -> Result<Trades, EngineError> {
        self.lock().add_order(order)
    }

    /// Cancel a resting order. Unknown ids are a silent no-op.
    pub fn cancel_order(&self, order_id: OrderId) {
        self.lock().cancel_order(order_id);
    }

    /// Replace a resting order's price and quantity, keeping its type and
    /// side. Applied as cancel + add, so the order loses time priority.
    ///
    /// The lock is released between the lookup and the cancel + add pair; a
    /// concurrent cancel in that window simply turns this into a plain add
    /// with the fresh parameters.
    pub fn modify_order(&self, modify: OrderModify) -> Result<Trades, EngineError> {
        let signature = self.lock().order_signature(modify.order_id());
        let Some((order_type, side)) = signature else {
            return Ok(Trades::new());
        };
        self.cancel_order(modify.order_id());
        self.add_order(modify.into_order(order_type, side))
    }

    /// Number of live orders.
    pub fn size(&self) -> usize {
        self.lock().size()
    }

    /// Consistent snapshot of both sides.
    pub fn order_infos(&self) -> BookSnapshot {
        self.lock().snapshot()
    }

    /// Best (highest) resting bid price.
    pub fn best_bid(&self) -> Option<Price> {
        self.lock().best_bid()
    }

    /// Best (lowest) resting ask price.
    pub fn best_ask(&self) -> Option<Price> {
        self.lock().best_ask()
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MatchingEngine {
    fn drop(&mut self) {
        // Set the flag under the book lock: the pruner checks it while
        // holding the same lock, so the notify below cannot be lost between
        // its check and its wait.
        {
            let _guard = self.lock();
            self.shared.shutdown.store(true, Ordering::Release);
        }
        self.shared.wakeup.notify_all();
        if let Some(handle) = self.pruner.take() {
            let _ = handle.join();
        }
    }
}
