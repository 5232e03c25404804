//! Single-symbol limit order book matching engine
//!
//! Accepts order submissions, modifications, and cancellations; maintains
//! price-ordered bid and ask books with FIFO time priority inside each
//! level; and produces a stream of trades from matched liquidity.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced
//! - Deterministic matching (same inputs → same outputs)
//! - The book is never left crossed after an operation settles
//! - Conservation of quantity across every fill
//!
//! Order types: GoodTillCancel, FillAndKill, FillOrKill, GoodForDay (swept
//! at session close by a background pruner), and Market (admitted as a
//! FillAndKill priced at the worst opposite resting level).

pub mod book;
pub mod engine;
pub mod matching;
pub mod pruner;
pub mod snapshot;

pub use engine::MatchingEngine;
pub use pruner::SessionSchedule;
pub use snapshot::{BookSnapshot, LevelInfo};
