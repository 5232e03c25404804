//! Order book infrastructure module
//!
//! Contains the order arena, price levels, bid book, ask book, and the level
//! aggregate index.

pub mod arena;
pub mod ask_book;
pub mod bid_book;
pub mod level_index;
pub mod price_level;

pub use arena::{OrderArena, OrderHandle};
pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use level_index::{LevelAction, LevelData, LevelIndex};
pub use price_level::PriceLevel;
