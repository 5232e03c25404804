//! Matching logic module
//!
//! Contains the admission predicates; the matching loop itself lives with
//! the book state in [`crate::engine`].

pub mod crossing;
