//! Error types for the list, cursor and table layers.
//!
//! Misses (absent key, value not contained) are ordinary negative results
//! and never show up here.

use thiserror::Error;

/// Failures of positional `LinkedList` operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    #[error("index {index} out of range for list of length {len}")]
    InvalidIndex { index: usize, len: usize },
}

/// Failures of `ListCursor` operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    #[error("cursor is stale: the list changed after the cursor was positioned")]
    Stale,
    #[error("cursor used with a list it was not created from")]
    ForeignList,
    #[error("cursor is not positioned on an element")]
    NoCurrent,
    #[error("cursor has no next element")]
    Exhausted,
}

/// Failures of `HashTable` operations and construction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    #[error("invalid key: hash {0} is not positive")]
    InvalidKey(i64),
    #[error("cannot grow past {buckets} buckets")]
    CapacityExhausted { buckets: usize },
    #[error("invalid table configuration: {0}")]
    InvalidConfig(&'static str),
}
