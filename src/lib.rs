//! Ordered in-memory containers over any `Ord` element type. Both keep
//! duplicates and are plain single-threaded values which own all of their
//! nodes. [`AvlTree`] answers `contains` in `O(log n)` worst case,
//! [`SkipList`] in `O(log n)` expected time.

/// A height-balanced binary search tree.
pub mod avl;

/// A [`skip list`] with an injectable coin.
///
/// [`skip list`]: https://en.wikipedia.org/wiki/Skip_list
pub mod skiplist;

pub mod config;
pub mod errs;

pub use avl::AvlTree;
pub use config::SkipListConfig;
pub use errs::{
    OrdError,
    Result,
};
pub use skiplist::{
    Coin,
    CoinFlip,
    SkipList,
};
