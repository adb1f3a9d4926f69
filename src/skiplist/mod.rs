//! A skip list keeps a sorted linked list and stacks progressively sparser
//! "express" rows on top of it, which gives expected `O(log n)` search,
//! insertion and removal without any rebalancing.
//!
//! The bottom row (row 0) contains every value, and each row `n > 0`
//! contains a random subset of the values on row `n - 1`. A value climbs one
//! row for every consecutive heads of a coin flip, so the chance that it
//! reaches row `n` is `p` times the chance of reaching row `n - 1`.
//!
//! The coin is a type parameter. The default [`Coin`] is a seeded or
//! entropy-seeded Bernoulli draw, and any `FnMut() -> bool` works too, which
//! is handy for building an exact shape in tests.

mod coin;
#[allow(clippy::module_inception)]
pub mod skiplist;
mod skipnode;

pub use coin::{
    Coin,
    CoinFlip,
};
pub use skiplist::{
    Iter,
    SkipList,
};
