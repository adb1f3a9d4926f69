// Copyright (c) Sienna Satterwhite, ordcore Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use getset::CopyGetters;

use crate::errs::{
    OrdError,
    Result,
};

/// If the heights of two sibling subtrees differ by this much or less, the
/// parent is considered balanced.
pub const ALLOWED_IMBALANCE: i32 = 1;

/// The default chance that a skip list node is promoted to the row above.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// The default cap on the number of rows in a skip list. With a fair coin
/// this is plenty for anything that fits in memory.
pub const DEFAULT_MAX_HEIGHT: usize = 32;

/// Tunables for a [`SkipList`](crate::skiplist::SkipList).
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
#[getset(get_copy = "pub with_prefix")]
pub struct SkipListConfig {
    /// Chance that a coin flip comes up heads.
    probability: f64,
    /// The list never grows past this many rows.
    max_height: usize,
    /// Fixed seed for the coin, `None` draws one from the OS.
    seed: Option<u64>,
}

impl Default for SkipListConfig {
    fn default() -> Self {
        SkipListConfig {
            probability: DEFAULT_PROBABILITY,
            max_height: DEFAULT_MAX_HEIGHT,
            seed: None,
        }
    }
}

impl SkipListConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probability(mut self, p: f64) -> Self {
        self.probability = p;
        self
    }

    pub fn max_height(mut self, max_height: usize) -> Self {
        self.max_height = max_height;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.probability > 0.0 && self.probability < 1.0) {
            return Err(OrdError::InvalidProbability(self.probability));
        }
        if self.max_height == 0 {
            return Err(OrdError::InvalidMaxHeight);
        }
        Ok(())
    }
}
