use rand::prelude::*;

use crate::{
    config::DEFAULT_PROBABILITY,
    errs::{
        OrdError,
        Result,
    },
};

/// Upon the insertion of a new node in the list, the node is replicated to
/// the row above for as long as a `CoinFlip` keeps coming up heads.
pub trait CoinFlip {
    /// Flip the coin once. `true` is heads.
    fn flip(&mut self) -> bool;
}

impl<F> CoinFlip for F
where
    F: FnMut() -> bool,
{
    fn flip(&mut self) -> bool {
        self()
    }
}

/// A Bernoulli coin which comes up heads with probability `p`.
///
/// Chaining flips gives a geometric distribution: the chance a node reaches
/// row `n` is `p` times the chance it reaches row `n-1`.
#[derive(Debug, Clone)]
pub struct Coin {
    p: f64,
    rng: SmallRng, // Fast generator
}

impl Coin {
    /// Create a new coin with `p` as the probability of heads.
    ///
    /// # Panics
    ///
    /// `p` must be between 0 and 1 and will panic otherwise.
    pub fn new(p: f64) -> Self {
        match Self::try_new(p) {
            | Ok(coin) => coin,
            | Err(e) => panic!("{}", e),
        }
    }

    pub fn try_new(p: f64) -> Result<Self> {
        Self::check(p)?;
        Ok(Coin {
            p,
            rng: SmallRng::from_entropy(),
        })
    }

    /// A coin with a fixed seed, so the same sequence of flips is replayed on
    /// every run.
    pub fn seeded(p: f64, seed: u64) -> Result<Self> {
        Self::check(p)?;
        Ok(Coin {
            p,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// An unbiased coin.
    pub fn fair() -> Self {
        Coin {
            p: DEFAULT_PROBABILITY,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn probability(&self) -> f64 {
        self.p
    }

    fn check(p: f64) -> Result<()> {
        if p > 0.0 && p < 1.0 {
            Ok(())
        } else {
            Err(OrdError::InvalidProbability(p))
        }
    }
}

impl Default for Coin {
    fn default() -> Self {
        Self::fair()
    }
}

impl CoinFlip for Coin {
    fn flip(&mut self) -> bool {
        self.rng.gen_bool(self.p)
    }
}
