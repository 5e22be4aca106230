// src/oracle/mod.rs
//! Price capability used by the fallback estimator.
//!
//! The scorer's simplified model values output 1:1 in USD; the oracle exists
//! so the facade can convert gas/bridge costs and report sensible USD figures
//! without hardcoding a module-level price table. The static implementation
//! here is swappable for a live feed behind the same trait.

use alloy_primitives::Address;
use dashmap::DashMap;

/// Read-only price lookup keyed by `(chain_id, token_address)`.
/// Implementations must be cheap and non-blocking; callers treat a miss as
/// "price unknown", not as an error.
pub trait PriceOracle: Send + Sync {
    fn price_of(&self, chain_id: u64, token: Address) -> Option<f64>;
}

/// Static reference-price table. Eventually consistent by construction: an
/// updater may insert fresher prices concurrently with readers, and nothing
/// here is ever a correctness guarantee.
#[derive(Default)]
pub struct StaticPriceOracle {
    prices: DashMap<(u64, Address), f64>,
}

impl StaticPriceOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prices(entries: impl IntoIterator<Item = ((u64, Address), f64)>) -> Self {
        let oracle = Self::new();
        for (key, price) in entries {
            oracle.prices.insert(key, price);
        }
        oracle
    }

    pub fn set_price(&self, chain_id: u64, token: Address, usd: f64) {
        self.prices.insert((chain_id, token), usd);
    }
}

impl PriceOracle for StaticPriceOracle {
    fn price_of(&self, chain_id: u64, token: Address) -> Option<f64> {
        self.prices.get(&(chain_id, token)).map(|p| *p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_is_none_not_error() {
        let oracle = StaticPriceOracle::new();
        assert_eq!(oracle.price_of(43113, Address::ZERO), None);
    }

    #[test]
    fn set_then_get() {
        let oracle = StaticPriceOracle::new();
        oracle.set_price(43113, Address::ZERO, 25.0);
        assert_eq!(oracle.price_of(43113, Address::ZERO), Some(25.0));
        // keyed per chain: the same address on another chain stays unknown
        assert_eq!(oracle.price_of(80002, Address::ZERO), None);
    }
}
