// src/routing/mod.rs
//! Route optimizer core: path enumeration, swap-step simulation, scoring and
//! selection. Everything in here is pure, synchronous and CPU-bound; the
//! modules fail closed (empty vec / `None`) and leave recovery policy to the
//! quote facade.

pub mod enumerator;
pub mod scorer;
pub mod selector;
pub mod simulator;

pub use enumerator::{enumerate_paths, ChainPath};
pub use scorer::{classify_kind, score_path, Objective, RouteKind, RouteQuote};
pub use selector::select_best;
pub use simulator::{simulate_step, SwapStep};

/// Flat per-swap fee factor applied by the step simulator (0.3% DEX fee).
pub const DEX_FEE_FACTOR: f64 = 0.997;

/// Fixed reference input used when ranking exchanges for a step.
pub const REFERENCE_INPUT_AMOUNT: f64 = 1_000_000.0;

/// Wall-clock estimate per in-chain swap step.
pub const SECONDS_PER_SWAP: u64 = 15;

/// USD cost per 100k gas units in the simplified cost model.
pub const USD_PER_100K_GAS: f64 = 0.5;

/// Confidence never drops below this floor.
pub const MIN_CONFIDENCE: u8 = 60;

/// Cost profile of one bridge hop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BridgeProfile {
    pub avg_gas: u64,
    pub avg_time_secs: u64,
    pub cost_usd: f64,
}

/// Fast native bridging between two hub-capable chains.
pub const NATIVE_BRIDGE: BridgeProfile = BridgeProfile {
    avg_gas: 200_000,
    avg_time_secs: 60,
    cost_usd: 0.5,
};

/// Generic cross-chain messaging for any hop touching a non-hub-capable chain.
pub const MESSAGING_BRIDGE: BridgeProfile = BridgeProfile {
    avg_gas: 300_000,
    avg_time_secs: 300,
    cost_usd: 5.0,
};
