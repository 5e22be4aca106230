// src/routing/scorer.rs
//! Multi-criteria scoring of candidate paths.
//!
//! Output compounds the per-step fee factor across every chain; bridging is
//! lossless in token amount, its cost lands in the USD column instead. Hop
//! classification (native bridge vs generic messaging) comes exclusively from
//! the registry's hub-capability predicate.

use super::enumerator::ChainPath;
use super::{
    BridgeProfile, DEX_FEE_FACTOR, MESSAGING_BRIDGE, MIN_CONFIDENCE, NATIVE_BRIDGE,
    SECONDS_PER_SWAP, USD_PER_100K_GAS,
};
use crate::registry::ChainRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ranking objective for a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    MaxNetValue,
    FastestTime,
}

/// Closed route classification derived from endpoint hub-capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteKind {
    /// Single-chain swap, no bridge involved.
    SameChain,
    /// Both endpoints hub-capable: fast native bridge end to end.
    DirectBridge,
    /// Neither endpoint hub-capable: generic cross-chain messaging.
    HubBridge,
    /// Hub-capable source to ordinary destination.
    HybridFromHub,
    /// Ordinary source to hub-capable destination.
    HybridToHub,
}

impl RouteKind {
    pub fn label(&self) -> &'static str {
        match self {
            RouteKind::SameChain => "local-swap",
            RouteKind::DirectBridge => "direct-bridge",
            RouteKind::HubBridge => "hub-bridge",
            RouteKind::HybridFromHub => "bridge-then-hub",
            RouteKind::HybridToHub => "hub-then-bridge",
        }
    }

    pub fn is_bridged(&self) -> bool {
        !matches!(self, RouteKind::SameChain)
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scored result for one candidate path. Value type; immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteQuote {
    /// Expected output in destination-token units.
    pub expected_output: f64,
    pub estimated_gas: u64,
    pub estimated_time_secs: u64,
    /// 0-100, monotone non-increasing in chain and step count.
    pub confidence: u8,
    pub path: ChainPath,
    pub net_value_usd: f64,
    pub objective: Objective,
    pub kind: RouteKind,
}

/// Classifies a route purely from the hub-capability of its two endpoints.
pub fn classify_kind(registry: &ChainRegistry, from_chain: u64, to_chain: u64) -> RouteKind {
    if from_chain == to_chain {
        return RouteKind::SameChain;
    }
    match (
        registry.is_hub_capable(from_chain),
        registry.is_hub_capable(to_chain),
    ) {
        (true, true) => RouteKind::DirectBridge,
        (true, false) => RouteKind::HybridFromHub,
        (false, true) => RouteKind::HybridToHub,
        (false, false) => RouteKind::HubBridge,
    }
}

/// Profile of the hop between two adjacent chains in a path.
pub fn hop_profile(registry: &ChainRegistry, from_chain: u64, to_chain: u64) -> BridgeProfile {
    if registry.is_hub_capable(from_chain) && registry.is_hub_capable(to_chain) {
        NATIVE_BRIDGE
    } else {
        MESSAGING_BRIDGE
    }
}

pub fn gas_cost_usd(gas_units: u64) -> f64 {
    (gas_units as f64 / 100_000.0) * USD_PER_100K_GAS
}

/// Summed fixed bridge fees across every hop of a path.
pub fn bridge_cost_usd(registry: &ChainRegistry, path: &ChainPath) -> f64 {
    hops(path)
        .map(|(a, b)| hop_profile(registry, a, b).cost_usd)
        .sum()
}

fn hops(path: &ChainPath) -> impl Iterator<Item = (u64, u64)> + '_ {
    path.chains
        .windows(2)
        .map(|pair| (pair[0].chain_id, pair[1].chain_id))
}

/// Scores one candidate path for a given input amount.
pub fn score_path(
    registry: &ChainRegistry,
    path: &ChainPath,
    amount_in: f64,
    objective: Objective,
) -> RouteQuote {
    let steps = path.step_count();

    // Fees compound multiplicatively, one factor per step across all chains.
    let expected_output = amount_in * DEX_FEE_FACTOR.powi(steps as i32);

    let step_gas: u64 = path
        .steps_per_chain
        .iter()
        .flatten()
        .map(|s| s.estimated_gas)
        .sum();
    let hop_gas: u64 = hops(path)
        .map(|(a, b)| hop_profile(registry, a, b).avg_gas)
        .sum();
    let estimated_gas = step_gas + hop_gas;

    let hop_time: u64 = hops(path)
        .map(|(a, b)| hop_profile(registry, a, b).avg_time_secs)
        .sum();
    let estimated_time_secs = steps as u64 * SECONDS_PER_SWAP + hop_time;

    let penalty = 10 * (path.chain_count() as i64 - 1) + 5 * steps as i64;
    let confidence = (100 - penalty).max(MIN_CONFIDENCE as i64) as u8;

    // Simplified 1:1 output valuation; a production system prices the
    // destination token through the oracle.
    let output_value_usd = expected_output;
    let total_cost_usd = gas_cost_usd(estimated_gas) + bridge_cost_usd(registry, path);
    let net_value_usd = (output_value_usd - total_cost_usd).max(0.0);

    let kind = if path.chain_count() == 1 {
        RouteKind::SameChain
    } else {
        classify_kind(
            registry,
            path.chains[0].chain_id,
            path.chains[path.chains.len() - 1].chain_id,
        )
    };

    RouteQuote {
        expected_output,
        estimated_gas,
        estimated_time_secs,
        confidence,
        path: path.clone(),
        net_value_usd,
        objective,
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::enumerator::enumerate_paths;
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;

    fn registry() -> ChainRegistry {
        ChainRegistry::default_testnets()
    }

    fn quote_for(from: u64, to: u64, token_in: &str, token_out: &str, amount: f64) -> Vec<RouteQuote> {
        let registry = registry();
        let a = registry.resolve_token_address(from, token_in).unwrap();
        let b = registry.resolve_token_address(to, token_out).unwrap();
        enumerate_paths(&registry, from, to, a, b)
            .iter()
            .map(|p| score_path(&registry, p, amount, Objective::MaxNetValue))
            .collect()
    }

    #[test]
    fn same_chain_output_compounds_one_fee() {
        let quotes = quote_for(43113, 43113, "WAVAX", "USDC", 100.0);
        assert_eq!(quotes.len(), 1);
        assert_approx_eq!(quotes[0].expected_output, 100.0 * 0.997, 1e-9);
        assert_eq!(quotes[0].kind, RouteKind::SameChain);
    }

    #[test]
    fn net_value_is_never_negative() {
        // A dust-sized amount cannot cover bridge costs; the clamp holds.
        for quote in quote_for(421614, 80002, "WETH", "WMATIC", 0.001) {
            assert!(quote.net_value_usd >= 0.0);
        }
    }

    #[test]
    fn confidence_is_monotone_in_path_complexity() {
        let registry = registry();
        let usdc_fuji = registry.resolve_token_address(43113, "USDC").unwrap();
        let wavax = registry.resolve_token_address(43113, "WAVAX").unwrap();
        let one_chain = &enumerate_paths(&registry, 43113, 43113, wavax, usdc_fuji)[0];

        let weth = registry.resolve_token_address(421614, "WETH").unwrap();
        let wmatic = registry.resolve_token_address(80002, "WMATIC").unwrap();
        let cross = enumerate_paths(&registry, 421614, 80002, weth, wmatic);
        let two_chain = &cross[0];
        let three_chain = &cross[1];
        assert_eq!(two_chain.chain_count(), 2);
        assert_eq!(three_chain.chain_count(), 3);

        let c1 = score_path(&registry, one_chain, 100.0, Objective::MaxNetValue).confidence;
        let c2 = score_path(&registry, two_chain, 100.0, Objective::MaxNetValue).confidence;
        let c3 = score_path(&registry, three_chain, 100.0, Objective::MaxNetValue).confidence;
        assert!(c3 <= c2 && c2 <= c1);
        assert!(c3 >= MIN_CONFIDENCE);
    }

    #[test]
    fn hub_hops_are_cheaper_and_faster_than_messaging() {
        let registry = registry();
        // Fuji -> Dispatch: both hub-capable
        assert_eq!(hop_profile(&registry, 43113, 779672), NATIVE_BRIDGE);
        // Fuji -> Polygon Amoy: touches a non-hub-capable chain
        assert_eq!(hop_profile(&registry, 43113, 80002), MESSAGING_BRIDGE);
    }

    #[test]
    fn messaging_route_gas_includes_hop_constant() {
        let quotes = quote_for(421614, 80002, "USDC", "USDC", 100.0);
        let direct = &quotes[0];
        // No swap steps on a USDC->USDC direct path: gas is the hop alone.
        assert_eq!(direct.path.step_count(), 0);
        assert_eq!(direct.estimated_gas, MESSAGING_BRIDGE.avg_gas);
        assert_eq!(direct.estimated_time_secs, MESSAGING_BRIDGE.avg_time_secs);
    }

    #[test]
    fn route_kind_follows_endpoint_hub_capability() {
        let registry = registry();
        assert_eq!(classify_kind(&registry, 43113, 779672), RouteKind::DirectBridge);
        assert_eq!(classify_kind(&registry, 43113, 80002), RouteKind::HybridFromHub);
        assert_eq!(classify_kind(&registry, 80002, 43113), RouteKind::HybridToHub);
        assert_eq!(classify_kind(&registry, 80002, 421614), RouteKind::HubBridge);
        assert_eq!(classify_kind(&registry, 80002, 80002), RouteKind::SameChain);
    }

    #[test]
    fn gas_cost_uses_reference_rate() {
        assert_approx_eq!(gas_cost_usd(100_000), 0.5, 1e-12);
        assert_approx_eq!(gas_cost_usd(300_000), 1.5, 1e-12);
    }
}
