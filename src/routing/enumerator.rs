// src/routing/enumerator.rs
//! Candidate path enumeration across the chain topology.
//!
//! Three structurally distinct shapes exist: same-chain (length 1), direct
//! bridge (length 2, requires a common bridge token), and a two-hop route via
//! the designated hub chain (length 3). Any candidate whose required bridge
//! token cannot be resolved is dropped; an empty result means "no route", not
//! an error.

use super::simulator::{simulate_step, SwapStep};
use crate::registry::{ChainDescriptor, ChainRegistry};
use alloy_primitives::Address;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// One candidate end-to-end route.
///
/// `steps_per_chain` parallels `chains` (one step list per traversed chain,
/// possibly empty when no in-chain conversion is needed there). Constructed
/// here, consumed read-only by the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainPath {
    pub chains: Vec<ChainDescriptor>,
    pub steps_per_chain: Vec<Vec<SwapStep>>,
}

impl ChainPath {
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    pub fn step_count(&self) -> usize {
        self.steps_per_chain.iter().map(Vec::len).sum()
    }

    /// Human-readable traversal, e.g. `Arbitrum Sepolia -> Avalanche Fuji C-Chain`.
    pub fn describe(&self) -> String {
        self.chains.iter().map(|c| c.name.as_str()).join(" -> ")
    }
}

/// Enumerates the structurally distinct candidate paths for a swap request.
pub fn enumerate_paths(
    registry: &ChainRegistry,
    from_chain: u64,
    to_chain: u64,
    token_in: Address,
    token_out: Address,
) -> Vec<ChainPath> {
    let mut paths = Vec::new();

    if from_chain == to_chain {
        if let Some(path) = local_route(registry, from_chain, token_in, token_out) {
            paths.push(path);
        }
        return paths;
    }

    if let Some(path) = direct_route(registry, from_chain, to_chain, token_in, token_out) {
        paths.push(path);
    }

    // A two-hop route only makes sense when neither endpoint is the hub itself.
    let hub = registry.hub_chain_id();
    if from_chain != hub && to_chain != hub {
        if let Some(path) = hub_route(registry, from_chain, to_chain, token_in, token_out) {
            paths.push(path);
        }
    }

    paths
}

/// Picks the bridge token shared by two chains, preferring the stablecoin.
fn common_bridge_token(registry: &ChainRegistry, from_chain: u64, to_chain: u64) -> Option<String> {
    let to_tokens = registry.bridge_tokens_of(to_chain);
    let common: Vec<&String> = registry
        .bridge_tokens_of(from_chain)
        .iter()
        .filter(|symbol| to_tokens.contains(symbol))
        .collect();

    if common.iter().any(|s| s.as_str() == "USDC") {
        return Some("USDC".to_string());
    }
    common.first().map(|s| s.to_string())
}

fn local_route(
    registry: &ChainRegistry,
    chain_id: u64,
    token_in: Address,
    token_out: Address,
) -> Option<ChainPath> {
    let chain = registry.describe(chain_id)?.clone();
    let steps: Vec<SwapStep> = simulate_step(registry, chain_id, token_in, token_out)
        .into_iter()
        .collect();
    Some(ChainPath {
        chains: vec![chain],
        steps_per_chain: vec![steps],
    })
}

fn direct_route(
    registry: &ChainRegistry,
    from_chain: u64,
    to_chain: u64,
    token_in: Address,
    token_out: Address,
) -> Option<ChainPath> {
    let from = registry.describe(from_chain)?.clone();
    let to = registry.describe(to_chain)?.clone();

    let bridge = common_bridge_token(registry, from_chain, to_chain)?;
    let bridge_in = registry.resolve_token_address(from_chain, &bridge)?;
    let bridge_out = registry.resolve_token_address(to_chain, &bridge)?;

    // Convert into the bridge token on the source chain, and out of it on the
    // destination chain, skipping either conversion when already aligned.
    let mut from_steps = Vec::new();
    if token_in != bridge_in {
        if let Some(step) = simulate_step(registry, from_chain, token_in, bridge_in) {
            from_steps.push(step);
        }
    }
    let mut to_steps = Vec::new();
    if bridge_out != token_out {
        if let Some(step) = simulate_step(registry, to_chain, bridge_out, token_out) {
            to_steps.push(step);
        }
    }

    Some(ChainPath {
        chains: vec![from, to],
        steps_per_chain: vec![from_steps, to_steps],
    })
}

fn hub_route(
    registry: &ChainRegistry,
    from_chain: u64,
    to_chain: u64,
    token_in: Address,
    token_out: Address,
) -> Option<ChainPath> {
    let hub_id = registry.hub_chain_id();
    let hub = registry.describe(hub_id)?.clone();

    let inbound_bridge = common_bridge_token(registry, from_chain, hub_id)?;
    let outbound_bridge = common_bridge_token(registry, hub_id, to_chain)?;
    let inbound_on_hub = registry.resolve_token_address(hub_id, &inbound_bridge)?;
    let outbound_on_hub = registry.resolve_token_address(hub_id, &outbound_bridge)?;

    let inbound_leg = direct_route(registry, from_chain, hub_id, token_in, inbound_on_hub)?;
    let outbound_leg = direct_route(registry, hub_id, to_chain, outbound_on_hub, token_out)?;

    // An in-hub conversion is only needed when the two legs bridge different tokens.
    let mut hub_steps = Vec::new();
    if inbound_bridge != outbound_bridge {
        if let Some(step) = simulate_step(registry, hub_id, inbound_on_hub, outbound_on_hub) {
            hub_steps.push(step);
        }
    }

    let mut chains = Vec::with_capacity(3);
    chains.push(inbound_leg.chains[0].clone());
    chains.push(hub);
    chains.push(outbound_leg.chains[1].clone());

    let mut steps_per_chain = Vec::with_capacity(3);
    steps_per_chain.push(inbound_leg.steps_per_chain[0].clone());
    steps_per_chain.push(hub_steps);
    steps_per_chain.push(outbound_leg.steps_per_chain[1].clone());

    Some(ChainPath {
        chains,
        steps_per_chain,
    })
}
