// src/routing/simulator.rs
//! Single-chain swap-step simulation.
//!
//! Picks the exchange expected to yield the highest output for a fixed
//! reference input and returns a step descriptor. The per-exchange output is
//! a deterministic placeholder (flat 0.3% fee) rather than a live oracle; a
//! production build replaces `simulate_exchange_output` with the exchange's
//! on-chain quoter without touching the selection policy.

use super::{DEX_FEE_FACTOR, REFERENCE_INPUT_AMOUNT};
use crate::registry::{ChainRegistry, ExchangeDescriptor};
use crate::utils::format_amount;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// One in-chain conversion. Append-only construction; treated as immutable
/// once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapStep {
    pub dex_router: Address,
    pub token_in: Address,
    pub token_out: Address,
    /// Simulated output for the reference input, as a decimal string.
    pub expected_amount_out: String,
    pub estimated_gas: u64,
    /// Reserved for exchange-specific routing hints.
    pub extra_data: Vec<u8>,
}

/// Simulates the best single-exchange conversion on one chain.
///
/// Returns `None` for a no-op (`token_in == token_out`), an unknown chain, or
/// a chain with no registered exchanges. Ties between exchanges keep the
/// earliest-registered one, so identical inputs always produce an identical
/// step.
pub fn simulate_step(
    registry: &ChainRegistry,
    chain_id: u64,
    token_in: Address,
    token_out: Address,
) -> Option<SwapStep> {
    if token_in == token_out {
        return None;
    }
    let chain = registry.describe(chain_id)?;
    let first = chain.exchanges.first()?;

    // Strictly-greater comparison keeps the first exchange on equal output.
    let mut best = first;
    let mut best_output = simulate_exchange_output(first, REFERENCE_INPUT_AMOUNT);
    for dex in &chain.exchanges[1..] {
        let output = simulate_exchange_output(dex, REFERENCE_INPUT_AMOUNT);
        if output > best_output {
            best_output = output;
            best = dex;
        }
    }

    Some(SwapStep {
        dex_router: best.router,
        token_in,
        token_out,
        expected_amount_out: format_amount(best_output),
        estimated_gas: best.avg_gas,
        extra_data: Vec::new(),
    })
}

fn simulate_exchange_output(_dex: &ExchangeDescriptor, amount_in: f64) -> f64 {
    amount_in * DEX_FEE_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> ChainRegistry {
        ChainRegistry::default_testnets()
    }

    fn fuji_tokens() -> (Address, Address) {
        let registry = registry();
        (
            registry.resolve_token_address(43113, "USDC").unwrap(),
            registry.resolve_token_address(43113, "WAVAX").unwrap(),
        )
    }

    #[test]
    fn noop_swap_yields_no_step() {
        let (usdc, _) = fuji_tokens();
        assert_eq!(simulate_step(&registry(), 43113, usdc, usdc), None);
    }

    #[test]
    fn chain_without_exchanges_yields_no_step() {
        let registry = registry();
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        // Echo testnet has no registered exchanges
        assert_eq!(simulate_step(&registry, 397, a, b), None);
        assert_eq!(simulate_step(&registry, 9999, a, b), None);
    }

    #[test]
    fn tie_break_keeps_first_registered_exchange() {
        let registry = registry();
        let (usdc, wavax) = fuji_tokens();
        let step = simulate_step(&registry, 43113, wavax, usdc).unwrap();
        let trader_joe = &registry.describe(43113).unwrap().exchanges[0];
        assert_eq!(step.dex_router, trader_joe.router);
        assert_eq!(step.estimated_gas, trader_joe.avg_gas);
    }

    #[test]
    fn simulation_is_idempotent() {
        let registry = registry();
        let (usdc, wavax) = fuji_tokens();
        let first = simulate_step(&registry, 43113, usdc, wavax).unwrap();
        let second = simulate_step(&registry, 43113, usdc, wavax).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reference_output_reflects_flat_fee() {
        let registry = registry();
        let (usdc, wavax) = fuji_tokens();
        let step = simulate_step(&registry, 43113, usdc, wavax).unwrap();
        assert_eq!(step.expected_amount_out, "997000");
    }
}
