// src/gateway/facade.rs
//! User-facing quote facade. One entry point, `get_swap_quote`, that prefers
//! live on-chain pricing and degrades to local estimation whenever the live
//! path is unavailable, slow, or fails.

use crate::config::Config;
use crate::error::RouterError;
use crate::gateway::{ContractReader, WalletContext};
use crate::oracle::PriceOracle;
use crate::registry::{ChainDescriptor, ChainRegistry};
use crate::routing::{
    enumerate_paths, score_path, select_best, Objective, RouteKind, RouteQuote,
};
use crate::utils::{format_amount, format_usd, parse_amount};
use alloy_primitives::{Address, U256};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::time::timeout;

/// Gas price assumed by the live estimator when converting units to ETH.
const LIVE_GAS_PRICE_GWEI: f64 = 25.0;
/// Reference USD price for the pricing network's native token, used when the
/// oracle has no quote for it.
const DEFAULT_NATIVE_PRICE_USD: f64 = 2500.0;
/// Fixed bridge fee charged by the live cross-chain router, in native units.
const LIVE_BRIDGE_FEE_NATIVE: f64 = 0.001;
/// Destination-side execution gas budget for a live cross-chain swap.
const LIVE_REMOTE_GAS_NATIVE: f64 = 0.002;

/// A swap the caller wants priced. Amounts travel as decimal strings so the
/// outer surface never has to reason about float formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub from_chain: u64,
    pub to_chain: u64,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: String,
    pub objective: Objective,
}

/// Coarse confidence classification shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceBucket {
    High,
    Medium,
    Low,
}

impl From<u8> for ConfidenceBucket {
    fn from(score: u8) -> Self {
        if score > 80 {
            ConfidenceBucket::High
        } else if score > 60 {
            ConfidenceBucket::Medium
        } else {
            ConfidenceBucket::Low
        }
    }
}

/// Display-ready quote. Every money field is pre-formatted; `is_real_data`
/// records whether the numbers came from a live contract read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub amount_out: String,
    pub gas_fee: String,
    pub bridge_fee: String,
    pub protocol_fee: String,
    pub total_fee: String,
    pub estimated_time: String,
    pub confidence: ConfidenceBucket,
    pub route: RouteKind,
    pub price_impact: Option<String>,
    pub is_real_data: bool,
}

/// Facade over live contract reads and the local routing engine.
///
/// All collaborators arrive through the constructor so tests can swap in fake
/// readers and pinned jitter seeds.
pub struct QuoteFacade {
    registry: Arc<ChainRegistry>,
    oracle: Arc<dyn PriceOracle>,
    wallet: watch::Receiver<WalletContext>,
    reader: Option<Arc<dyn ContractReader>>,
    config: Arc<Config>,
    jitter: Mutex<fastrand::Rng>,
    generation: AtomicU64,
}

impl QuoteFacade {
    pub fn new(
        registry: Arc<ChainRegistry>,
        oracle: Arc<dyn PriceOracle>,
        wallet: watch::Receiver<WalletContext>,
        reader: Option<Arc<dyn ContractReader>>,
        config: Arc<Config>,
    ) -> Self {
        let rng = match config.jitter_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            registry,
            oracle,
            wallet,
            reader,
            config,
            jitter: Mutex::new(rng),
            generation: AtomicU64::new(0),
        }
    }

    /// Marks the start of a new request burst and returns its token. A caller
    /// debouncing rapid input takes a token before awaiting and drops the
    /// result if `is_current` no longer holds.
    pub fn begin_request(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }

    /// Prices a swap. Tries the live contracts first when a wallet is
    /// connected to the pricing network, then falls back to local estimation.
    /// Returns an error only for invalid input, unknown chains, or a swap no
    /// candidate route can serve.
    pub async fn get_swap_quote(&self, request: &QuoteRequest) -> Result<SwapQuote, RouterError> {
        let amount = parse_amount(&request.amount_in)
            .ok_or_else(|| RouterError::InvalidAmount(request.amount_in.clone()))?;

        let from = self
            .registry
            .describe(request.from_chain)
            .ok_or(RouterError::UnsupportedChain(request.from_chain))?;
        let to = self
            .registry
            .describe(request.to_chain)
            .ok_or(RouterError::UnsupportedChain(request.to_chain))?;

        let token_in = resolve_native(from, request.token_in);
        let token_out = resolve_native(to, request.token_out);

        if let Some(reader) = self.reader.clone() {
            let ctx = self.wallet.borrow().clone();
            if !ctx.is_connected_to(self.config.pricing_chain_id) {
                debug!(
                    "wallet not connected to pricing chain {} (context: {:?}); using estimation",
                    self.config.pricing_chain_id, ctx
                );
            } else {
                let live = timeout(
                    self.config.quote_timeout(),
                    self.live_quote(reader.as_ref(), request, amount, token_in, token_out),
                )
                .await;
                match live {
                    Ok(Ok(quote)) => {
                        info!(
                            "Live quote: {} -> {} out={} ({})",
                            request.from_chain, request.to_chain, quote.amount_out, quote.route
                        );
                        return Ok(quote);
                    }
                    Ok(Err(e)) if e.is_recoverable() => {
                        warn!("Live quote failed ({}); falling back to estimation", e)
                    }
                    Ok(Err(e)) => return Err(e),
                    Err(_) => warn!(
                        "Live quote timed out after {}ms; falling back to estimation",
                        self.config.quote_timeout_ms
                    ),
                }
            }
        }

        self.fallback_quote(request, amount, token_in, token_out)
    }

    async fn live_quote(
        &self,
        reader: &dyn ContractReader,
        request: &QuoteRequest,
        amount: f64,
        token_in: Address,
        token_out: Address,
    ) -> Result<SwapQuote, RouterError> {
        let amount_wei = to_wei(amount);
        let native_price = self
            .oracle
            .price_of(self.config.pricing_chain_id, Address::ZERO)
            .unwrap_or(DEFAULT_NATIVE_PRICE_USD);

        if request.from_chain == request.to_chain {
            let dexs = reader.active_dexs().await?;
            if dexs.is_empty() {
                return Err(RouterError::LiveDataUnavailable(
                    "no active DEXs registered on the aggregator".to_string(),
                ));
            }
            debug!("{} active DEXs on the aggregator", dexs.len());

            let route = reader
                .find_best_route(request.from_chain, token_in, token_out, amount_wei)
                .await?;
            if route.expected_output.is_zero() {
                return Err(RouterError::EstimationFailed(
                    "aggregator returned zero output".to_string(),
                ));
            }

            let gas_units = u256_to_f64(route.estimated_gas);
            let gas_usd = gas_units * LIVE_GAS_PRICE_GWEI * 1e-9 * native_price;
            let impact_pct = u256_to_f64(route.price_impact) / 100.0;
            let confidence = u256_to_f64(route.confidence).clamp(0.0, 100.0) as u8;

            return Ok(SwapQuote {
                amount_out: format_amount(from_wei(route.expected_output)),
                gas_fee: format_usd(gas_usd),
                bridge_fee: format_usd(0.0),
                protocol_fee: "0.05%".to_string(),
                total_fee: format_usd(gas_usd),
                estimated_time: "30s - 2min".to_string(),
                confidence: ConfidenceBucket::from(confidence),
                route: RouteKind::SameChain,
                price_impact: Some(format!("{:.2}%", impact_pct)),
                is_real_data: true,
            });
        }

        if reader.is_paused().await? {
            return Err(RouterError::LiveDataUnavailable(
                "cross-chain router is paused".to_string(),
            ));
        }
        let dex_router = reader.router_address().await?;
        let expected = reader
            .expected_output(
                token_in,
                token_out,
                amount_wei,
                dex_router,
                vec![token_in, token_out],
            )
            .await?;
        if expected.is_zero() {
            return Err(RouterError::EstimationFailed(
                "router returned zero expected output".to_string(),
            ));
        }

        let bridge_usd = LIVE_BRIDGE_FEE_NATIVE * native_price;
        let gas_usd = LIVE_REMOTE_GAS_NATIVE * native_price;
        Ok(SwapQuote {
            amount_out: format_amount(from_wei(expected)),
            gas_fee: format_usd(gas_usd),
            bridge_fee: format_usd(bridge_usd),
            protocol_fee: "0.10%".to_string(),
            total_fee: format_usd(gas_usd + bridge_usd),
            estimated_time: "5-15min".to_string(),
            confidence: ConfidenceBucket::Medium,
            route: crate::routing::classify_kind(
                &self.registry,
                request.from_chain,
                request.to_chain,
            ),
            price_impact: None,
            is_real_data: true,
        })
    }

    fn fallback_quote(
        &self,
        request: &QuoteRequest,
        amount: f64,
        token_in: Address,
        token_out: Address,
    ) -> Result<SwapQuote, RouterError> {
        let paths = enumerate_paths(
            &self.registry,
            request.from_chain,
            request.to_chain,
            token_in,
            token_out,
        );
        if paths.is_empty() {
            return Err(RouterError::NoRouteFound(format!(
                "{} -> {}",
                request.from_chain, request.to_chain
            )));
        }

        let quotes: Vec<RouteQuote> = paths
            .iter()
            .map(|p| score_path(&self.registry, p, amount, request.objective))
            .collect();
        let best = select_best(quotes, request.objective).ok_or_else(|| {
            RouterError::NoRouteFound(format!("{} -> {}", request.from_chain, request.to_chain))
        })?;
        if !best.expected_output.is_finite() {
            return Err(RouterError::EstimationFailed(format!(
                "non-finite output for path {}",
                best.path.describe()
            )));
        }

        if let Some(price) = self.oracle.price_of(request.to_chain, token_out) {
            debug!(
                "Estimated output value: {} ({})",
                format_usd(best.expected_output * price),
                best.path.describe()
            );
        }

        let gas_usd = crate::routing::scorer::gas_cost_usd(best.estimated_gas);
        let bridge_usd = crate::routing::scorer::bridge_cost_usd(&self.registry, &best.path);
        let protocol_fee = if best.kind.is_bridged() { "0.10%" } else { "0.05%" };
        let slippage = self.estimate_slippage(best.path.step_count());

        info!(
            "Estimated quote: {} out={} net={} conf={}",
            best.path.describe(),
            format_amount(best.expected_output),
            format_usd(best.net_value_usd),
            best.confidence
        );

        Ok(SwapQuote {
            amount_out: format_amount(best.expected_output),
            gas_fee: format_usd(gas_usd),
            bridge_fee: format_usd(bridge_usd),
            protocol_fee: protocol_fee.to_string(),
            total_fee: format_usd(gas_usd + bridge_usd),
            estimated_time: format_time_band(best.estimated_time_secs, best.kind.is_bridged()),
            confidence: ConfidenceBucket::from(best.confidence),
            route: best.kind,
            price_impact: Some(format!("{:.2}%", slippage)),
            is_real_data: false,
        })
    }

    /// Per-step slippage estimate with a small jitter so repeated quotes do
    /// not look artificially stable. Clamped to the configured band.
    fn estimate_slippage(&self, steps: usize) -> f64 {
        let base = (steps as f64 * 0.3).max(self.config.min_slippage_pct);
        let jitter = {
            let mut rng = self
                .jitter
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            rng.f64() * 0.4 - 0.2
        };
        (base + jitter).clamp(self.config.min_slippage_pct, self.config.max_slippage_pct)
    }
}

/// The zero address stands in for the chain's native token; swaps route
/// through the wrapped form when the registry knows it.
fn resolve_native(chain: &ChainDescriptor, token: Address) -> Address {
    if token == Address::ZERO {
        chain.wrapped_native().unwrap_or(token)
    } else {
        token
    }
}

/// Formats a scored duration as a lower/upper display band. The upper bound
/// doubles the estimate, matching how bridge latencies actually spread.
/// Bridged routes floor the band at two minutes; settlement never lands
/// faster than that end to end, whatever the per-hop averages add up to.
fn format_time_band(secs: u64, bridged: bool) -> String {
    let lower = if bridged { secs.max(120) } else { secs };
    format!(
        "{} - {}",
        format_duration(lower),
        format_duration(lower * 2)
    )
}

fn format_duration(secs: u64) -> String {
    if secs < 120 {
        format!("{}s", secs)
    } else {
        format!("{}min", (secs + 59) / 60)
    }
}

fn to_wei(amount: f64) -> U256 {
    U256::from((amount * 1e18).min(u128::MAX as f64) as u128)
}

fn from_wei(value: U256) -> f64 {
    u256_to_f64(value) / 1e18
}

fn u256_to_f64(value: U256) -> f64 {
    value
        .into_limbs()
        .iter()
        .rev()
        .fold(0.0, |acc, &limb| acc * 2f64.powi(64) + limb as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::wallet_channel;
    use crate::oracle::StaticPriceOracle;
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;

    fn facade_with_seed(seed: u64) -> QuoteFacade {
        let config = Arc::new(Config {
            jitter_seed: Some(seed),
            ..Config::default()
        });
        let (_tx, rx) = wallet_channel(WalletContext::default());
        QuoteFacade::new(
            Arc::new(ChainRegistry::default_testnets()),
            Arc::new(StaticPriceOracle::new()),
            rx,
            None,
            config,
        )
    }

    #[test]
    fn confidence_buckets_follow_thresholds() {
        assert_eq!(ConfidenceBucket::from(81), ConfidenceBucket::High);
        assert_eq!(ConfidenceBucket::from(80), ConfidenceBucket::Medium);
        assert_eq!(ConfidenceBucket::from(61), ConfidenceBucket::Medium);
        assert_eq!(ConfidenceBucket::from(60), ConfidenceBucket::Low);
    }

    #[test]
    fn time_band_switches_units_at_two_minutes() {
        assert_eq!(format_time_band(75, false), "75s - 3min");
        assert_eq!(format_time_band(30, false), "30s - 60s");
        assert_eq!(format_time_band(360, false), "6min - 12min");
    }

    #[test]
    fn bridged_time_band_is_floored_at_two_minutes() {
        assert_eq!(format_time_band(75, true), "2min - 4min");
        assert_eq!(format_time_band(360, true), "6min - 12min");
    }

    #[test]
    fn wei_round_trip_is_close() {
        let wei = to_wei(1.5);
        assert_approx_eq!(from_wei(wei), 1.5, 1e-9);
    }

    #[test]
    fn slippage_jitter_is_deterministic_under_a_seed() {
        let a = facade_with_seed(7);
        let b = facade_with_seed(7);
        assert_approx_eq!(a.estimate_slippage(2), b.estimate_slippage(2), 1e-12);
    }

    #[test]
    fn slippage_respects_clamp() {
        let facade = facade_with_seed(1);
        for steps in 0..12 {
            let s = facade.estimate_slippage(steps);
            assert!((0.1..=3.0).contains(&s), "slippage {} out of clamp", s);
        }
    }

    #[test]
    fn native_sentinel_resolves_to_wrapped_token() {
        let registry = ChainRegistry::default_testnets();
        let fuji = registry.describe(43113).unwrap();
        let resolved = resolve_native(fuji, Address::ZERO);
        assert_eq!(Some(resolved), fuji.wrapped_native());
        assert_ne!(resolved, Address::ZERO);
    }

    #[tokio::test]
    async fn request_generation_tokens_supersede() {
        let facade = facade_with_seed(3);
        let first = facade.begin_request();
        assert!(facade.is_current(first));
        let second = facade.begin_request();
        assert!(!facade.is_current(first));
        assert!(facade.is_current(second));
    }
}
