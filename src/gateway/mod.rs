// src/gateway/mod.rs
//! Contract gateway: read-only access to the deployed liquidity-aggregation
//! and cross-chain-router contracts on the pricing network, plus the wallet
//! snapshot the facade consults before attempting a live quote.
//!
//! Nothing in this module ever submits a state-changing transaction.

pub mod facade;

pub use facade::{ConfidenceBucket, QuoteFacade, QuoteRequest, SwapQuote};

use crate::error::RouterError;
use crate::registry::ChainRegistry;
use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use serde_json::json;
use tokio::sync::watch;

/// Snapshot of the external wallet collaborator: current account and chain.
/// The wallet pushes updates through a watch channel; the facade only ever
/// reads the latest value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletContext {
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
}

impl WalletContext {
    pub fn is_connected_to(&self, chain_id: u64) -> bool {
        self.account.is_some() && self.chain_id == Some(chain_id)
    }
}

/// Channel pair connecting the wallet collaborator to quote facades.
pub fn wallet_channel(
    initial: WalletContext,
) -> (watch::Sender<WalletContext>, watch::Receiver<WalletContext>) {
    watch::channel(initial)
}

/// Route description returned by the on-chain liquidity aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct OnChainRoute {
    pub path: Vec<Address>,
    pub dex_routers: Vec<Address>,
    pub expected_output: U256,
    pub estimated_gas: U256,
    pub liquidity_depth: U256,
    /// Basis points, as the contract reports it.
    pub price_impact: U256,
    pub net_value: U256,
    pub confidence: U256,
}

/// Read-only view over the pricing network's optimizer contracts.
///
/// The deployed interfaces are versioned by deployment and may be unavailable
/// at any time; implementations surface every failure as a `RouterError` and
/// leave fallback policy to the facade.
#[async_trait]
pub trait ContractReader: Send + Sync {
    /// `LiquidityAggregator.getActiveDEXs`.
    async fn active_dexs(&self) -> Result<Vec<Address>, RouterError>;

    /// `LiquidityAggregator.findBestRoute` for a same-chain swap.
    async fn find_best_route(
        &self,
        chain_id: u64,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> Result<OnChainRoute, RouterError>;

    /// `CrossChainSwapRouter.getExpectedOutput` along a given DEX path.
    async fn expected_output(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        dex_router: Address,
        path: Vec<Address>,
    ) -> Result<U256, RouterError>;

    /// `CrossChainSwapRouter.paused`.
    async fn is_paused(&self) -> Result<bool, RouterError>;

    /// `CrossChainSwapRouter.getRouter`.
    async fn router_address(&self) -> Result<Address, RouterError>;
}

sol! {
    struct AggregatedRoute {
        address[] path;
        address[] dexRouters;
        uint256 expectedOutput;
        uint256 estimatedGas;
        uint256 liquidityDepth;
        uint256 priceImpact;
        uint256 netValue;
        uint256 confidence;
    }

    function getActiveDEXs() external view returns (address[] dexs);

    function findBestRoute(uint256 chainId, address tokenIn, address tokenOut, uint256 amountIn)
        external
        returns (AggregatedRoute route);

    function getExpectedOutput(address tokenIn, address tokenOut, uint256 amountIn, address dexRouter, address[] path)
        external
        view
        returns (uint256 expectedOut);

    function paused() external view returns (bool isPaused);

    function getRouter() external view returns (address router);
}

/// `eth_call`-based reader speaking plain JSON-RPC to one node.
pub struct JsonRpcReader {
    http: reqwest::Client,
    rpc_url: String,
    aggregator: Address,
    swap_router: Address,
}

impl JsonRpcReader {
    pub fn new(rpc_url: impl Into<String>, aggregator: Address, swap_router: Address) -> Self {
        Self {
            http: reqwest::Client::new(),
            rpc_url: rpc_url.into(),
            aggregator,
            swap_router,
        }
    }

    /// Builds a reader for a chain's deployed contracts from the registry.
    pub fn from_registry(
        registry: &ChainRegistry,
        chain_id: u64,
        rpc_url: impl Into<String>,
    ) -> Result<Self, RouterError> {
        let contracts = registry
            .contracts_of(chain_id)
            .ok_or(RouterError::UnsupportedChain(chain_id))?;
        match (contracts.liquidity_aggregator, contracts.swap_router) {
            (Some(aggregator), Some(swap_router)) => {
                Ok(Self::new(rpc_url, aggregator, swap_router))
            }
            _ => Err(RouterError::ConfigError(format!(
                "optimizer contracts not deployed on chain {}",
                chain_id
            ))),
        }
    }

    async fn eth_call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, RouterError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [
                { "to": format!("{to}"), "data": format!("0x{}", hex::encode(&data)) },
                "latest"
            ]
        });

        let response: serde_json::Value = self
            .http
            .post(&self.rpc_url)
            .json(&payload)
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = response.get("error") {
            return Err(RouterError::RpcError(format!("eth_call failed: {}", err)));
        }
        let result = response
            .get("result")
            .and_then(|v| v.as_str())
            .ok_or_else(|| RouterError::ParseError("eth_call response missing result".into()))?;
        hex::decode(result.trim_start_matches("0x"))
            .map_err(|e| RouterError::ParseError(format!("invalid eth_call result hex: {}", e)))
    }
}

#[async_trait]
impl ContractReader for JsonRpcReader {
    async fn active_dexs(&self) -> Result<Vec<Address>, RouterError> {
        let raw = self
            .eth_call(self.aggregator, getActiveDEXsCall {}.abi_encode())
            .await?;
        let decoded = getActiveDEXsCall::abi_decode_returns(&raw, true)
            .map_err(|e| RouterError::ParseError(format!("getActiveDEXs decode: {}", e)))?;
        Ok(decoded.dexs)
    }

    async fn find_best_route(
        &self,
        chain_id: u64,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> Result<OnChainRoute, RouterError> {
        let call = findBestRouteCall {
            chainId: U256::from(chain_id),
            tokenIn: token_in,
            tokenOut: token_out,
            amountIn: amount_in,
        };
        let raw = self.eth_call(self.aggregator, call.abi_encode()).await?;
        let decoded = findBestRouteCall::abi_decode_returns(&raw, true)
            .map_err(|e| RouterError::ParseError(format!("findBestRoute decode: {}", e)))?;
        let route = decoded.route;
        Ok(OnChainRoute {
            path: route.path,
            dex_routers: route.dexRouters,
            expected_output: route.expectedOutput,
            estimated_gas: route.estimatedGas,
            liquidity_depth: route.liquidityDepth,
            price_impact: route.priceImpact,
            net_value: route.netValue,
            confidence: route.confidence,
        })
    }

    async fn expected_output(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        dex_router: Address,
        path: Vec<Address>,
    ) -> Result<U256, RouterError> {
        let call = getExpectedOutputCall {
            tokenIn: token_in,
            tokenOut: token_out,
            amountIn: amount_in,
            dexRouter: dex_router,
            path,
        };
        let raw = self.eth_call(self.swap_router, call.abi_encode()).await?;
        let decoded = getExpectedOutputCall::abi_decode_returns(&raw, true)
            .map_err(|e| RouterError::ParseError(format!("getExpectedOutput decode: {}", e)))?;
        Ok(decoded.expectedOut)
    }

    async fn is_paused(&self) -> Result<bool, RouterError> {
        let raw = self.eth_call(self.swap_router, pausedCall {}.abi_encode()).await?;
        let decoded = pausedCall::abi_decode_returns(&raw, true)
            .map_err(|e| RouterError::ParseError(format!("paused decode: {}", e)))?;
        Ok(decoded.isPaused)
    }

    async fn router_address(&self) -> Result<Address, RouterError> {
        let raw = self
            .eth_call(self.swap_router, getRouterCall {}.abi_encode())
            .await?;
        let decoded = getRouterCall::abi_decode_returns(&raw, true)
            .map_err(|e| RouterError::ParseError(format!("getRouter decode: {}", e)))?;
        Ok(decoded.router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wallet_connection_predicate() {
        let disconnected = WalletContext::default();
        assert!(!disconnected.is_connected_to(43113));

        let wrong_network = WalletContext {
            account: Some(Address::repeat_byte(1)),
            chain_id: Some(80002),
        };
        assert!(!wrong_network.is_connected_to(43113));

        let connected = WalletContext {
            account: Some(Address::repeat_byte(1)),
            chain_id: Some(43113),
        };
        assert!(connected.is_connected_to(43113));
    }

    #[test]
    fn wallet_channel_delivers_latest_snapshot() {
        let (tx, rx) = wallet_channel(WalletContext::default());
        let update = WalletContext {
            account: Some(Address::repeat_byte(9)),
            chain_id: Some(43113),
        };
        tx.send(update.clone()).unwrap();
        assert_eq!(*rx.borrow(), update);
    }

    #[test]
    fn reader_from_registry_requires_deployment() {
        let registry = ChainRegistry::default_testnets();
        assert!(JsonRpcReader::from_registry(&registry, 43113, "http://localhost:8545").is_ok());
        // Polygon Amoy has no deployed optimizer contracts
        assert!(JsonRpcReader::from_registry(&registry, 80002, "http://localhost:8545").is_err());
    }

    #[test]
    fn call_encoding_starts_with_selector() {
        let call = pausedCall {};
        let encoded = call.abi_encode();
        assert_eq!(encoded.len(), 4); // selector only, no arguments
    }
}
