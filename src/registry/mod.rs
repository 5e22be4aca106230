// src/registry/mod.rs
//! Static chain and DEX registry.
//!
//! Read-only lookups over per-chain metadata: exchanges, bridge-eligible
//! token symbols, token address maps and deployed optimizer contracts. The
//! registry is loaded once at startup (built-in testnet table or an external
//! JSON file) and shared immutably across concurrent quote requests. Absence
//! of a chain or token always means "unsupported", never an error.

use crate::error::RouterError;
use alloy_primitives::{address, Address};
use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One on-chain exchange: router address plus its average per-swap gas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeDescriptor {
    pub name: String,
    pub router: Address,
    pub avg_gas: u64,
}

/// Per-chain metadata. Immutable after load; the optimizer never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainDescriptor {
    pub chain_id: u64,
    pub name: String,
    /// Supports the fast native bridging protocol shared by the hub family.
    pub hub_capable: bool,
    pub native_symbol: String,
    /// Registration order is meaningful: it is the simulator's tie-break.
    pub exchanges: Vec<ExchangeDescriptor>,
    /// Token symbols that can be moved off this chain via a bridge.
    pub bridge_tokens: Vec<String>,
    pub tokens: BTreeMap<String, Address>,
}

impl ChainDescriptor {
    pub fn token_address(&self, symbol: &str) -> Option<Address> {
        self.tokens.get(symbol).copied()
    }

    /// Wrapped form of the native currency (`AVAX` -> `WAVAX`), when listed.
    pub fn wrapped_native(&self) -> Option<Address> {
        self.tokens.get(&format!("W{}", self.native_symbol)).copied()
    }
}

/// Addresses of the optimizer's read-only collaborator contracts, where deployed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeployedContracts {
    pub liquidity_aggregator: Option<Address>,
    pub swap_router: Option<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainRegistry {
    hub_chain_id: u64,
    chains: BTreeMap<u64, ChainDescriptor>,
    #[serde(default)]
    contracts: BTreeMap<u64, DeployedContracts>,
}

impl ChainRegistry {
    pub fn new(hub_chain_id: u64, chains: Vec<ChainDescriptor>) -> Self {
        Self {
            hub_chain_id,
            chains: chains.into_iter().map(|c| (c.chain_id, c)).collect(),
            contracts: BTreeMap::new(),
        }
    }

    pub fn with_contracts(mut self, contracts: BTreeMap<u64, DeployedContracts>) -> Self {
        self.contracts = contracts;
        self
    }

    /// Deserializes a registry from the external JSON configuration surface.
    pub fn from_json(raw: &str) -> Result<Self, RouterError> {
        let registry: ChainRegistry = serde_json::from_str(raw)?;
        if !registry.chains.contains_key(&registry.hub_chain_id) {
            return Err(RouterError::ConfigError(format!(
                "hub chain {} missing from registry",
                registry.hub_chain_id
            )));
        }
        Ok(registry)
    }

    pub fn from_json_file(path: &str) -> Result<Self, RouterError> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read registry file {}", path))?;
        Self::from_json(&raw)
    }

    pub fn describe(&self, chain_id: u64) -> Option<&ChainDescriptor> {
        self.chains.get(&chain_id)
    }

    pub fn resolve_token_address(&self, chain_id: u64, symbol: &str) -> Option<Address> {
        self.describe(chain_id)?.token_address(symbol)
    }

    /// Bridge-eligible symbols of a chain; empty for unknown chains.
    pub fn bridge_tokens_of(&self, chain_id: u64) -> &[String] {
        self.describe(chain_id)
            .map(|c| c.bridge_tokens.as_slice())
            .unwrap_or(&[])
    }

    /// The single designated intermediate chain for two-hop routes.
    pub fn hub_chain_id(&self) -> u64 {
        self.hub_chain_id
    }

    /// Canonical hub-capability predicate. Enumerator, scorer and route
    /// labeling all go through this lookup; nothing else keeps chain-id lists.
    pub fn is_hub_capable(&self, chain_id: u64) -> bool {
        self.describe(chain_id).map(|c| c.hub_capable).unwrap_or(false)
    }

    pub fn contracts_of(&self, chain_id: u64) -> Option<&DeployedContracts> {
        self.contracts.get(&chain_id)
    }

    /// Whether both optimizer contracts are deployed on a chain.
    pub fn is_deployed(&self, chain_id: u64) -> bool {
        self.contracts_of(chain_id)
            .map(|c| c.liquidity_aggregator.is_some() && c.swap_router.is_some())
            .unwrap_or(false)
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.chains.keys().copied()
    }

    /// Built-in testnet topology: Fuji C-Chain as the hub, three more
    /// hub-capable L1s and four ordinary testnets reachable only over
    /// generic cross-chain messaging.
    pub fn default_testnets() -> Self {
        DEFAULT_TESTNETS.clone()
    }
}

fn tokens(entries: &[(&str, Address)]) -> BTreeMap<String, Address> {
    entries
        .iter()
        .map(|(sym, addr)| (sym.to_string(), *addr))
        .collect()
}

fn symbols(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|s| s.to_string()).collect()
}

static DEFAULT_TESTNETS: Lazy<ChainRegistry> = Lazy::new(|| {
    let chains = vec![
        ChainDescriptor {
            chain_id: 43113,
            name: "Avalanche Fuji C-Chain".to_string(),
            hub_capable: true,
            native_symbol: "AVAX".to_string(),
            exchanges: vec![
                ExchangeDescriptor {
                    name: "TraderJoe".to_string(),
                    router: address!("2d99abd9008dc933ff5c0cd271b88309593ab921"),
                    avg_gas: 150_000,
                },
                ExchangeDescriptor {
                    name: "Pangolin".to_string(),
                    router: address!("60ae616a2155ee3d9a68541ba4544862310933d4"),
                    avg_gas: 140_000,
                },
            ],
            bridge_tokens: symbols(&["USDC", "WAVAX"]),
            tokens: tokens(&[
                ("USDC", address!("5425890298aed601595a70ab815c96711a31bc65")),
                ("WAVAX", address!("d00ae08403b9bbb9124bb305c09058e32c39a48c")),
            ]),
        },
        ChainDescriptor {
            chain_id: 779672,
            name: "Dispatch Testnet".to_string(),
            hub_capable: true,
            native_symbol: "DIS".to_string(),
            exchanges: vec![],
            bridge_tokens: symbols(&["USDC"]),
            tokens: tokens(&[(
                "USDC",
                address!("1234567890123456789012345678901234567890"),
            )]),
        },
        ChainDescriptor {
            chain_id: 397,
            name: "Echo Testnet".to_string(),
            hub_capable: true,
            native_symbol: "ECHO".to_string(),
            exchanges: vec![],
            bridge_tokens: vec![],
            tokens: BTreeMap::new(),
        },
        ChainDescriptor {
            chain_id: 432201,
            name: "Dexalot Testnet".to_string(),
            hub_capable: true,
            native_symbol: "ALOT".to_string(),
            exchanges: vec![],
            bridge_tokens: symbols(&["USDC", "USDT"]),
            tokens: tokens(&[
                ("USDC", address!("1234567890123456789012345678901234567890")),
                ("USDT", address!("2345678901234567890123456789012345678901")),
                ("AVAX", address!("3456789012345678901234567890123456789012")),
                ("BTC.b", address!("4567890123456789012345678901234567890123")),
                ("ETH.e", address!("5678901234567890123456789012345678901234")),
            ]),
        },
        ChainDescriptor {
            chain_id: 421614,
            name: "Arbitrum Sepolia".to_string(),
            hub_capable: false,
            native_symbol: "ETH".to_string(),
            exchanges: vec![
                ExchangeDescriptor {
                    name: "Uniswap V2".to_string(),
                    router: address!("7a250d5630b4cf539739df2c5dacb4c659f2488d"),
                    avg_gas: 160_000,
                },
                ExchangeDescriptor {
                    name: "SushiSwap".to_string(),
                    router: address!("d9e1ce17f2641f24ae83637ab66a2cca9c378b9f"),
                    avg_gas: 155_000,
                },
            ],
            bridge_tokens: symbols(&["USDC"]),
            tokens: tokens(&[
                ("USDC", address!("75faf114eafb1bdbe2f0316df893fd58ce46aa4d")),
                ("WETH", address!("e591bf0a0cf924a0674d7792db046b23cebf5f34")),
            ]),
        },
        ChainDescriptor {
            chain_id: 80002,
            name: "Polygon Amoy".to_string(),
            hub_capable: false,
            native_symbol: "MATIC".to_string(),
            exchanges: vec![
                ExchangeDescriptor {
                    name: "QuickSwap".to_string(),
                    router: address!("a5e0829caced8ffdd4de3c43696c57f7d7a678ff"),
                    avg_gas: 145_000,
                },
                ExchangeDescriptor {
                    name: "SushiSwap".to_string(),
                    router: address!("1b02da8cb0d097eb8d57a175b88c7d8b47997506"),
                    avg_gas: 150_000,
                },
            ],
            bridge_tokens: symbols(&["USDC"]),
            tokens: tokens(&[
                ("USDC", address!("41e94eb019c0762f9bfcf9fb1e58725bfb0e7582")),
                ("WMATIC", address!("0d500b1d8e8ef31e21c99d1db9a6444d3adf1270")),
            ]),
        },
        ChainDescriptor {
            chain_id: 84532,
            name: "Base Sepolia".to_string(),
            hub_capable: false,
            native_symbol: "ETH".to_string(),
            exchanges: vec![],
            bridge_tokens: symbols(&["USDC"]),
            tokens: tokens(&[(
                "USDC",
                address!("036cbd53842c5426634e7929541ec2318f3dcf7e"),
            )]),
        },
        ChainDescriptor {
            chain_id: 11155111,
            name: "Ethereum Sepolia".to_string(),
            hub_capable: false,
            native_symbol: "ETH".to_string(),
            exchanges: vec![],
            bridge_tokens: vec![],
            tokens: BTreeMap::new(),
        },
    ];

    let mut contracts = BTreeMap::new();
    contracts.insert(
        43113,
        DeployedContracts {
            liquidity_aggregator: Some(address!("ab01af7ecf4f4d2b8caaa64b6f8b97f9a0186464")),
            swap_router: Some(address!("ca002d1f05fe44adeba62f3b5bfe304dc9b2687a")),
        },
    );
    contracts.insert(
        432201,
        DeployedContracts {
            liquidity_aggregator: Some(address!("ab01af7ecf4f4d2b8caaa64b6f8b97f9a0186464")),
            swap_router: Some(address!("ca002d1f05fe44adeba62f3b5bfe304dc9b2687a")),
        },
    );

    ChainRegistry::new(43113, chains).with_contracts(contracts)
});
