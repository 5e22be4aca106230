// src/main.rs
use crosschain_router::{
    config::load_config,
    error::RouterError,
    gateway::{wallet_channel, JsonRpcReader, QuoteFacade, QuoteRequest, WalletContext},
    oracle::StaticPriceOracle,
    registry::ChainRegistry,
    routing::{enumerate_paths, score_path, select_best, Objective},
    signer::QuoteSigner,
    utils::setup_logging,
};
use alloy_primitives::Address;
use log::{info, warn};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), RouterError> {
    setup_logging().expect("Failed to initialize logging");
    info!("🚀 Cross-chain route optimizer starting...");

    let config = load_config()?;

    let registry = Arc::new(match &config.registry_path {
        Some(path) => ChainRegistry::from_json_file(path)?,
        None => ChainRegistry::default_testnets(),
    });
    info!(
        "Registry loaded: {} chains, hub={}",
        registry.chain_ids().count(),
        registry.hub_chain_id()
    );

    // Reference prices for the fallback estimator. A deployment would feed
    // these from a price stream instead.
    let oracle = Arc::new(StaticPriceOracle::new());
    for chain_id in registry.chain_ids().collect::<Vec<_>>() {
        oracle.set_price(chain_id, Address::ZERO, 2500.0);
        if let Some(usdc) = registry.resolve_token_address(chain_id, "USDC") {
            oracle.set_price(chain_id, usdc, 1.0);
        }
    }

    // No wallet in the demo binary, so every quote takes the estimation path.
    let (_wallet_tx, wallet_rx) = wallet_channel(WalletContext::default());

    let reader = if registry.is_deployed(config.pricing_chain_id) {
        match JsonRpcReader::from_registry(
            &registry,
            config.pricing_chain_id,
            config.pricing_rpc_url.clone(),
        ) {
            Ok(r) => Some(Arc::new(r) as Arc<dyn crosschain_router::ContractReader>),
            Err(e) => {
                warn!("Contract reader unavailable: {}", e);
                None
            }
        }
    } else {
        None
    };

    let facade = QuoteFacade::new(
        registry.clone(),
        oracle,
        wallet_rx,
        reader,
        config.clone(),
    );

    let samples = [
        ("same-chain swap on Fuji", QuoteRequest {
            from_chain: 43113,
            to_chain: 43113,
            token_in: Address::ZERO,
            token_out: registry
                .resolve_token_address(43113, "USDC")
                .unwrap_or(Address::ZERO),
            amount_in: "100".to_string(),
            objective: Objective::MaxNetValue,
        }),
        ("Arbitrum Sepolia -> Polygon Amoy, best value", QuoteRequest {
            from_chain: 421614,
            to_chain: 80002,
            token_in: Address::ZERO,
            token_out: registry
                .resolve_token_address(80002, "USDC")
                .unwrap_or(Address::ZERO),
            amount_in: "250".to_string(),
            objective: Objective::MaxNetValue,
        }),
        ("Arbitrum Sepolia -> Polygon Amoy, fastest", QuoteRequest {
            from_chain: 421614,
            to_chain: 80002,
            token_in: Address::ZERO,
            token_out: registry
                .resolve_token_address(80002, "USDC")
                .unwrap_or(Address::ZERO),
            amount_in: "250".to_string(),
            objective: Objective::FastestTime,
        }),
    ];

    for (label, request) in &samples {
        match facade.get_swap_quote(request).await {
            Ok(quote) => info!(
                "{}: out={} fees={} time={} route={} confidence={:?} live={}",
                label,
                quote.amount_out,
                quote.total_fee,
                quote.estimated_time,
                quote.route,
                quote.confidence,
                quote.is_real_data
            ),
            Err(e) => warn!("{}: no quote ({:?}: {})", label, e.categorize(), e),
        }
    }

    if let Some(key) = &config.signer_key_hex {
        let signer = QuoteSigner::from_hex(key)?;
        let usdc = registry
            .resolve_token_address(80002, "USDC")
            .unwrap_or(Address::ZERO);
        let weth = registry
            .resolve_token_address(421614, "WETH")
            .unwrap_or(Address::ZERO);
        let paths = enumerate_paths(&registry, 421614, 80002, weth, usdc);
        let quotes = paths
            .iter()
            .map(|p| score_path(&registry, p, 250.0, Objective::MaxNetValue))
            .collect();
        if let Some(best) = select_best(quotes, Objective::MaxNetValue) {
            let timestamp = chrono::Utc::now().timestamp() as u64;
            let signed = signer.sign(&best, timestamp)?;
            info!(
                "Signed best route {} as {} (digest {})",
                best.path.describe(),
                signer.address(),
                signed.hash
            );
        }
    }

    info!("Done.");
    Ok(())
}
