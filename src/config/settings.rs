use crate::error::RouterError;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// JSON-RPC endpoint of the designated pricing network. Live quotes are
    /// only attempted when the connected wallet sits on this network.
    pub pricing_rpc_url: String,
    /// Chain id of the pricing network (the hub chain in the default registry).
    pub pricing_chain_id: u64,
    /// Optional path to a JSON registry file; the built-in table is used when unset.
    pub registry_path: Option<String>,
    /// Deadline for any single outbound read call before falling back.
    pub quote_timeout_ms: u64,
    /// Slippage estimate clamp, in percent.
    pub min_slippage_pct: f64,
    pub max_slippage_pct: f64,
    /// Seed for the slippage jitter source; pinned in tests, random otherwise.
    pub jitter_seed: Option<u64>,
    /// Hex-encoded secp256k1 key for quote signing (optional; quotes are
    /// unsigned when absent).
    pub signer_key_hex: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            pricing_rpc_url: env::var("PRICING_RPC_URL")
                .unwrap_or_else(|_| "https://api.avax-test.network/ext/bc/C/rpc".to_string()),
            pricing_chain_id: env::var("PRICING_CHAIN_ID")
                .unwrap_or_else(|_| "43113".to_string())
                .parse()
                .unwrap_or(43113),
            registry_path: env::var("REGISTRY_PATH").ok(),
            quote_timeout_ms: env::var("QUOTE_TIMEOUT_MS")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            min_slippage_pct: env::var("MIN_SLIPPAGE_PCT")
                .unwrap_or_else(|_| "0.1".to_string())
                .parse()
                .unwrap_or(0.1),
            max_slippage_pct: env::var("MAX_SLIPPAGE_PCT")
                .unwrap_or_else(|_| "3.0".to_string())
                .parse()
                .unwrap_or(3.0),
            jitter_seed: env::var("JITTER_SEED").ok().and_then(|v| v.parse().ok()),
            signer_key_hex: env::var("QUOTE_SIGNER_KEY").ok(),
        }
    }

    pub fn quote_timeout(&self) -> Duration {
        Duration::from_millis(self.quote_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), RouterError> {
        if self.pricing_rpc_url.is_empty() {
            return Err(RouterError::ConfigError(
                "PRICING_RPC_URL cannot be empty".to_string(),
            ));
        }
        url::Url::parse(&self.pricing_rpc_url).map_err(|e| {
            RouterError::ConfigError(format!(
                "PRICING_RPC_URL is not a valid URL ({}): {}",
                self.pricing_rpc_url, e
            ))
        })?;
        if self.min_slippage_pct <= 0.0 || self.max_slippage_pct < self.min_slippage_pct {
            return Err(RouterError::ConfigError(format!(
                "slippage clamp is inverted: [{}, {}]",
                self.min_slippage_pct, self.max_slippage_pct
            )));
        }
        Ok(())
    }

    pub fn log_summary(&self) {
        log::info!(
            "Configuration loaded: pricing_chain_id={}, quote_timeout_ms={}, registry={}",
            self.pricing_chain_id,
            self.quote_timeout_ms,
            self.registry_path.as_deref().unwrap_or("<built-in>")
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pricing_rpc_url: "https://api.avax-test.network/ext/bc/C/rpc".to_string(),
            pricing_chain_id: 43113,
            registry_path: None,
            quote_timeout_ms: 3000,
            min_slippage_pct: 0.1,
            max_slippage_pct: 3.0,
            jitter_seed: None,
            signer_key_hex: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.pricing_chain_id, 43113);
    }

    #[test]
    fn inverted_slippage_clamp_is_rejected() {
        let cfg = Config {
            min_slippage_pct: 2.0,
            max_slippage_pct: 1.0,
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(RouterError::ConfigError(_))
        ));
    }

    #[test]
    fn bad_rpc_url_is_rejected() {
        let cfg = Config {
            pricing_rpc_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }
}
