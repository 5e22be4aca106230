// src/signer/mod.rs
//! Quote attestation. Binds the economically meaningful fields of a scored
//! route to a secp256k1 signature over their keccak digest, so a settlement
//! layer can later check that a quote came from this service unmodified.

use crate::error::RouterError;
use crate::routing::{Objective, RouteQuote};
use alloy_primitives::{keccak256, Address, PrimitiveSignature, B256, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolValue;
use log::debug;

/// A signed quote digest. The hash covers expected output, gas, time and the
/// issuance timestamp; anything else on the quote is advisory and unsigned.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedQuote {
    pub hash: B256,
    pub signature: PrimitiveSignature,
    pub timestamp: u64,
}

impl SignedQuote {
    /// Checks that the signature over `hash` recovers to `expected`.
    pub fn verify(&self, expected: Address) -> Result<bool, RouterError> {
        let recovered = self
            .signature
            .recover_address_from_prehash(&self.hash)
            .map_err(|e| RouterError::SigningError(format!("recovery failed: {}", e)))?;
        Ok(recovered == expected)
    }
}

pub struct QuoteSigner {
    inner: PrivateKeySigner,
}

impl QuoteSigner {
    pub fn new(inner: PrivateKeySigner) -> Self {
        Self { inner }
    }

    /// Parses a hex-encoded private key, with or without a `0x` prefix.
    pub fn from_hex(key: &str) -> Result<Self, RouterError> {
        key.trim_start_matches("0x")
            .parse::<PrivateKeySigner>()
            .map(Self::new)
            .map_err(|e| RouterError::SigningError(format!("invalid signer key: {}", e)))
    }

    pub fn address(&self) -> Address {
        self.inner.address()
    }

    /// Hashes and signs a quote at the given issuance timestamp.
    pub fn sign(&self, quote: &RouteQuote, timestamp: u64) -> Result<SignedQuote, RouterError> {
        let hash = quote_digest(quote, timestamp);
        let signature = self
            .inner
            .sign_hash_sync(&hash)
            .map_err(|e| RouterError::SigningError(format!("signing failed: {}", e)))?;
        debug!("Signed quote digest {} at t={}", hash, timestamp);
        Ok(SignedQuote {
            hash,
            signature,
            timestamp,
        })
    }
}

/// keccak256 over the abi-encoded tuple
/// `(expectedOutputWei, estimatedGas, estimatedTimeSecs, timestamp, objective)`.
pub fn quote_digest(quote: &RouteQuote, timestamp: u64) -> B256 {
    let objective_tag: u64 = match quote.objective {
        Objective::MaxNetValue => 0,
        Objective::FastestTime => 1,
    };
    let payload = (
        output_to_wei(quote.expected_output),
        U256::from(quote.estimated_gas),
        U256::from(quote.estimated_time_secs),
        U256::from(timestamp),
        U256::from(objective_tag),
    );
    keccak256(payload.abi_encode())
}

fn output_to_wei(amount: f64) -> U256 {
    U256::from((amount.max(0.0) * 1e18).min(u128::MAX as f64) as u128)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ChainRegistry;
    use crate::routing::{enumerate_paths, score_path, Objective};
    use pretty_assertions::assert_eq;

    const TEST_KEY: &str = "0x0123456789012345678901234567890123456789012345678901234567890123";

    fn sample_quote() -> RouteQuote {
        let registry = ChainRegistry::default_testnets();
        let usdc = registry.resolve_token_address(43113, "USDC").unwrap();
        let wavax = registry.resolve_token_address(43113, "WAVAX").unwrap();
        let paths = enumerate_paths(&registry, 43113, 43113, wavax, usdc);
        score_path(&registry, &paths[0], 100.0, Objective::MaxNetValue)
    }

    #[test]
    fn sign_then_verify_round_trips() {
        let signer = QuoteSigner::from_hex(TEST_KEY).unwrap();
        let quote = sample_quote();
        let signed = signer.sign(&quote, 1_700_000_000).unwrap();
        assert!(signed.verify(signer.address()).unwrap());
    }

    #[test]
    fn verification_fails_for_another_address() {
        let signer = QuoteSigner::from_hex(TEST_KEY).unwrap();
        let other = QuoteSigner::from_hex(
            "0x1111111111111111111111111111111111111111111111111111111111111111",
        )
        .unwrap();
        let signed = signer.sign(&sample_quote(), 1_700_000_000).unwrap();
        assert!(!signed.verify(other.address()).unwrap());
    }

    #[test]
    fn digest_binds_every_signed_field() {
        let quote = sample_quote();
        let base = quote_digest(&quote, 1_700_000_000);

        assert_ne!(base, quote_digest(&quote, 1_700_000_001));

        let mut tampered = quote.clone();
        tampered.expected_output += 1.0;
        assert_ne!(base, quote_digest(&tampered, 1_700_000_000));

        let mut tampered = quote.clone();
        tampered.estimated_gas += 1;
        assert_ne!(base, quote_digest(&tampered, 1_700_000_000));

        let mut tampered = quote.clone();
        tampered.estimated_time_secs += 1;
        assert_ne!(base, quote_digest(&tampered, 1_700_000_000));

        let mut tampered = quote;
        tampered.objective = Objective::FastestTime;
        assert_ne!(base, quote_digest(&tampered, 1_700_000_000));
    }

    #[test]
    fn digest_is_deterministic() {
        let quote = sample_quote();
        assert_eq!(
            quote_digest(&quote, 1_700_000_000),
            quote_digest(&quote, 1_700_000_000)
        );
    }

    #[test]
    fn bad_key_is_rejected() {
        assert!(QuoteSigner::from_hex("not-a-key").is_err());
    }
}
