pub mod config;
pub mod error;
pub mod gateway;
pub mod oracle;
pub mod registry;
pub mod routing;
pub mod signer;
pub mod utils;

// Re-export the surface most callers need
pub use error::RouterError;
pub use gateway::{
    ConfidenceBucket, ContractReader, JsonRpcReader, QuoteFacade, QuoteRequest, SwapQuote,
    WalletContext,
};
pub use oracle::{PriceOracle, StaticPriceOracle};
pub use registry::ChainRegistry;
pub use routing::{Objective, RouteKind, RouteQuote};
pub use signer::{QuoteSigner, SignedQuote};
