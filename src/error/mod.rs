use thiserror::Error;

/// Error taxonomy for the route optimizer.
///
/// Lower layers (registry lookups, enumerator, simulator, scorer, selector)
/// fail closed by returning `None`/empty collections; everything that reaches
/// a caller as an error goes through this enum so the facade can decide what
/// is a user problem, what triggers a fallback, and what is a bug.
#[derive(Debug, Clone, Error)]
pub enum RouterError {
    /// Request carried a non-numeric, empty or non-positive amount
    #[error("Invalid Amount: {0}")]
    InvalidAmount(String),

    /// Chain id is not present in the registry
    #[error("Unsupported Chain: {0}")]
    UnsupportedChain(u64),

    /// Enumeration produced zero viable candidates
    #[error("No Route Found: {0}")]
    NoRouteFound(String),

    /// Live on-chain path unavailable (wrong network, no account, paused router)
    #[error("Live Data Unavailable: {0}")]
    LiveDataUnavailable(String),

    /// JSON-RPC / provider failures
    #[error("RPC Error: {0}")]
    RpcError(String),

    /// Outbound call exceeded its deadline
    #[error("Timeout Error: {0}")]
    TimeoutError(String),

    /// Response decoding failures (hex, ABI, JSON)
    #[error("Parse Error: {0}")]
    ParseError(String),

    /// The fallback estimator itself broke (malformed registry data).
    /// Distinct from `NoRouteFound`: this one means a bug, not an empty result.
    #[error("Estimation Failed: {0}")]
    EstimationFailed(String),

    /// Quote encoding or signature failures
    #[error("Signing Error: {0}")]
    SigningError(String),

    /// Configuration errors
    #[error("Config Error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for RouterError {
    fn from(err: serde_json::Error) -> Self {
        RouterError::ParseError(format!("JSON serialization/deserialization error: {}", err))
    }
}

impl From<reqwest::Error> for RouterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RouterError::TimeoutError(format!("HTTP request timed out: {}", err))
        } else {
            RouterError::RpcError(format!("HTTP transport error: {}", err))
        }
    }
}

impl From<anyhow::Error> for RouterError {
    fn from(err: anyhow::Error) -> Self {
        RouterError::ConfigError(format!("{}", err))
    }
}

impl RouterError {
    /// Whether the facade may recover from this error by falling back to the
    /// simulated estimation pipeline.
    pub fn is_recoverable(&self) -> bool {
        match self {
            RouterError::InvalidAmount(_) => false,
            RouterError::UnsupportedChain(_) => false,
            RouterError::NoRouteFound(_) => false,
            RouterError::LiveDataUnavailable(_) => true,
            RouterError::RpcError(_) => true,
            RouterError::TimeoutError(_) => true,
            RouterError::ParseError(_) => true, // a garbled RPC response still allows estimation
            RouterError::EstimationFailed(_) => false,
            RouterError::SigningError(_) => false,
            RouterError::ConfigError(_) => false,
        }
    }

    /// Categorizes the error for logging and caller-facing messaging.
    pub fn categorize(&self) -> ErrorCategory {
        match self {
            RouterError::InvalidAmount(_) | RouterError::UnsupportedChain(_) => {
                ErrorCategory::InvalidRequest
            }
            RouterError::NoRouteFound(_) => ErrorCategory::NoRoute,
            RouterError::LiveDataUnavailable(_)
            | RouterError::RpcError(_)
            | RouterError::TimeoutError(_)
            | RouterError::ParseError(_) => ErrorCategory::LiveData,
            RouterError::EstimationFailed(_)
            | RouterError::SigningError(_)
            | RouterError::ConfigError(_) => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidRequest,
    NoRoute,
    LiveData,
    Internal,
}
