pub mod settings;

pub use settings::Config;

use crate::error::RouterError;
use std::sync::Arc;

/// Loads and returns the application configuration as an `Arc<Config>`.
/// Centralizes `.env` handling, env parsing and validation.
pub fn load_config() -> Result<Arc<settings::Config>, RouterError> {
    dotenv::dotenv().ok(); // Load .env file if present, ignore errors

    let config = settings::Config::from_env();
    config.validate()?;
    config.log_summary();

    Ok(Arc::new(config))
}
