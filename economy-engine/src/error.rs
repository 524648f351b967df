//! Error types for the economy engine

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors
///
/// None of these are fatal: the ledger stays usable after any of them,
/// and only coarse success/failure crosses the component boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied a non-positive amount where a positive one is required
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The paying account cannot cover the requested amount
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// Rejected currency name (empty or blank)
    #[error("Invalid currency name: {0:?}")]
    InvalidCurrency(String),

    /// Rejected locale tag (empty or blank)
    #[error("Invalid locale tag: {0:?}")]
    InvalidLocale(String),

    /// Ledger error
    #[error("Ledger error: {0}")]
    Ledger(#[from] ledger_core::Error),

    /// Reward error (includes `AlreadyClaimedToday` and `InvalidRange`)
    #[error("Reward error: {0}")]
    Reward(#[from] reward_engine::Error),

    /// Persistence error
    #[error("Persistence error: {0}")]
    Persistence(#[from] persistence::Error),

    /// Metrics registration error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
