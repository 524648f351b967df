//! Error types for the reward engine

use thiserror::Error;

/// Result type for reward operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reward engine errors
#[derive(Error, Debug)]
pub enum Error {
    /// The account already claimed its reward on this calendar date
    #[error("Daily reward already claimed today")]
    AlreadyClaimedToday,

    /// A reward-range update where min exceeds max
    #[error("Invalid reward range: min {min} exceeds max {max}")]
    InvalidRange {
        /// Requested lower bound
        min: u32,
        /// Requested upper bound
        max: u32,
    },

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
