//! CoinWorks Reward Engine
//!
//! Once-per-calendar-day randomized rewards, credited through the
//! account ledger.
//!
//! # Design
//!
//! - Eligibility is recomputed on every call (`last_claim >= today`
//!   blocks); there is no stored "available" state to reset
//! - The claim check-and-set is atomic per account, so concurrent
//!   duplicate requests can never both claim on the same day
//! - The scheduler trusts the reward bounds it is given; validating a
//!   range update is the configuration owner's job, done via
//!   [`RewardRange::new`] before the bounds ever reach a claim

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod error;
pub mod scheduler;

// Re-exports
pub use error::{Error, Result};
pub use scheduler::{RewardRange, RewardScheduler};
