//! CoinWorks Ledger Core
//!
//! Authoritative in-memory store of account balances under a single,
//! renameable currency.
//!
//! # Architecture
//!
//! - **Single lock**: all mutation runs under one ledger-wide `RwLock`,
//!   so check-then-set operations are race-free
//! - **Scalar balances**: one balance per account under the active
//!   currency; legacy multi-currency records are folded at import time
//! - **Snapshot reads**: consumers (leaderboard, persistence) work on
//!   immutable point-in-time copies, never the live map
//!
//! # Invariants
//!
//! - Balances never go negative through the public API
//! - A currency rename conserves the sum of all balances
//! - Renaming to the already-active currency is a no-op

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod error;
pub mod ledger;
pub mod types;

// Re-exports
pub use error::{Error, Result};
pub use ledger::Ledger;
pub use types::{AccountId, LedgerSnapshot};
