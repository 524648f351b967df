//! CoinWorks Economy Engine
//!
//! Wires the ledger, reward scheduler, leaderboard and persistence into
//! the one surface a command layer talks to.
//!
//! # Architecture
//!
//! - **Explicit wiring**: the engine constructs the ledger once and
//!   hands shared references to every collaborator; there is no global
//!   "current instance"
//! - **Validation at the edge**: caller-facing amount and range checks
//!   happen here, before anything reaches the ledger or scheduler
//! - **Dirty-flag persistence**: mutation only flips flags; files are
//!   written by explicit saves and the periodic checkpointer
//!
//! # Example
//!
//! ```no_run
//! use economy_engine::{Config, EconomyEngine};
//! use ledger_core::AccountId;
//! use rust_decimal::Decimal;
//!
//! fn main() -> economy_engine::Result<()> {
//!     let engine = EconomyEngine::bootstrap(Config::default())?;
//!
//!     let alice = AccountId::random();
//!     engine.admin_deposit(alice, Decimal::from(100))?;
//!     println!("{} {}", engine.balance(alice), engine.currency());
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod settings;

// Re-exports
pub use config::Config;
pub use engine::EconomyEngine;
pub use error::{Error, Result};
pub use metrics::Metrics;
pub use settings::ServerSettings;
