//! CoinWorks Persistence
//!
//! Durable load/save of ledger and claim state, plus one-time import of
//! the legacy file format.
//!
//! # Design
//!
//! - **Tolerant loads**: a single malformed stored entry (bad id, bad
//!   date, bad amount) is skipped with a warning; the rest of the load
//!   proceeds
//! - **Atomic writes**: files are written to a temp path and renamed in
//!   place
//! - **Decoupled flushing**: the ledger never does I/O under its lock;
//!   a checkpointer flushes dirty state on a fixed period
//! - **Legacy import is best-effort**: accounts that migrated stay
//!   migrated, and the legacy files are only deleted when every part of
//!   the import succeeded

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod checkpoint;
pub mod error;
pub mod gateway;
pub mod legacy;

// Re-exports
pub use checkpoint::Checkpointer;
pub use error::{Error, Result};
pub use gateway::{ServerData, ServerDataStore, UserData, UserDataStore};
pub use legacy::{LegacyBalance, LegacyConfig, LegacyImport, LegacyImporter};
