//! Core types for the ledger
//!
//! All types are designed for:
//! - Deterministic ordering (`AccountId` is `Ord` so ranking ties break
//!   reproducibly)
//! - Exact arithmetic (`Decimal` for money)
//! - Memory safety (no unsafe code)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque account identifier (a 128-bit identity token, e.g. a player UUID)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Wrap an existing identity token
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random account id
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for AccountId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Immutable point-in-time copy of ledger state
///
/// Taken under the ledger's read lock; mutations after the copy never
/// show through. Used by the leaderboard and the persistence gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Active currency name at snapshot time
    pub currency: String,

    /// Balance per account
    pub balances: HashMap<AccountId, Decimal>,
}

impl LedgerSnapshot {
    /// Balance of an account in this snapshot, 0 if unknown
    pub fn balance(&self, account: AccountId) -> Decimal {
        self.balances.get(&account).copied().unwrap_or(Decimal::ZERO)
    }

    /// Sum of all balances
    pub fn total(&self) -> Decimal {
        self.balances.values().copied().sum()
    }

    /// Number of accounts with a recorded balance
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// True when no account has a recorded balance
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}
