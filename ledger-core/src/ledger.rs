//! The account ledger
//!
//! All balance mutation in the system passes through [`Ledger`]. A single
//! ledger-wide `RwLock` makes every check-then-set race-free and lets a
//! currency migration exclude all other mutation for its full duration.
//!
//! # Example
//!
//! ```
//! use ledger_core::{AccountId, Ledger};
//! use rust_decimal::Decimal;
//!
//! let ledger = Ledger::new("Coins");
//! let alice = AccountId::random();
//!
//! ledger.add_balance(alice, Decimal::from(100));
//! assert!(ledger.subtract_balance(alice, Decimal::from(30)));
//! assert_eq!(ledger.balance(alice), Decimal::from(70));
//! ```

use crate::{
    error::{Error, Result},
    types::{AccountId, LedgerSnapshot},
};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Balance map plus the active currency, guarded as one unit.
///
/// The currency name lives inside the lock: a rename holds the write
/// lock and therefore excludes every other mutation while it runs.
struct LedgerState {
    currency: String,
    balances: HashMap<AccountId, Decimal>,
}

/// Authoritative store of account balances and the active currency
pub struct Ledger {
    state: RwLock<LedgerState>,

    /// Set by every committed mutation, cleared by the checkpointer
    dirty: AtomicBool,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Ledger")
            .field("currency", &state.currency)
            .field("accounts", &state.balances.len())
            .finish()
    }
}

impl Ledger {
    /// Create an empty ledger under the given currency
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(LedgerState {
                currency: currency.into(),
                balances: HashMap::new(),
            }),
            dirty: AtomicBool::new(false),
        }
    }

    /// Name of the currently active currency
    pub fn currency(&self) -> String {
        self.state.read().currency.clone()
    }

    /// Balance of an account, 0 if the account is unknown
    pub fn balance(&self, account: AccountId) -> Decimal {
        self.state
            .read()
            .balances
            .get(&account)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Replace an account's balance unconditionally
    ///
    /// The admin path allows any non-negative value; there is no upper
    /// bound. Negative amounts are rejected before any mutation.
    pub fn set_balance(&self, account: AccountId, amount: Decimal) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(Error::InvalidAmount(format!(
                "balance cannot be set to {}",
                amount
            )));
        }

        self.state.write().balances.insert(account, amount);
        self.mark_dirty();

        tracing::debug!(%account, %amount, "Balance set");
        Ok(())
    }

    /// Add to an account's balance, creating the account at 0 first
    ///
    /// The ledger adds whatever it is given; positivity checks for
    /// caller-facing flows (paying, rewarding) belong to the caller.
    pub fn add_balance(&self, account: AccountId, amount: Decimal) {
        let mut state = self.state.write();
        *state.balances.entry(account).or_insert(Decimal::ZERO) += amount;
        drop(state);
        self.mark_dirty();

        tracing::debug!(%account, %amount, "Balance credited");
    }

    /// Subtract from an account's balance if it is sufficient
    ///
    /// Returns `false` and leaves state unchanged when the current
    /// balance does not cover `amount`. The check and the commit happen
    /// under one write-lock acquisition, so two concurrent subtracts can
    /// never both pass against a balance that only covers one of them.
    pub fn subtract_balance(&self, account: AccountId, amount: Decimal) -> bool {
        let mut state = self.state.write();
        let current = state.balances.get(&account).copied().unwrap_or(Decimal::ZERO);
        if current < amount {
            return false;
        }
        state.balances.insert(account, current - amount);
        drop(state);
        self.mark_dirty();

        tracing::debug!(%account, %amount, "Balance debited");
        true
    }

    /// Move `amount` from one account to another
    ///
    /// Debit and credit commit under the same write-lock acquisition: a
    /// failed debit never credits the receiver, and no reader can observe
    /// the funds in flight.
    pub fn transfer(&self, from: AccountId, to: AccountId, amount: Decimal) -> bool {
        let mut state = self.state.write();
        let current = state.balances.get(&from).copied().unwrap_or(Decimal::ZERO);
        if current < amount {
            return false;
        }
        state.balances.insert(from, current - amount);
        *state.balances.entry(to).or_insert(Decimal::ZERO) += amount;
        drop(state);
        self.mark_dirty();

        tracing::debug!(%from, %to, %amount, "Transfer committed");
        true
    }

    /// Switch the active currency to `new_name`
    ///
    /// Every account's balance under the old name folds into the new
    /// name, so the sum of all balances is conserved exactly. Returns
    /// `false` (no-op) when `new_name` is already active. Holds the
    /// write lock for its full duration.
    pub fn migrate_currency(&self, new_name: &str) -> bool {
        let mut state = self.state.write();
        if state.currency == new_name {
            return false;
        }

        let old = std::mem::replace(&mut state.currency, new_name.to_string());
        let accounts = state.balances.len();
        drop(state);
        self.mark_dirty();

        tracing::info!(
            old_currency = %old,
            new_currency = %new_name,
            accounts,
            "Currency migrated"
        );
        true
    }

    /// Take an immutable point-in-time copy of all balances
    pub fn snapshot(&self) -> LedgerSnapshot {
        let state = self.state.read();
        LedgerSnapshot {
            currency: state.currency.clone(),
            balances: state.balances.clone(),
        }
    }

    /// Merge an externally loaded balance map into the ledger
    ///
    /// On key conflict the loaded value is authoritative. Used at
    /// startup by the persistence gateway.
    pub fn bulk_load(&self, balances: HashMap<AccountId, Decimal>) {
        let count = balances.len();
        self.state.write().balances.extend(balances);

        tracing::info!(count, "Balances loaded into ledger");
    }

    /// True when there is unpersisted mutation
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Clear the dirty flag, returning whether it was set
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }
}
