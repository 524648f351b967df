//! Daily reward scheduling
//!
//! One claim per account per calendar date. The scheduler owns the
//! claim-record map exclusively but only ever mutates balances through
//! the ledger.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ledger_core::{AccountId, Ledger};
use rand::Rng;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Validated inclusive reward bounds
///
/// Non-negativity is guaranteed by the type; `new` fails fast when
/// `min > max`, so a claim never sees an inverted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardRange {
    min: u32,
    max: u32,
}

impl RewardRange {
    /// Validate and build a reward range
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max {
            return Err(Error::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower bound (inclusive)
    pub fn min(&self) -> u32 {
        self.min
    }

    /// Upper bound (inclusive)
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Draw a uniformly distributed amount in `[min, max]`
    pub fn draw(&self) -> u32 {
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

impl Default for RewardRange {
    fn default() -> Self {
        Self { min: 100, max: 500 }
    }
}

/// Decides claim eligibility and pays out through the ledger
pub struct RewardScheduler {
    /// Ledger rewards are credited into
    ledger: Arc<Ledger>,

    /// Last successful claim date per account
    claims: DashMap<AccountId, NaiveDate>,

    /// Set by every committed claim, cleared by the checkpointer
    dirty: AtomicBool,
}

impl std::fmt::Debug for RewardScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewardScheduler")
            .field("claims", &self.claims.len())
            .finish()
    }
}

impl RewardScheduler {
    /// Create a scheduler paying out into the given ledger
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self {
            ledger,
            claims: DashMap::new(),
            dirty: AtomicBool::new(false),
        }
    }

    /// Claim the daily reward for `account` on the date `today`
    ///
    /// Fails with [`Error::AlreadyClaimedToday`] and performs no
    /// mutation when a claim for `today` (or a later date, under
    /// backwards clock movement) is already recorded. Otherwise draws
    /// an amount from `range`, records the claim, credits the ledger
    /// and returns the credited amount.
    ///
    /// The record is written before the credit and both happen under
    /// the account's claim entry, so a duplicate concurrent request
    /// cannot claim twice and a retry after a crash cannot credit
    /// twice for the same day.
    pub fn claim(
        &self,
        account: AccountId,
        today: NaiveDate,
        range: RewardRange,
    ) -> Result<Decimal> {
        let entry = self.claims.entry(account);
        if let Entry::Occupied(ref occupied) = entry {
            // >= keeps last_claim monotonically non-decreasing even if
            // the wall clock moves backwards
            if *occupied.get() >= today {
                return Err(Error::AlreadyClaimedToday);
            }
        }

        let amount = Decimal::from(range.draw());
        match entry {
            Entry::Occupied(mut occupied) => {
                occupied.insert(today);
                self.ledger.add_balance(account, amount);
            }
            Entry::Vacant(vacant) => {
                let guard = vacant.insert(today);
                self.ledger.add_balance(account, amount);
                drop(guard);
            }
        }
        self.mark_dirty();

        tracing::debug!(%account, %today, %amount, "Daily reward claimed");
        Ok(amount)
    }

    /// Date of the account's last successful claim, if any
    pub fn last_claim(&self, account: AccountId) -> Option<NaiveDate> {
        self.claims.get(&account).map(|entry| *entry.value())
    }

    /// Whether a claim on `today` would currently succeed
    pub fn is_available(&self, account: AccountId, today: NaiveDate) -> bool {
        self.last_claim(account).map_or(true, |last| last < today)
    }

    /// Merge an externally loaded claim map, loaded values winning
    pub fn load_claims(&self, claims: HashMap<AccountId, NaiveDate>) {
        let count = claims.len();
        for (account, date) in claims {
            self.claims.insert(account, date);
        }

        tracing::info!(count, "Claim records loaded");
    }

    /// Immutable copy of all claim records
    pub fn snapshot(&self) -> HashMap<AccountId, NaiveDate> {
        self.claims
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect()
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

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Arc<Ledger>, RewardScheduler) {
        let ledger = Arc::new(Ledger::new("Coins"));
        let scheduler = RewardScheduler::new(Arc::clone(&ledger));
        (ledger, scheduler)
    }

    fn day(ordinal: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap() + chrono::Days::new(ordinal as u64)
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(matches!(
            RewardRange::new(500, 100),
            Err(Error::InvalidRange { min: 500, max: 100 })
        ));
        assert!(RewardRange::new(0, 0).is_ok());
        assert!(RewardRange::new(100, 100).is_ok());
    }

    #[test]
    fn test_claim_credits_within_bounds() {
        let (ledger, scheduler) = setup();
        let account = AccountId::random();
        let range = RewardRange::new(100, 500).unwrap();

        let amount = scheduler.claim(account, day(0), range).unwrap();

        assert!(amount >= Decimal::from(100) && amount <= Decimal::from(500));
        assert_eq!(ledger.balance(account), amount);
        assert_eq!(scheduler.last_claim(account), Some(day(0)));
    }

    #[test]
    fn test_second_claim_same_day_fails_without_mutation() {
        let (ledger, scheduler) = setup();
        let account = AccountId::random();
        let range = RewardRange::default();

        let amount = scheduler.claim(account, day(0), range).unwrap();
        let result = scheduler.claim(account, day(0), range);

        assert!(matches!(result, Err(Error::AlreadyClaimedToday)));
        assert_eq!(ledger.balance(account), amount);
        assert_eq!(scheduler.last_claim(account), Some(day(0)));
    }

    #[test]
    fn test_claim_succeeds_again_next_day() {
        let (ledger, scheduler) = setup();
        let account = AccountId::random();
        let range = RewardRange::default();

        let first = scheduler.claim(account, day(0), range).unwrap();
        let second = scheduler.claim(account, day(1), range).unwrap();

        assert_eq!(ledger.balance(account), first + second);
        assert_eq!(scheduler.last_claim(account), Some(day(1)));
    }

    #[test]
    fn test_claim_date_is_monotonic_under_clock_skew() {
        let (_ledger, scheduler) = setup();
        let account = AccountId::random();
        let range = RewardRange::default();

        scheduler.claim(account, day(5), range).unwrap();
        let result = scheduler.claim(account, day(4), range);

        assert!(matches!(result, Err(Error::AlreadyClaimedToday)));
        assert_eq!(scheduler.last_claim(account), Some(day(5)));
    }

    #[test]
    fn test_degenerate_range_pays_exact_amount() {
        let (_ledger, scheduler) = setup();
        let range = RewardRange::new(42, 42).unwrap();

        for ordinal in 0..10 {
            let account = AccountId::random();
            let amount = scheduler.claim(account, day(ordinal), range).unwrap();
            assert_eq!(amount, Decimal::from(42));
        }
    }

    #[test]
    fn test_draws_stay_inside_bounds() {
        let range = RewardRange::new(3, 7).unwrap();
        for _ in 0..1000 {
            let drawn = range.draw();
            assert!((3..=7).contains(&drawn));
        }
    }

    #[test]
    fn test_is_available_tracks_claims() {
        let (_ledger, scheduler) = setup();
        let account = AccountId::random();

        assert!(scheduler.is_available(account, day(0)));
        scheduler.claim(account, day(0), RewardRange::default()).unwrap();
        assert!(!scheduler.is_available(account, day(0)));
        assert!(scheduler.is_available(account, day(1)));
    }

    #[test]
    fn test_load_and_snapshot_round_trip() {
        let (_ledger, scheduler) = setup();
        let a = AccountId::random();
        let b = AccountId::random();

        let mut claims = HashMap::new();
        claims.insert(a, day(1));
        claims.insert(b, day(2));
        scheduler.load_claims(claims.clone());

        assert_eq!(scheduler.snapshot(), claims);
    }

    #[test]
    fn test_concurrent_same_day_claims_single_success() {
        let (ledger, scheduler) = setup();
        let scheduler = Arc::new(scheduler);
        let account = AccountId::random();
        let range = RewardRange::new(10, 10).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let scheduler = Arc::clone(&scheduler);
                std::thread::spawn(move || scheduler.claim(account, day(0), range).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(ledger.balance(account), Decimal::from(10));
    }

    #[test]
    fn test_dirty_flag_set_by_claims_only() {
        let (_ledger, scheduler) = setup();
        assert!(!scheduler.is_dirty());

        let account = AccountId::random();
        scheduler.claim(account, day(0), RewardRange::default()).unwrap();
        assert!(scheduler.take_dirty());

        // A rejected claim performs no mutation
        let _ = scheduler.claim(account, day(0), RewardRange::default());
        assert!(!scheduler.is_dirty());
    }
}
