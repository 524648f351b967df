//! Main economy orchestration layer
//!
//! Ties the ledger, reward scheduler, leaderboard and persistence
//! gateway into a high-level API: the command layer only ever talks to
//! [`EconomyEngine`], never to the raw maps behind it.

use crate::{
    config::Config,
    error::{Error, Result},
    metrics::Metrics,
    settings::ServerSettings,
};
use chrono::NaiveDate;
use leaderboard::{Leaderboard, LeaderboardPage};
use ledger_core::{AccountId, Ledger};
use persistence::{Checkpointer, LegacyImporter, ServerDataStore, UserDataStore};
use reward_engine::RewardScheduler;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

/// The one surface the command layer consumes
#[derive(Debug)]
pub struct EconomyEngine {
    ledger: Arc<Ledger>,
    rewards: RewardScheduler,
    board: Leaderboard,
    settings: ServerSettings,
    user_store: UserDataStore,
    server_store: ServerDataStore,
    metrics: Metrics,
}

impl EconomyEngine {
    /// Build a fully wired engine from configuration
    ///
    /// Loads server settings (creating defaults on first run), runs the
    /// one-time legacy import if old files are present, then loads user
    /// data into the ledger and scheduler. Legacy data loads first so
    /// the active store is authoritative on conflicts.
    pub fn bootstrap(config: Config) -> Result<Self> {
        let user_store = UserDataStore::new(config.user_data_path());
        let server_store = ServerDataStore::new(config.server_data_path());

        let first_run = !server_store.path().exists();
        let mut server_data = server_store.load();

        let importer =
            LegacyImporter::new(&config.legacy.user_data, &config.legacy.server_data);
        let legacy = importer.run();

        if let Some(import) = &legacy {
            if let Some(imported) = &import.config {
                if let Some(currency) = &imported.currency {
                    server_data.currency = currency.clone();
                }
                if let Some(locale) = &imported.locale {
                    server_data.locale = locale.clone();
                }
                if let Some((min, max)) = imported.daily_reward {
                    server_data.daily_reward_min = min;
                    server_data.daily_reward_max = max;
                }
            }
        }

        let settings = ServerSettings::new(server_data);
        if first_run || legacy.as_ref().is_some_and(|i| i.config.is_some()) {
            server_store.save(&settings.snapshot())?;
        }

        let ledger = Arc::new(Ledger::new(settings.currency()));
        let rewards = RewardScheduler::new(Arc::clone(&ledger));

        if let Some(import) = &legacy {
            if let Some(data) = &import.user_data {
                ledger.bulk_load(data.balances.clone());
                rewards.load_claims(data.claims.clone());
            }
        }

        let data = user_store.load()?;
        ledger.bulk_load(data.balances);
        rewards.load_claims(data.claims);

        if legacy.as_ref().is_some_and(|i| i.user_data.is_some()) {
            user_store.save(&ledger.snapshot().balances, &rewards.snapshot())?;
        }

        let ttl = config.leaderboard.cache_ttl_secs;
        let board = if ttl > 0 {
            Leaderboard::with_cache_ttl(Arc::clone(&ledger), Duration::from_secs(ttl))
        } else {
            Leaderboard::new(Arc::clone(&ledger))
        };

        let metrics = Metrics::new()?;
        metrics.update_accounts(ledger.snapshot().len() as i64);

        tracing::info!(currency = %settings.currency(), "Economy engine ready");

        Ok(Self {
            ledger,
            rewards,
            board,
            settings,
            user_store,
            server_store,
            metrics,
        })
    }

    /// Active currency name
    pub fn currency(&self) -> String {
        self.settings.currency()
    }

    /// Locale tag for display text
    pub fn locale(&self) -> String {
        self.settings.locale()
    }

    /// Balance of an account, 0 if unknown
    pub fn balance(&self, account: AccountId) -> Decimal {
        self.ledger.balance(account)
    }

    /// Move funds between two accounts
    ///
    /// Rejects non-positive amounts before any mutation; a debit that
    /// cannot be covered is [`Error::InsufficientFunds`] and the
    /// receiver is never credited.
    pub fn pay(&self, from: AccountId, to: AccountId, amount: Decimal) -> Result<()> {
        require_positive(amount)?;

        if !self.ledger.transfer(from, to, amount) {
            self.metrics.record_insufficient_funds();
            return Err(Error::InsufficientFunds);
        }

        self.metrics.record_payment();
        Ok(())
    }

    /// Admin: replace an account's balance
    pub fn admin_set_balance(&self, account: AccountId, amount: Decimal) -> Result<()> {
        self.ledger.set_balance(account, amount)?;
        Ok(())
    }

    /// Admin: credit an account
    pub fn admin_deposit(&self, account: AccountId, amount: Decimal) -> Result<()> {
        require_positive(amount)?;
        self.ledger.add_balance(account, amount);
        Ok(())
    }

    /// Admin: debit an account, failing when it cannot cover the amount
    pub fn admin_withdraw(&self, account: AccountId, amount: Decimal) -> Result<()> {
        require_positive(amount)?;

        if !self.ledger.subtract_balance(account, amount) {
            self.metrics.record_insufficient_funds();
            return Err(Error::InsufficientFunds);
        }
        Ok(())
    }

    /// Claim the daily reward for an account on the given date
    pub fn claim_daily_reward(&self, account: AccountId, today: NaiveDate) -> Result<Decimal> {
        match self.rewards.claim(account, today, self.settings.reward_range()) {
            Ok(amount) => {
                self.metrics.record_claim();
                Ok(amount)
            }
            Err(error) => {
                if matches!(error, reward_engine::Error::AlreadyClaimedToday) {
                    self.metrics.record_claim_rejected();
                }
                Err(error.into())
            }
        }
    }

    /// Date of an account's last successful claim, if any
    pub fn last_claim(&self, account: AccountId) -> Option<NaiveDate> {
        self.rewards.last_claim(account)
    }

    /// Rename the currency, migrating every balance under the new name
    ///
    /// Returns `false` when the name was already active. The new name
    /// is persisted immediately.
    pub fn rename_currency(&self, new_name: &str) -> Result<bool> {
        if !self.settings.set_currency(new_name)? {
            return Ok(false);
        }

        self.ledger.migrate_currency(&self.settings.currency());
        self.board.invalidate();
        self.metrics.record_currency_migration();
        self.server_store.save(&self.settings.snapshot())?;
        Ok(true)
    }

    /// Update the daily reward bounds; `min > max` retains the prior range
    pub fn set_daily_reward(&self, min: u32, max: u32) -> Result<()> {
        self.settings.set_daily_reward(min, max)?;
        self.server_store.save(&self.settings.snapshot())?;
        Ok(())
    }

    /// Update the locale tag
    pub fn set_locale(&self, tag: &str) -> Result<()> {
        self.settings.set_locale(tag)?;
        self.server_store.save(&self.settings.snapshot())?;
        Ok(())
    }

    /// One page of the balance leaderboard
    pub fn leaderboard_page(&self, page: usize, page_size: usize) -> LeaderboardPage {
        self.board.page(page, page_size)
    }

    /// 1-based leaderboard rank of an account
    pub fn rank_of(&self, account: AccountId) -> Option<usize> {
        self.board.rank_of(account)
    }

    /// Persist all state and clear the dirty flags
    pub fn save(&self) -> Result<()> {
        let snapshot = self.ledger.snapshot();
        self.user_store.save(&snapshot.balances, &self.rewards.snapshot())?;
        self.server_store.save(&self.settings.snapshot())?;

        self.ledger.take_dirty();
        self.rewards.take_dirty();
        self.settings.take_dirty();
        self.metrics.update_accounts(snapshot.len() as i64);
        Ok(())
    }

    /// Persist only when something changed since the last save
    pub fn flush_if_dirty(&self) -> Result<bool> {
        if !(self.ledger.is_dirty() || self.rewards.is_dirty() || self.settings.is_dirty()) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Flush unsaved mutation, then re-read both stores and reconcile
    ///
    /// Saving happens only when something is dirty, so settings edited
    /// on disk while the engine is quiescent are picked up, not
    /// clobbered.
    pub fn reload(&self) -> Result<()> {
        self.flush_if_dirty()?;

        let data = self.user_store.load()?;
        self.ledger.bulk_load(data.balances);
        self.rewards.load_claims(data.claims);

        let server_data = self.server_store.load();
        self.settings
            .set_daily_reward(server_data.daily_reward_min, server_data.daily_reward_max)?;
        self.settings.set_locale(&server_data.locale)?;
        if self.settings.set_currency(&server_data.currency)? {
            self.ledger.migrate_currency(&server_data.currency);
            self.metrics.record_currency_migration();
        }

        self.board.invalidate();
        tracing::info!("Economy engine reloaded");
        Ok(())
    }

    /// Spawn the periodic checkpointer for this engine
    pub fn start_checkpointer(self: &Arc<Self>, period: Duration) -> Checkpointer {
        let engine = Arc::clone(self);
        Checkpointer::spawn(period, move || {
            engine
                .flush_if_dirty()
                .map_err(|e| persistence::Error::Other(e.to_string()))
        })
    }

    /// Metrics collector for this engine
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

fn require_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    Ok(())
}
