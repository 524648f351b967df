//! Metrics collection for observability
//!
//! Prometheus counters for the economy's traffic, registered on a
//! private registry.
//!
//! # Metrics
//!
//! - `economy_payments_total` - Committed player-to-player payments
//! - `economy_insufficient_funds_total` - Debits rejected for cover
//! - `economy_claims_total` - Successful daily reward claims
//! - `economy_claims_rejected_total` - Claims blocked by the daily gate
//! - `economy_currency_migrations_total` - Completed currency renames
//! - `economy_accounts` - Accounts with a recorded balance

use prometheus::{IntCounter, IntGauge, Opts, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Committed payments
    pub payments_total: IntCounter,

    /// Debits rejected for insufficient cover
    pub insufficient_funds_total: IntCounter,

    /// Successful daily claims
    pub claims_total: IntCounter,

    /// Claims blocked by the once-per-day gate
    pub claims_rejected_total: IntCounter,

    /// Completed currency migrations
    pub currency_migrations_total: IntCounter,

    /// Accounts with a recorded balance
    pub accounts: IntGauge,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("payments_total", &self.payments_total.get())
            .field("claims_total", &self.claims_total.get())
            .finish()
    }
}

impl Metrics {
    /// Create a collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let payments_total = IntCounter::with_opts(Opts::new(
            "economy_payments_total",
            "Committed player-to-player payments",
        ))?;
        registry.register(Box::new(payments_total.clone()))?;

        let insufficient_funds_total = IntCounter::with_opts(Opts::new(
            "economy_insufficient_funds_total",
            "Debits rejected for insufficient cover",
        ))?;
        registry.register(Box::new(insufficient_funds_total.clone()))?;

        let claims_total = IntCounter::with_opts(Opts::new(
            "economy_claims_total",
            "Successful daily reward claims",
        ))?;
        registry.register(Box::new(claims_total.clone()))?;

        let claims_rejected_total = IntCounter::with_opts(Opts::new(
            "economy_claims_rejected_total",
            "Claims blocked by the once-per-day gate",
        ))?;
        registry.register(Box::new(claims_rejected_total.clone()))?;

        let currency_migrations_total = IntCounter::with_opts(Opts::new(
            "economy_currency_migrations_total",
            "Completed currency renames",
        ))?;
        registry.register(Box::new(currency_migrations_total.clone()))?;

        let accounts = IntGauge::with_opts(Opts::new(
            "economy_accounts",
            "Accounts with a recorded balance",
        ))?;
        registry.register(Box::new(accounts.clone()))?;

        Ok(Self {
            payments_total,
            insufficient_funds_total,
            claims_total,
            claims_rejected_total,
            currency_migrations_total,
            accounts,
            registry,
        })
    }

    /// Record a committed payment
    pub fn record_payment(&self) {
        self.payments_total.inc();
    }

    /// Record a debit rejected for cover
    pub fn record_insufficient_funds(&self) {
        self.insufficient_funds_total.inc();
    }

    /// Record a successful claim
    pub fn record_claim(&self) {
        self.claims_total.inc();
    }

    /// Record a claim blocked by the daily gate
    pub fn record_claim_rejected(&self) {
        self.claims_rejected_total.inc();
    }

    /// Record a completed currency migration
    pub fn record_currency_migration(&self) {
        self.currency_migrations_total.inc();
    }

    /// Update the account count estimate
    pub fn update_accounts(&self, count: i64) {
        self.accounts.set(count);
    }

    /// Get the metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
