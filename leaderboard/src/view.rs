//! Leaderboard view over a live ledger
//!
//! Wraps the pure ranking math with snapshot acquisition and an
//! optional staleness window. With no TTL every call re-sorts a fresh
//! snapshot (always-consistent); with a TTL the sorted view is
//! recomputed lazily once it has aged out.

use crate::ranker::{self, LeaderboardEntry, LeaderboardPage};
use ledger_core::{AccountId, Ledger};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct CachedRanking {
    computed_at: Instant,
    entries: Vec<LeaderboardEntry>,
}

/// Ranked view of a ledger, optionally cached for a staleness window
pub struct Leaderboard {
    ledger: Arc<Ledger>,
    cache_ttl: Option<Duration>,
    cache: Mutex<Option<CachedRanking>>,
}

impl std::fmt::Debug for Leaderboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Leaderboard")
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl Leaderboard {
    /// Always-consistent view: every call ranks a fresh snapshot
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self {
            ledger,
            cache_ttl: None,
            cache: Mutex::new(None),
        }
    }

    /// Cached view: the ranking is reused until `ttl` has elapsed
    pub fn with_cache_ttl(ledger: Arc<Ledger>, ttl: Duration) -> Self {
        Self {
            ledger,
            cache_ttl: Some(ttl),
            cache: Mutex::new(None),
        }
    }

    /// The full ranked view, best rank first
    pub fn ranking(&self) -> Vec<LeaderboardEntry> {
        let Some(ttl) = self.cache_ttl else {
            return ranker::ranking(&self.ledger.snapshot());
        };

        let mut cache = self.cache.lock();
        match cache.as_ref() {
            Some(cached) if cached.computed_at.elapsed() < ttl => cached.entries.clone(),
            _ => {
                let entries = ranker::ranking(&self.ledger.snapshot());
                tracing::debug!(entries = entries.len(), "Leaderboard ranking recomputed");
                *cache = Some(CachedRanking {
                    computed_at: Instant::now(),
                    entries: entries.clone(),
                });
                entries
            }
        }
    }

    /// One page of the ranked view
    pub fn page(&self, page: usize, page_size: usize) -> LeaderboardPage {
        ranker::paginate(&self.ranking(), page, page_size)
    }

    /// 1-based rank of an account, `None` without a recorded balance
    pub fn rank_of(&self, account: AccountId) -> Option<usize> {
        self.ranking()
            .iter()
            .position(|entry| entry.account == account)
            .map(|index| index + 1)
    }

    /// Drop any cached ranking so the next read recomputes
    pub fn invalidate(&self) {
        *self.cache.lock() = None;
    }
}
