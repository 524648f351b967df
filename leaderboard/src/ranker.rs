//! Ranking and pagination math
//!
//! Pure functions over a [`LedgerSnapshot`]; nothing here reads the
//! clock or touches the live ledger.

use ledger_core::{AccountId, LedgerSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Page size for chat-style listings
pub const CHAT_PAGE_SIZE: usize = 10;

/// Page size for the 9x5 menu grid
pub const GRID_PAGE_SIZE: usize = 45;

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Ranked account
    pub account: AccountId,

    /// Balance at snapshot time
    pub balance: Decimal,
}

/// One page of the ranked view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardPage {
    /// Entries on this page, best rank first
    pub entries: Vec<LeaderboardEntry>,

    /// The page actually returned (after clamping)
    pub page: usize,

    /// Total number of pages, at least 1
    pub total_pages: usize,
}

/// Sort a snapshot into the full ranked view
///
/// Balance descending; ties break by account id ascending so the order
/// is a stable total order.
pub fn ranking(snapshot: &LedgerSnapshot) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = snapshot
        .balances
        .iter()
        .map(|(account, balance)| LeaderboardEntry {
            account: *account,
            balance: *balance,
        })
        .collect();

    entries.sort_by(|a, b| b.balance.cmp(&a.balance).then(a.account.cmp(&b.account)));
    entries
}

/// 1-based rank of an account, `None` if it has no recorded balance
pub fn rank_of(snapshot: &LedgerSnapshot, account: AccountId) -> Option<usize> {
    let target = *snapshot.balances.get(&account)?;

    let ahead = snapshot
        .balances
        .iter()
        .filter(|(id, balance)| {
            **balance > target || (**balance == target && **id < account)
        })
        .count();

    Some(ahead + 1)
}

/// Slice one page out of a ranked view
///
/// `total_pages = max(1, ceil(n / page_size))` and `page` clamps into
/// `[1, total_pages]`; page 0 is page 1, an absurdly large page is the
/// last one. A zero `page_size` is treated as 1.
pub fn paginate(
    entries: &[LeaderboardEntry],
    page: usize,
    page_size: usize,
) -> LeaderboardPage {
    let page_size = page_size.max(1);
    let total_pages = (entries.len().div_ceil(page_size)).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(entries.len());
    let entries = if start < entries.len() {
        entries[start..end].to_vec()
    } else {
        Vec::new()
    };

    LeaderboardPage {
        entries,
        page,
        total_pages,
    }
}
