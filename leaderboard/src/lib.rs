//! CoinWorks Leaderboard
//!
//! Ranked, paginated views over a ledger snapshot.
//!
//! # Design
//!
//! - Ranking and pagination are pure functions of a snapshot: balance
//!   descending, ties broken by account id ascending, so repeated calls
//!   with no intervening mutation page identically
//! - Page numbers clamp into `[1, total_pages]`; an empty snapshot is
//!   one empty page, never an error
//! - Presentation granularity (chat listing vs. menu grid) is a plain
//!   page-size parameter, not part of the algorithm
//! - [`Leaderboard`] optionally caches the sorted view for a staleness
//!   window; the window is configuration, the contract stays the same

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod ranker;
pub mod view;

// Re-exports
pub use ranker::{
    paginate, rank_of, ranking, LeaderboardEntry, LeaderboardPage, CHAT_PAGE_SIZE,
    GRID_PAGE_SIZE,
};
pub use view::Leaderboard;
