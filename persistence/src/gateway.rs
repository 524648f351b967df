//! File-backed stores for user data and server data
//!
//! # File formats
//!
//! User data (`userdata.json`):
//!
//! ```json
//! {
//!   "balances":     { "<uuid>": "123.45" },
//!   "dailyRewards": { "<uuid>": "2025-06-01" }
//! }
//! ```
//!
//! Server data (`serverdata.json`):
//!
//! ```json
//! { "currency": "Coins", "locale": "en_US",
//!   "dailyRewardMin": 100, "dailyRewardMax": 500 }
//! ```
//!
//! Loads are tolerant: entries with an unparsable id, amount or date are
//! skipped and logged, the rest of the file loads normally. Balance
//! values that are per-currency objects (the legacy shape) are folded by
//! summation at load time.

use crate::error::Result;
use chrono::NaiveDate;
use ledger_core::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Ledger plus claim state as loaded from disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserData {
    /// Balance per account
    pub balances: HashMap<AccountId, Decimal>,

    /// Last claim date per account
    pub claims: HashMap<AccountId, NaiveDate>,
}

/// Persistent server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerData {
    /// Active currency name
    pub currency: String,

    /// Locale tag for display text
    pub locale: String,

    /// Daily reward lower bound (inclusive)
    #[serde(rename = "dailyRewardMin")]
    pub daily_reward_min: u32,

    /// Daily reward upper bound (inclusive)
    #[serde(rename = "dailyRewardMax")]
    pub daily_reward_max: u32,
}

impl Default for ServerData {
    fn default() -> Self {
        Self {
            currency: "Coins".to_string(),
            locale: "en_US".to_string(),
            daily_reward_min: 100,
            daily_reward_max: 500,
        }
    }
}

/// Serialized shape of the user-data file
#[derive(Serialize)]
struct UserDataFile {
    balances: BTreeMap<String, Decimal>,
    #[serde(rename = "dailyRewards")]
    daily_rewards: BTreeMap<String, String>,
}

/// Store for account balances and claim records
#[derive(Debug, Clone)]
pub struct UserDataStore {
    path: PathBuf,
}

impl UserDataStore {
    /// Store backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load user data, skipping malformed entries
    ///
    /// A missing file is an empty store, not an error.
    pub fn load(&self) -> Result<UserData> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "No user data file, starting empty");
            return Ok(UserData::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let root: Value = serde_json::from_str(&content)?;

        let mut data = UserData::default();
        let mut skipped = 0usize;

        if let Some(balances) = root.get("balances").and_then(Value::as_object) {
            for (key, value) in balances {
                match (parse_account(key), parse_amount(value)) {
                    (Some(account), Some(amount)) if amount >= Decimal::ZERO => {
                        data.balances.insert(account, amount);
                    }
                    _ => {
                        skipped += 1;
                        tracing::warn!(entry = %key, "Skipping malformed balance entry");
                    }
                }
            }
        }

        if let Some(claims) = root.get("dailyRewards").and_then(Value::as_object) {
            for (key, value) in claims {
                let date = value.as_str().and_then(|s| NaiveDate::from_str(s).ok());
                match (parse_account(key), date) {
                    (Some(account), Some(date)) => {
                        data.claims.insert(account, date);
                    }
                    _ => {
                        skipped += 1;
                        tracing::warn!(entry = %key, "Skipping malformed claim entry");
                    }
                }
            }
        }

        tracing::info!(
            balances = data.balances.len(),
            claims = data.claims.len(),
            skipped,
            "User data loaded"
        );
        Ok(data)
    }

    /// Save user data, replacing the file atomically
    pub fn save(
        &self,
        balances: &HashMap<AccountId, Decimal>,
        claims: &HashMap<AccountId, NaiveDate>,
    ) -> Result<()> {
        let file = UserDataFile {
            balances: balances
                .iter()
                .map(|(account, amount)| (account.to_string(), *amount))
                .collect(),
            daily_rewards: claims
                .iter()
                .map(|(account, date)| (account.to_string(), date.to_string()))
                .collect(),
        };

        write_atomic(&self.path, &serde_json::to_string_pretty(&file)?)?;

        tracing::info!(
            path = %self.path.display(),
            balances = file.balances.len(),
            claims = file.daily_rewards.len(),
            "User data saved"
        );
        Ok(())
    }
}

/// Store for persistent server settings
#[derive(Debug, Clone)]
pub struct ServerDataStore {
    path: PathBuf,
}

impl ServerDataStore {
    /// Store backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load server data, falling back to defaults
    ///
    /// A missing or unreadable file yields the default settings; an
    /// inverted reward range is replaced by the default range.
    pub fn load(&self) -> ServerData {
        if !self.path.exists() {
            tracing::warn!(path = %self.path.display(), "No server data file, using defaults");
            return ServerData::default();
        }

        let mut data = match std::fs::read_to_string(&self.path)
            .map_err(crate::Error::from)
            .and_then(|content| serde_json::from_str::<ServerData>(&content).map_err(Into::into))
        {
            Ok(data) => data,
            Err(error) => {
                tracing::error!(%error, "Failed to load server data, using defaults");
                return ServerData::default();
            }
        };

        if data.currency.trim().is_empty() {
            tracing::warn!("Blank currency in server data, using default");
            data.currency = ServerData::default().currency;
        }
        if data.daily_reward_min > data.daily_reward_max {
            tracing::warn!(
                min = data.daily_reward_min,
                max = data.daily_reward_max,
                "Inverted reward range in server data, using default range"
            );
            let defaults = ServerData::default();
            data.daily_reward_min = defaults.daily_reward_min;
            data.daily_reward_max = defaults.daily_reward_max;
        }

        tracing::info!("Server data loaded");
        data
    }

    /// Save server data, replacing the file atomically
    pub fn save(&self, data: &ServerData) -> Result<()> {
        write_atomic(&self.path, &serde_json::to_string_pretty(data)?)?;
        tracing::info!(path = %self.path.display(), "Server data saved");
        Ok(())
    }
}

fn parse_account(key: &str) -> Option<AccountId> {
    AccountId::from_str(key).ok()
}

/// Parse a stored balance value: scalar number, scalar string, or a
/// legacy per-currency object folded by summation
fn parse_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        Value::Object(map) => {
            let mut total = Decimal::ZERO;
            for sub in map.values() {
                match sub {
                    Value::Number(n) => total += parse_decimal(&n.to_string())?,
                    Value::String(s) => total += parse_decimal(s)?,
                    _ => return None,
                }
            }
            Some(total)
        }
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
