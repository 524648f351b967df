//! One-time import of the legacy file format
//!
//! The previous release stored user data and settings in two flat JSON
//! files. A balance entry there is either a plain number or a
//! per-currency object; the daily reward range is a single `"min-max"`
//! string. Everything is resolved into the current schema once, at
//! import time, and never carried forward as ambiguous data.
//!
//! Import is best-effort and idempotent per account: a partial failure
//! keeps the legacy files on disk for manual retry and keeps whatever
//! did migrate (no rollback). Only a fully successful import deletes
//! the legacy files.

use crate::error::{Error, Result};
use crate::gateway::UserData;
use chrono::NaiveDate;
use ledger_core::AccountId;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A balance as stored by the legacy format
///
/// Either a single scalar or a per-currency map. Resolved exactly once,
/// by summation, when imported.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LegacyBalance {
    /// Single-currency amount
    Scalar(Decimal),

    /// Multi-currency amounts from the old format
    PerCurrency(HashMap<String, Decimal>),
}

impl LegacyBalance {
    /// Collapse into one scalar amount; funds are never lost, only the
    /// per-currency identity of old sub-balances is discarded
    pub fn resolve(self) -> Decimal {
        match self {
            LegacyBalance::Scalar(amount) => amount,
            LegacyBalance::PerCurrency(map) => map.into_values().sum(),
        }
    }
}

/// Settings recovered from the legacy server-data file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyConfig {
    /// Currency name, if present and non-blank
    pub currency: Option<String>,

    /// Locale tag, if present and non-blank
    pub locale: Option<String>,

    /// Daily reward bounds parsed from the `"min-max"` string
    pub daily_reward: Option<(u32, u32)>,
}

/// Result of a legacy import run
#[derive(Debug, Clone, Default)]
pub struct LegacyImport {
    /// Imported balances and claims, when the user-data file parsed
    pub user_data: Option<UserData>,

    /// Imported settings, when the server-data file parsed
    pub config: Option<LegacyConfig>,

    /// True when every detected file imported cleanly (files deleted)
    pub complete: bool,
}

/// Reads and retires the legacy JSON files
#[derive(Debug, Clone)]
pub struct LegacyImporter {
    user_path: PathBuf,
    server_path: PathBuf,
}

impl LegacyImporter {
    /// Importer over the two legacy file paths
    pub fn new(user_path: impl Into<PathBuf>, server_path: impl Into<PathBuf>) -> Self {
        Self {
            user_path: user_path.into(),
            server_path: server_path.into(),
        }
    }

    /// Whether any legacy file is present
    pub fn detect(&self) -> bool {
        self.user_path.is_file() || self.server_path.is_file()
    }

    /// Run the import
    ///
    /// Returns `None` when no legacy file exists. Otherwise imports
    /// whatever parses, deletes the legacy files only when everything
    /// succeeded, and flags the run `complete` accordingly.
    pub fn run(&self) -> Option<LegacyImport> {
        let user_exists = self.user_path.is_file();
        let server_exists = self.server_path.is_file();
        if !user_exists && !server_exists {
            return None;
        }

        tracing::info!("Legacy files detected, starting migration");
        let mut import = LegacyImport {
            complete: true,
            ..Default::default()
        };

        if server_exists {
            match self.import_server_data() {
                Ok(config) => {
                    tracing::info!("Migrated legacy server configuration");
                    import.config = Some(config);
                }
                Err(error) => {
                    tracing::error!(%error, "Failed to migrate legacy server configuration");
                    import.complete = false;
                }
            }
        }

        if user_exists {
            match self.import_user_data() {
                Ok(data) => {
                    tracing::info!(
                        balances = data.balances.len(),
                        claims = data.claims.len(),
                        "Migrated legacy user data"
                    );
                    import.user_data = Some(data);
                }
                Err(error) => {
                    tracing::error!(%error, "Failed to migrate legacy user data");
                    import.complete = false;
                }
            }
        }

        if import.complete {
            self.remove_legacy_files();
            tracing::info!("Legacy migration completed");
        } else {
            tracing::warn!("Legacy migration incomplete, files kept for manual retry");
        }

        Some(import)
    }

    /// Parse the legacy user-data file
    ///
    /// Entries with an invalid id, amount or date are skipped; a file
    /// that does not parse at all is a [`Error::Migration`].
    pub fn import_user_data(&self) -> Result<UserData> {
        let content = std::fs::read_to_string(&self.user_path)
            .map_err(|e| Error::Migration(format!("cannot read legacy user data: {e}")))?;
        let root: Value = serde_json::from_str(&content)
            .map_err(|e| Error::Migration(format!("legacy user data is not JSON: {e}")))?;

        let mut data = UserData::default();

        if let Some(balances) = root.get("balances").and_then(Value::as_object) {
            for (key, value) in balances {
                let Ok(account) = AccountId::from_str(key) else {
                    tracing::warn!(entry = %key, "Skipping invalid id in legacy balances");
                    continue;
                };
                match serde_json::from_value::<LegacyBalance>(value.clone()) {
                    Ok(balance) => {
                        let total = balance.resolve();
                        if total > Decimal::ZERO {
                            data.balances.insert(account, total);
                        }
                    }
                    Err(_) => {
                        tracing::warn!(entry = %key, "Skipping invalid legacy balance value");
                    }
                }
            }
        }

        if let Some(claims) = root.get("dailyRewards").and_then(Value::as_object) {
            for (key, value) in claims {
                let account = AccountId::from_str(key).ok();
                let date = value.as_str().and_then(|s| NaiveDate::from_str(s).ok());
                match (account, date) {
                    (Some(account), Some(date)) => {
                        data.claims.insert(account, date);
                    }
                    _ => {
                        tracing::warn!(entry = %key, "Skipping invalid legacy claim entry");
                    }
                }
            }
        }

        Ok(data)
    }

    /// Parse the legacy server-data file
    pub fn import_server_data(&self) -> Result<LegacyConfig> {
        let content = std::fs::read_to_string(&self.server_path)
            .map_err(|e| Error::Migration(format!("cannot read legacy server data: {e}")))?;
        let root: Value = serde_json::from_str(&content)
            .map_err(|e| Error::Migration(format!("legacy server data is not JSON: {e}")))?;

        let mut config = LegacyConfig::default();

        if let Some(currency) = root.get("currency").and_then(Value::as_str) {
            if !currency.trim().is_empty() {
                config.currency = Some(currency.to_string());
            }
        }

        if let Some(locale) = root.get("locale").and_then(Value::as_str) {
            if !locale.trim().is_empty() {
                config.locale = Some(locale.to_string());
            }
        }

        if let Some(reward) = root.get("dailyReward").and_then(Value::as_str) {
            match parse_reward_range(reward) {
                Some((min, max)) => config.daily_reward = Some((min, max)),
                None => {
                    tracing::warn!(value = %reward, "Ignoring invalid legacy reward range");
                }
            }
        }

        Ok(config)
    }

    fn remove_legacy_files(&self) {
        for path in [&self.user_path, &self.server_path] {
            if path.is_file() {
                match std::fs::remove_file(path) {
                    Ok(()) => {
                        tracing::info!(path = %path.display(), "Deleted legacy file")
                    }
                    Err(error) => {
                        tracing::warn!(path = %path.display(), %error, "Failed to delete legacy file")
                    }
                }
            }
        }
    }
}

/// Parse a `"min-max"` reward string, requiring `min <= max`
fn parse_reward_range(s: &str) -> Option<(u32, u32)> {
    let (min, max) = s.split_once('-')?;
    let min: u32 = min.trim().parse().ok()?;
    let max: u32 = max.trim().parse().ok()?;
    if min > max {
        return None;
    }
    Some((min, max))
}

/// Convenience for tests and callers holding plain paths
pub fn legacy_paths(dir: &Path) -> (PathBuf, PathBuf) {
    (
        dir.join("economy_userdata.json"),
        dir.join("economy_serverdata.json"),
    )
}
