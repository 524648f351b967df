//! Runtime-mutable server settings
//!
//! The configuration owner for the economy: currency name, locale tag
//! and the daily reward range. Setters validate before anything is
//! stored, so downstream components can trust what they read; an
//! invalid update leaves the prior configuration in place.

use crate::error::{Error, Result};
use parking_lot::RwLock;
use persistence::ServerData;
use reward_engine::RewardRange;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared, validated server settings
#[derive(Debug)]
pub struct ServerSettings {
    data: RwLock<ServerData>,

    /// Set by every committed update, cleared by the checkpointer
    dirty: AtomicBool,
}

impl ServerSettings {
    /// Wrap loaded (already validated) server data
    pub fn new(data: ServerData) -> Self {
        Self {
            data: RwLock::new(data),
            dirty: AtomicBool::new(false),
        }
    }

    /// Active currency name
    pub fn currency(&self) -> String {
        self.data.read().currency.clone()
    }

    /// Locale tag for display text
    pub fn locale(&self) -> String {
        self.data.read().locale.clone()
    }

    /// Validated daily reward bounds
    pub fn reward_range(&self) -> RewardRange {
        let data = self.data.read();
        // Stored bounds are validated on every write path
        RewardRange::new(data.daily_reward_min, data.daily_reward_max).unwrap_or_default()
    }

    /// Rename the currency, returning whether the name changed
    ///
    /// Blank names are rejected before any mutation.
    pub fn set_currency(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidCurrency(name.to_string()));
        }

        let mut data = self.data.write();
        if data.currency == name {
            return Ok(false);
        }
        data.currency = name.to_string();
        drop(data);
        self.mark_dirty();
        Ok(true)
    }

    /// Replace the locale tag
    pub fn set_locale(&self, tag: &str) -> Result<()> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(Error::InvalidLocale(tag.to_string()));
        }

        self.data.write().locale = tag.to_string();
        self.mark_dirty();
        Ok(())
    }

    /// Replace the daily reward bounds
    ///
    /// `min > max` is rejected and the prior range is retained.
    pub fn set_daily_reward(&self, min: u32, max: u32) -> Result<()> {
        RewardRange::new(min, max)?;

        let mut data = self.data.write();
        data.daily_reward_min = min;
        data.daily_reward_max = max;
        drop(data);
        self.mark_dirty();
        Ok(())
    }

    /// Copy of the current settings, for persistence
    pub fn snapshot(&self) -> ServerData {
        self.data.read().clone()
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
