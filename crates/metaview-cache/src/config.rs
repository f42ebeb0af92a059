//! Runtime-adjustable cache age thresholds

use metaview_common::CacheConfig;
use std::sync::atomic::{AtomicU64, Ordering};

/// Age thresholds that can be changed while the cache is in use
#[derive(Debug)]
pub struct MutableCacheConfig {
    max_entry_age_ms: AtomicU64,
    max_info_age_ms: AtomicU64,
}

impl MutableCacheConfig {
    #[must_use]
    pub const fn new(config: CacheConfig) -> Self {
        Self {
            max_entry_age_ms: AtomicU64::new(config.max_entry_age_ms),
            max_info_age_ms: AtomicU64::new(config.max_info_age_ms),
        }
    }

    pub fn max_entry_age_ms(&self) -> u64 {
        self.max_entry_age_ms.load(Ordering::Relaxed)
    }

    pub fn set_max_entry_age_ms(&self, millis: u64) {
        self.max_entry_age_ms.store(millis, Ordering::Relaxed);
    }

    pub fn max_info_age_ms(&self) -> u64 {
        self.max_info_age_ms.load(Ordering::Relaxed)
    }

    pub fn set_max_info_age_ms(&self, millis: u64) {
        self.max_info_age_ms.store(millis, Ordering::Relaxed);
    }

    /// Apply both thresholds at once
    pub fn apply(&self, config: CacheConfig) {
        self.set_max_entry_age_ms(config.max_entry_age_ms);
        self.set_max_info_age_ms(config.max_info_age_ms);
    }

    /// Current thresholds as a plain config value
    pub fn snapshot(&self) -> CacheConfig {
        CacheConfig {
            max_entry_age_ms: self.max_entry_age_ms(),
            max_info_age_ms: self.max_info_age_ms(),
        }
    }
}

impl Default for MutableCacheConfig {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
