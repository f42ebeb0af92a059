//! Configuration types for MetaView
//!
//! This module defines configuration structures used across components.

use serde::{Deserialize, Serialize};

/// Root configuration for a metadata view
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Directory list cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Age thresholds for directory list cache entries
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entries older than this (milliseconds) are treated as absent
    #[serde(default = "never")]
    pub max_entry_age_ms: u64,
    /// Item info older than this (milliseconds) is dropped from its entry
    #[serde(default = "never")]
    pub max_info_age_ms: u64,
}

const fn never() -> u64 {
    u64::MAX
}

impl CacheConfig {
    /// Entries and their info never expire
    pub const NEVER_EXPIRE: Self = Self {
        max_entry_age_ms: u64::MAX,
        max_info_age_ms: u64::MAX,
    };

    /// True if either threshold is finite
    #[must_use]
    pub const fn expires(&self) -> bool {
        self.max_entry_age_ms != u64::MAX || self.max_info_age_ms != u64::MAX
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::NEVER_EXPIRE
    }
}
