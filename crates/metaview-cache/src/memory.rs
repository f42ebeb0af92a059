//! In-memory directory list cache
//!
//! Buckets live in a sorted map; each bucket node holds its optional bucket
//! entry plus a sorted map of object entries, so prefix listing is a range
//! scan. Expired entries are purged lazily by the read that observes them.

use crate::config::MutableCacheConfig;
use crate::entry::CacheEntry;
use crate::matcher::match_list_prefix;
use crate::stats::CacheStats;
use crate::time::{SystemTimeProvider, TimeProvider};
use crate::DirectoryListCache;
use metaview_common::{CacheConfig, ItemInfo, ResourceId};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;
use std::sync::Arc;
use tracing::trace;

/// Per-bucket index
#[derive(Default)]
struct BucketNode {
    /// Entry for the bucket itself, if one was inserted
    entry: Option<CacheEntry>,
    objects: BTreeMap<String, CacheEntry>,
}

impl BucketNode {
    fn is_empty(&self) -> bool {
        self.entry.is_none() && self.objects.is_empty()
    }
}

/// [`DirectoryListCache`] held entirely in memory
pub struct InMemoryDirectoryListCache {
    buckets: RwLock<BTreeMap<String, BucketNode>>,
    config: MutableCacheConfig,
    time: Arc<dyn TimeProvider>,
    stats: CacheStats,
}

impl InMemoryDirectoryListCache {
    /// Create a cache whose entries never expire
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    #[must_use]
    pub fn with_config(config: CacheConfig) -> Self {
        Self::with_time_provider(config, Arc::new(SystemTimeProvider))
    }

    #[must_use]
    pub fn with_time_provider(config: CacheConfig, time: Arc<dyn TimeProvider>) -> Self {
        Self {
            buckets: RwLock::new(BTreeMap::new()),
            config: MutableCacheConfig::new(config),
            time,
            stats: CacheStats::default(),
        }
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Total number of object and bucket entries
    pub fn len(&self) -> usize {
        let buckets = self.buckets.read();
        buckets
            .values()
            .map(|node| node.objects.len() + usize::from(node.entry.is_some()))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, entry: &CacheEntry, now: u64) -> bool {
        now.saturating_sub(entry.creation_time_ms()) >= self.config.max_entry_age_ms()
    }

    /// Drop the entry's info once it is older than the info age limit
    fn refresh_info(&self, entry: &CacheEntry, now: u64) {
        if let Some(updated) = entry.item_info_update_time_ms()
            && now.saturating_sub(updated) >= self.config.max_info_age_ms()
        {
            trace!("Clearing stale info for '{}'", entry.resource_id());
            entry.clear_item_info();
        }
    }

    /// Remove expired entries, unless they were replaced in the meantime
    fn purge(&self, expired: &[CacheEntry]) {
        self.stats.record_expirations(expired.len());
        let mut buckets = self.buckets.write();
        for entry in expired {
            let id = entry.resource_id();
            let Some(node) = buckets.get_mut(id.bucket_name()) else {
                continue;
            };
            match id.object_name() {
                Some(name) => {
                    if node.objects.get(name).is_some_and(|e| e.ptr_eq(entry)) {
                        node.objects.remove(name);
                    }
                }
                None => {
                    if node.entry.as_ref().is_some_and(|e| e.ptr_eq(entry)) {
                        node.entry = None;
                    }
                }
            }
            trace!("Purged expired entry '{}'", id);
            if node.is_empty() {
                buckets.remove(id.bucket_name());
            }
        }
    }

    fn lookup(buckets: &BTreeMap<String, BucketNode>, id: &ResourceId) -> Option<CacheEntry> {
        if id.is_root() {
            return None;
        }
        let node = buckets.get(id.bucket_name())?;
        match id.object_name() {
            Some(name) => node.objects.get(name).cloned(),
            None => node.entry.clone(),
        }
    }
}

impl Default for InMemoryDirectoryListCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryListCache for InMemoryDirectoryListCache {
    fn mutable_config(&self) -> &MutableCacheConfig {
        &self.config
    }

    fn put_resource_id(&self, resource_id: &ResourceId) -> CacheEntry {
        if resource_id.is_root() {
            trace!("Not caching the root id");
            return CacheEntry::new(ResourceId::root(), Arc::clone(&self.time));
        }
        let now = self.time.now_millis();
        let fresh = || CacheEntry::new(resource_id.clone(), Arc::clone(&self.time));

        let mut buckets = self.buckets.write();
        let node = buckets
            .entry(resource_id.bucket_name().to_owned())
            .or_default();
        let slot = match resource_id.object_name() {
            Some(name) => node.objects.entry(name.to_owned()).or_insert_with(fresh),
            None => node.entry.get_or_insert_with(fresh),
        };
        if self.is_expired(slot, now) {
            trace!("Replacing expired entry '{}'", resource_id);
            *slot = CacheEntry::new(resource_id.clone(), Arc::clone(&self.time));
        }
        slot.clone()
    }

    fn put_item_info_if_absent(&self, info: ItemInfo) -> (CacheEntry, bool) {
        if info.resource_id().is_root() {
            trace!("Not caching the root id");
            return (CacheEntry::with_info(info, Arc::clone(&self.time)), false);
        }
        let now = self.time.now_millis();

        let mut buckets = self.buckets.write();
        let node = buckets.entry(info.bucket_name().to_owned()).or_default();
        let name = info.object_name().map(str::to_owned);
        let existing = match &name {
            Some(name) => node.objects.get(name),
            None => node.entry.as_ref(),
        };
        if let Some(entry) = existing.filter(|e| !self.is_expired(e, now)) {
            // Attached while the map is locked so no reader sees it bare
            let set = matches!(entry.set_item_info_if_absent(info), Ok(true));
            return (entry.clone(), set);
        }

        let entry = CacheEntry::with_info(info, Arc::clone(&self.time));
        match name {
            Some(name) => {
                node.objects.insert(name, entry.clone());
            }
            None => node.entry = Some(entry.clone()),
        }
        (entry, true)
    }

    fn get_cache_entry(&self, resource_id: &ResourceId) -> Option<CacheEntry> {
        let now = self.time.now_millis();
        let found = Self::lookup(&self.buckets.read(), resource_id);
        let Some(entry) = found else {
            self.stats.record_miss();
            return None;
        };
        if self.is_expired(&entry, now) {
            self.purge(std::slice::from_ref(&entry));
            self.stats.record_miss();
            return None;
        }
        self.refresh_info(&entry, now);
        self.stats.record_hit();
        Some(entry)
    }

    fn remove_resource_id(&self, resource_id: &ResourceId) {
        let mut buckets = self.buckets.write();
        let bucket = resource_id.bucket_name();
        match resource_id.object_name() {
            None => {
                buckets.remove(bucket);
            }
            Some(name) => {
                if let Some(node) = buckets.get_mut(bucket) {
                    node.objects.remove(name);
                    if node.is_empty() {
                        buckets.remove(bucket);
                    }
                }
            }
        }
    }

    fn get_bucket_list(&self) -> Vec<CacheEntry> {
        let now = self.time.now_millis();
        let mut expired = Vec::new();
        let mut result = Vec::new();
        {
            let buckets = self.buckets.read();
            for entry in buckets.values().filter_map(|node| node.entry.as_ref()) {
                if self.is_expired(entry, now) {
                    expired.push(entry.clone());
                } else {
                    self.refresh_info(entry, now);
                    result.push(entry.clone());
                }
            }
        }
        if !expired.is_empty() {
            self.purge(&expired);
        }
        result
    }

    fn bucket_names(&self) -> Vec<String> {
        self.buckets.read().keys().cloned().collect()
    }

    fn get_object_list(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        delimiter: Option<&str>,
        prefixes: &mut BTreeSet<String>,
    ) -> Option<Vec<CacheEntry>> {
        let now = self.time.now_millis();
        let start = prefix.unwrap_or_default();
        let mut expired = Vec::new();
        let mut result = Vec::new();
        {
            let buckets = self.buckets.read();
            let node = buckets.get(bucket)?;
            let candidates = node
                .objects
                .range::<str, _>((Bound::Included(start), Bound::Unbounded))
                .take_while(|(name, _)| name.starts_with(start));
            for (name, entry) in candidates {
                if self.is_expired(entry, now) {
                    expired.push(entry.clone());
                    continue;
                }
                let Some(matched) = match_list_prefix(prefix, delimiter, name) else {
                    continue;
                };
                if matched == name.as_str() {
                    self.refresh_info(entry, now);
                    result.push(entry.clone());
                } else if !prefixes.contains(matched) {
                    prefixes.insert(matched.to_owned());
                }
            }
        }
        if !expired.is_empty() {
            self.purge(&expired);
        }
        trace!(
            "get_object_list({}, {:?}, {:?}): {} entries, {} prefixes",
            bucket,
            prefix,
            delimiter,
            result.len(),
            prefixes.len()
        );
        Some(result)
    }

    fn num_buckets(&self) -> usize {
        self.buckets.read().len()
    }

    fn num_objects(&self) -> usize {
        self.buckets.read().values().map(|node| node.objects.len()).sum()
    }
}
