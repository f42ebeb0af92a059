//! MetaView Cache - Directory list cache
//!
//! Indexes `ResourceId -> ItemInfo` associations and answers two query
//! shapes: exact lookup of one id, and prefix/delimiter enumeration of a
//! bucket with object-store "common prefix" grouping.
//!
//! Absence is reported as `None` or an empty result, never as an error.

mod config;
mod entry;
mod matcher;
mod memory;
mod stats;
mod time;

pub use config::MutableCacheConfig;
pub use entry::CacheEntry;
pub use matcher::match_list_prefix;
pub use memory::InMemoryDirectoryListCache;
pub use stats::CacheStats;
pub use time::{SystemTimeProvider, TimeProvider};

use metaview_common::{ItemInfo, ResourceId};
use std::collections::BTreeSet;

/// Index of cache entries keyed by resource id
pub trait DirectoryListCache: Send + Sync {
    /// Age thresholds, adjustable while the cache is in use
    fn mutable_config(&self) -> &MutableCacheConfig;

    /// Return the entry for `resource_id`, creating an info-less one if absent
    ///
    /// Get-or-create is atomic: concurrent callers with the same id all
    /// receive the same entry. Inserting an object makes its bucket known.
    /// The root id is never cached: it yields a detached entry.
    fn put_resource_id(&self, resource_id: &ResourceId) -> CacheEntry;

    /// Return the entry for `info`'s id, attaching `info` if the entry has none
    ///
    /// A new entry holds `info` from the moment it becomes visible. Returns
    /// whether `info` was attached; an existing info is kept. The root id is
    /// never cached.
    fn put_item_info_if_absent(&self, info: ItemInfo) -> (CacheEntry, bool);

    /// Exact lookup; `None` if the id has no live entry
    fn get_cache_entry(&self, resource_id: &ResourceId) -> Option<CacheEntry>;

    /// Remove an entry; removing a bucket id drops every object in it
    fn remove_resource_id(&self, resource_id: &ResourceId);

    /// Entries for buckets inserted by bucket id
    fn get_bucket_list(&self) -> Vec<CacheEntry>;

    /// Every known bucket, including ones known only through their objects
    fn bucket_names(&self) -> Vec<String>;

    /// Entries in `bucket` under `prefix`, grouped by `delimiter`
    ///
    /// Names whose remainder after the prefix contains the delimiter are not
    /// returned; their shortened form (through the first delimiter) is added
    /// to `prefixes` instead. Returns `None` if the bucket is unknown.
    fn get_object_list(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        delimiter: Option<&str>,
        prefixes: &mut BTreeSet<String>,
    ) -> Option<Vec<CacheEntry>>;

    fn num_buckets(&self) -> usize;

    fn num_objects(&self) -> usize;
}
