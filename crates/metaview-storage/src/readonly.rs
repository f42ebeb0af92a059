//! Read-only storage view over a directory list cache
//!
//! [`MetadataReadOnlyStorage`] serves listings and point lookups from a
//! fixed set of item infos loaded at construction. Prefixes that group
//! objects but have no record of their own are reported as implicit
//! directories, and those markers are written back so later lookups see
//! them without another listing.

use crate::capability::Capabilities;
use crate::request::{StorageRequest, StorageResponse};
use crate::snapshot;
use crate::storage::ObjectStorage;
use metaview_cache::{CacheEntry, DirectoryListCache, InMemoryDirectoryListCache};
use metaview_common::{CacheConfig, Error, ItemInfo, ResourceId, Result, ViewConfig};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error};

/// Storage view that answers metadata reads and rejects everything else
pub struct MetadataReadOnlyStorage<C = InMemoryDirectoryListCache> {
    cache: C,
    synthesized: AtomicU64,
}

impl MetadataReadOnlyStorage {
    /// Build a view over a fresh in-memory cache holding `item_infos`
    pub fn new(item_infos: impl IntoIterator<Item = ItemInfo>) -> Result<Self> {
        Self::with_cache(InMemoryDirectoryListCache::new(), item_infos)
    }

    /// Build a view whose cache uses the configured entry age
    ///
    /// Expired entries read as not found. Item info is the only record the
    /// view has of an entry, so a finite `max_info_age_ms` is rejected.
    pub fn with_config(
        config: &ViewConfig,
        item_infos: impl IntoIterator<Item = ItemInfo>,
    ) -> Result<Self> {
        if config.cache.max_info_age_ms != u64::MAX {
            return Err(Error::Configuration(format!(
                "max_info_age_ms must be unset for a read-only view, got {}",
                config.cache.max_info_age_ms
            )));
        }
        Self::populate(InMemoryDirectoryListCache::with_config(config.cache), item_infos)
    }

    /// Build a view from a JSON metadata snapshot
    pub fn from_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(snapshot::load_item_infos(path)?)
    }
}

impl<C: DirectoryListCache> MetadataReadOnlyStorage<C> {
    /// Build a view over `cache`, which is switched to never expire
    pub fn with_cache(cache: C, item_infos: impl IntoIterator<Item = ItemInfo>) -> Result<Self> {
        cache.mutable_config().apply(CacheConfig::NEVER_EXPIRE);
        Self::populate(cache, item_infos)
    }

    fn populate(cache: C, item_infos: impl IntoIterator<Item = ItemInfo>) -> Result<Self> {
        let mut count = 0usize;
        for info in item_infos {
            if info.resource_id().is_root() {
                return Err(Error::invalid_argument(
                    "item info without a bucket name cannot be cached",
                ));
            }
            cache.put_resource_id(info.resource_id()).set_item_info(info)?;
            count += 1;
        }
        debug!("Populated cache with {} entries", count);

        Ok(Self {
            cache,
            synthesized: AtomicU64::new(0),
        })
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Number of implicit directory markers this view has written back
    pub fn implicit_directories_synthesized(&self) -> u64 {
        self.synthesized.load(Ordering::Relaxed)
    }

    pub fn list_object_names(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        delimiter: Option<&str>,
    ) -> Result<Vec<String>> {
        debug!("list_object_names({}, {:?}, {:?})", bucket, prefix, delimiter);
        let infos = self.list_object_info(bucket, prefix, delimiter)?;
        Ok(infos
            .iter()
            .map(|info| info.object_name().unwrap_or_default().to_owned())
            .collect())
    }

    /// List objects in `bucket` under `prefix`, grouped by `delimiter`
    ///
    /// Stored entries come first, followed by implicit directories for any
    /// common prefix without a record of its own, each group in name order.
    /// Unknown buckets list as empty.
    pub fn list_object_info(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        delimiter: Option<&str>,
    ) -> Result<Vec<ItemInfo>> {
        debug!("list_object_info({}, {:?}, {:?})", bucket, prefix, delimiter);

        let mut prefixes = BTreeSet::new();
        let Some(entries) = self
            .cache
            .get_object_list(bucket, prefix, delimiter, &mut prefixes)
        else {
            return Ok(Vec::new());
        };

        let mut infos = Vec::with_capacity(entries.len() + prefixes.len());
        let mut retrieved = HashSet::with_capacity(entries.len());
        for entry in &entries {
            infos.push(require_info(entry)?);
            if let Some(name) = entry.resource_id().object_name() {
                retrieved.insert(name.to_owned());
            }
        }

        for name in prefixes {
            if retrieved.contains(&name) {
                continue;
            }
            debug!("Synthesizing implicit directory '{}' in bucket '{}'", name, bucket);
            let marker = ItemInfo::implicit_directory(ResourceId::object(bucket, name));
            let (entry, inserted) = self.cache.put_item_info_if_absent(marker);
            if inserted {
                self.synthesized.fetch_add(1, Ordering::Relaxed);
            }
            infos.push(require_info(&entry)?);
        }

        // Markers written back by earlier listings come out of the cache as
        // plain entries
        infos.sort_by(|a, b| {
            a.is_implicit_directory()
                .cmp(&b.is_implicit_directory())
                .then_with(|| a.object_name().cmp(&b.object_name()))
        });
        Ok(infos)
    }

    /// Exact lookup; unknown ids yield the not-found sentinel
    pub fn get_item_info(&self, resource_id: &ResourceId) -> Result<ItemInfo> {
        debug!("get_item_info({})", resource_id);
        match self.cache.get_cache_entry(resource_id) {
            Some(entry) => require_info(&entry),
            None => Ok(ItemInfo::not_found(resource_id.clone())),
        }
    }

    pub fn get_item_infos(&self, resource_ids: &[ResourceId]) -> Result<Vec<ItemInfo>> {
        debug!("get_item_infos({} ids)", resource_ids.len());
        resource_ids
            .iter()
            .map(|resource_id| self.get_item_info(resource_id))
            .collect()
    }

    pub fn close(&self) -> Result<()> {
        debug!("close()");
        Ok(())
    }
}

fn require_info(entry: &CacheEntry) -> Result<ItemInfo> {
    entry.item_info().ok_or_else(|| {
        error!("Cache entry missing info for name '{}'", entry.resource_id());
        Error::MissingItemInfo(entry.resource_id().clone())
    })
}

impl<C: DirectoryListCache> ObjectStorage for MetadataReadOnlyStorage<C> {
    fn capabilities(&self) -> Capabilities {
        Capabilities::METADATA_READS
    }

    fn handle(&self, request: StorageRequest) -> Result<StorageResponse> {
        match request {
            StorageRequest::ListObjectNames(query) => self
                .list_object_names(
                    &query.bucket,
                    query.prefix.as_deref(),
                    query.delimiter.as_deref(),
                )
                .map(StorageResponse::Names),
            StorageRequest::ListObjectInfo(query) => self
                .list_object_info(
                    &query.bucket,
                    query.prefix.as_deref(),
                    query.delimiter.as_deref(),
                )
                .map(StorageResponse::Items),
            StorageRequest::GetItemInfo { resource_id } => {
                self.get_item_info(&resource_id).map(StorageResponse::Item)
            }
            StorageRequest::GetItemInfos { resource_ids } => {
                self.get_item_infos(&resource_ids).map(StorageResponse::Items)
            }
            StorageRequest::Close => self.close().map(|()| StorageResponse::Done),
            other => Err(Error::unsupported(other.kind().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{ListQuery, OperationKind};
    use metaview_common::{CreateObjectOptions, ItemKind, UpdatableItemInfo};
    use metaview_cache::MutableCacheConfig;
    use std::collections::BTreeMap;
    use std::io::Write;
    use std::sync::Barrier;
    use std::sync::atomic::AtomicBool;
    use std::thread;

    fn stored(bucket: &str, object: &str, size: u64) -> ItemInfo {
        ItemInfo::new(
            ResourceId::object(bucket, object),
            1_700_000_000_000,
            size,
            Some("US".into()),
            Some("STANDARD".into()),
        )
    }

    fn names(infos: &[ItemInfo]) -> BTreeSet<String> {
        infos
            .iter()
            .filter_map(|info| info.object_name().map(str::to_owned))
            .collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn sample_view() -> MetadataReadOnlyStorage {
        MetadataReadOnlyStorage::new([
            ItemInfo::new(ResourceId::bucket("B"), 1, 0, Some("US".into()), None),
            stored("B", "a/b/c", 10),
            stored("B", "a/b/d", 20),
            stored("B", "a/x", 30),
        ])
        .unwrap()
    }

    fn assert_unsupported<T>(result: Result<T>) {
        match result {
            Err(err) => assert!(err.is_unsupported(), "unexpected error: {err}"),
            Ok(_) => panic!("operation should have been rejected"),
        }
    }

    #[test]
    fn test_delimiter_grouping() {
        let view = sample_view();
        let infos = view.list_object_info("B", Some("a/"), Some("/")).unwrap();

        assert_eq!(names(&infos), set(&["a/x", "a/b/"]));
        assert_eq!(infos.len(), 2);
        // Stored entries precede synthesized ones
        assert_eq!(infos[0].object_name(), Some("a/x"));
        assert_eq!(infos[0].kind(), ItemKind::Stored);
        assert!(infos[1].is_implicit_directory());
        assert_eq!(infos[1].size(), 0);
        assert_eq!(infos[1].creation_time(), 0);
        assert_eq!(infos[1].location(), None);
    }

    #[test]
    fn test_synthesis_is_idempotent() {
        let view = sample_view();
        let first = view.list_object_info("B", Some("a/"), Some("/")).unwrap();
        let objects = view.cache().num_objects();
        assert_eq!(view.implicit_directories_synthesized(), 1);

        let second = view.list_object_info("B", Some("a/"), Some("/")).unwrap();
        assert_eq!(names(&first), names(&second));
        assert_eq!(view.cache().num_objects(), objects);
        assert_eq!(view.implicit_directories_synthesized(), 1);
    }

    #[test]
    fn test_written_back_marker_is_visible_to_lookup() {
        let view = sample_view();
        let dir = ResourceId::object("B", "a/b/");

        let before = view.get_item_info(&dir).unwrap();
        assert_eq!(before.kind(), ItemKind::NotFound);
        assert!(!before.exists());

        view.list_object_info("B", Some("a/"), Some("/")).unwrap();

        let after = view.get_item_info(&dir).unwrap();
        assert!(after.exists());
        assert!(after.is_implicit_directory());
        assert!(after.is_directory());
        assert_eq!(after.size(), 0);
        assert_eq!(after.resource_id(), &dir);
    }

    #[test]
    fn test_not_found_sentinel() {
        let view = sample_view();
        for id in [
            ResourceId::object("B", "nope"),
            ResourceId::object("other", "a/x"),
            ResourceId::bucket("other"),
        ] {
            let info = view.get_item_info(&id).unwrap();
            assert_eq!(info.kind(), ItemKind::NotFound);
            assert!(!info.exists());
            assert_eq!(info.resource_id(), &id);
        }
    }

    #[test]
    fn test_bulk_load_completeness() {
        let infos = vec![
            ItemInfo::new(
                ResourceId::bucket("B"),
                3,
                0,
                Some("EU".into()),
                Some("NEARLINE".into()),
            ),
            stored("B", "a/b/c", 10),
            stored("B", "dir/", 0),
            stored("C", "x", 99),
        ];
        let view = MetadataReadOnlyStorage::new(infos.clone()).unwrap();

        for info in &infos {
            assert_eq!(&view.get_item_info(info.resource_id()).unwrap(), info);
        }
        let ids: Vec<_> = infos.iter().map(|info| info.resource_id().clone()).collect();
        assert_eq!(view.get_item_infos(&ids).unwrap(), infos);
        assert_eq!(view.implicit_directories_synthesized(), 0);
    }

    #[test]
    fn test_get_item_infos_preserves_order() {
        let view = sample_view();
        let ids = vec![
            ResourceId::object("B", "a/x"),
            ResourceId::object("B", "missing"),
            ResourceId::object("B", "a/b/c"),
        ];
        let infos = view.get_item_infos(&ids).unwrap();

        assert_eq!(infos.len(), 3);
        assert_eq!(infos[0].size(), 30);
        assert_eq!(infos[1].kind(), ItemKind::NotFound);
        assert_eq!(infos[2].size(), 10);
        assert!(view.get_item_infos(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_real_directory_object_is_not_synthesized() {
        let view = MetadataReadOnlyStorage::new([
            stored("B", "a/b/", 0),
            stored("B", "a/b/c", 10),
            stored("B", "a/x", 30),
        ])
        .unwrap();

        let infos = view.list_object_info("B", Some("a/"), Some("/")).unwrap();
        assert_eq!(names(&infos), set(&["a/x", "a/b/"]));
        assert_eq!(infos.len(), 2);
        assert!(infos.iter().all(|info| info.kind() == ItemKind::Stored));
        assert_eq!(view.implicit_directories_synthesized(), 0);
    }

    #[test]
    fn test_top_level_and_flat_listing() {
        let view = sample_view();

        let top = view.list_object_info("B", None, Some("/")).unwrap();
        assert_eq!(names(&top), set(&["a/"]));

        let flat = view.list_object_info("B", Some("a/"), None).unwrap();
        assert_eq!(names(&flat), set(&["a/b/c", "a/b/d", "a/x"]));
        assert!(flat.iter().all(|info| !info.is_implicit_directory()));
    }

    #[test]
    fn test_list_object_names() {
        let view = sample_view();
        let infos = view.list_object_info("B", Some("a/"), Some("/")).unwrap();
        let listed = view.list_object_names("B", Some("a/"), Some("/")).unwrap();

        let expected: Vec<_> = infos
            .iter()
            .map(|info| info.object_name().unwrap().to_owned())
            .collect();
        assert_eq!(listed, expected);
    }

    #[test]
    fn test_listing_order_is_stable() {
        let view = MetadataReadOnlyStorage::new([
            stored("B", "a/b/c", 10),
            stored("B", "a/c/", 0),
            stored("B", "a/c/d", 1),
            stored("B", "a/x", 30),
            stored("B", "a/y/z", 40),
        ])
        .unwrap();

        let ordered = |infos: &[ItemInfo]| -> Vec<String> {
            infos
                .iter()
                .map(|info| info.object_name().unwrap().to_owned())
                .collect()
        };
        let first = view.list_object_info("B", Some("a/"), Some("/")).unwrap();
        let second = view.list_object_info("B", Some("a/"), Some("/")).unwrap();
        let third = view.list_object_info("B", Some("a/"), Some("/")).unwrap();

        let expected = ["a/c/", "a/x", "a/b/", "a/y/"];
        assert_eq!(ordered(&first), expected);
        assert_eq!(ordered(&second), expected);
        assert_eq!(second, third);
        assert_eq!(first, second);
        assert_eq!(view.implicit_directories_synthesized(), 2);
    }

    #[test]
    fn test_unknown_bucket_lists_empty() {
        let view = sample_view();
        assert!(view.list_object_info("nope", None, None).unwrap().is_empty());
        assert!(view.list_object_names("nope", Some("a/"), Some("/")).unwrap().is_empty());
        assert_eq!(view.implicit_directories_synthesized(), 0);
    }

    #[test]
    fn test_root_info_rejected() {
        let root = ItemInfo::new(ResourceId::root(), 0, 0, None, None);
        let result = MetadataReadOnlyStorage::new([root]);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_construction_forces_never_expire() {
        let cache = InMemoryDirectoryListCache::with_config(CacheConfig {
            max_entry_age_ms: 1,
            max_info_age_ms: 1,
        });
        let view = MetadataReadOnlyStorage::with_cache(cache, [stored("B", "o", 1)]).unwrap();
        assert_eq!(view.cache().mutable_config().snapshot(), CacheConfig::NEVER_EXPIRE);
    }

    #[test]
    fn test_with_config() {
        let infos = [stored("B", "o", 1)];
        let view = MetadataReadOnlyStorage::with_config(&ViewConfig::default(), infos).unwrap();
        assert!(!view.cache().mutable_config().snapshot().expires());
        assert_eq!(view.get_item_info(&ResourceId::object("B", "o")).unwrap().size(), 1);

        let config = ViewConfig {
            cache: CacheConfig {
                max_entry_age_ms: 60_000,
                max_info_age_ms: u64::MAX,
            },
        };
        let view = MetadataReadOnlyStorage::with_config(&config, [stored("B", "o", 1)]).unwrap();
        assert_eq!(view.cache().mutable_config().max_entry_age_ms(), 60_000);
    }

    #[test]
    fn test_with_config_rejects_info_age() {
        let config = ViewConfig {
            cache: CacheConfig {
                max_entry_age_ms: u64::MAX,
                max_info_age_ms: 1,
            },
        };
        let result = MetadataReadOnlyStorage::with_config(&config, [stored("B", "a/x", 1)]);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_missing_info_is_an_error() {
        let view = sample_view();
        // An entry created behind the view's back carries no info
        view.cache().put_resource_id(&ResourceId::object("B", "a/bare"));

        let err = view
            .get_item_info(&ResourceId::object("B", "a/bare"))
            .unwrap_err();
        assert!(matches!(&err, Error::MissingItemInfo(id) if id.object_name() == Some("a/bare")));
        assert!(err.is_fatal());

        let err = view.list_object_info("B", Some("a/"), Some("/")).unwrap_err();
        assert!(matches!(err, Error::MissingItemInfo(_)));
    }

    #[test]
    fn test_capabilities() {
        let view = sample_view();
        let caps = view.capabilities();
        for kind in OperationKind::ALL {
            let expected = matches!(
                kind,
                OperationKind::ListObjectNames
                    | OperationKind::ListObjectInfo
                    | OperationKind::GetItemInfo
                    | OperationKind::GetItemInfos
                    | OperationKind::Close
            );
            assert_eq!(caps.allows(kind), expected, "{kind}");
        }
    }

    #[test]
    fn test_unsupported_operations() {
        let view = sample_view();
        let id = ResourceId::object("B", "a/x");
        let options = CreateObjectOptions::default();
        let objects = view.cache().num_objects();

        assert_unsupported(view.create(&id, &options));
        assert_unsupported(view.create_bucket("B"));
        assert_unsupported(view.create_bucket(""));
        assert_unsupported(view.create_empty_object(&id, &options));
        assert_unsupported(view.create_empty_objects(&[], &options));
        assert_unsupported(view.create_empty_objects(&[id.clone()], &options));
        assert_unsupported(view.open(&id));
        assert_unsupported(view.delete_buckets(&[]));
        assert_unsupported(view.delete_buckets(&["B".to_owned()]));
        assert_unsupported(view.delete_objects(&[]));
        assert_unsupported(view.delete_objects(&[id.clone()]));
        assert_unsupported(view.copy("B", &[], "C", &[]));
        assert_unsupported(view.copy("B", &["a/x".to_owned()], "C", &["y".to_owned()]));
        assert_unsupported(view.list_bucket_names());
        assert_unsupported(view.list_bucket_info());
        assert_unsupported(view.update_items(&[]));
        assert_unsupported(view.update_items(&[UpdatableItemInfo {
            resource_id: id.clone(),
            metadata: BTreeMap::from([("k".to_owned(), Some(b"v".to_vec()))]),
        }]));
        assert_unsupported(view.wait_for_bucket_empty("B"));

        assert_eq!(view.cache().num_objects(), objects);
        assert_eq!(view.get_item_info(&id).unwrap().size(), 30);
    }

    #[test]
    fn test_handle_rejects_outside_capabilities() {
        let view = sample_view();
        let err = view.handle(StorageRequest::ListBucketNames).unwrap_err();
        assert!(err.is_unsupported());
        assert!(err.to_string().ends_with("list_bucket_names"));
    }

    #[test]
    fn test_supported_operations_through_execute() {
        let view = sample_view();

        let response = view
            .execute(StorageRequest::ListObjectNames(ListQuery::new(
                "B",
                Some("a/"),
                Some("/"),
            )))
            .unwrap();
        match response {
            StorageResponse::Names(listed) => {
                assert_eq!(listed, vec!["a/x".to_owned(), "a/b/".to_owned()]);
            }
            other => panic!("unexpected response {other:?}"),
        }

        let info = ObjectStorage::get_item_info(&view, &ResourceId::object("B", "a/b/")).unwrap();
        assert!(info.is_implicit_directory());
        assert_eq!(ObjectStorage::get_item_infos(&view, &[]).unwrap(), vec![]);
        ObjectStorage::close(&view).unwrap();
    }

    #[test]
    fn test_concurrent_synthesis_converges() {
        let view = sample_view();
        let objects = view.cache().num_objects();

        let dir = ResourceId::object("B", "a/b/");

        let (listings, lookups) = thread::scope(|scope| {
            let listers: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| view.list_object_info("B", Some("a/"), Some("/"))))
                .collect();
            let readers: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| view.get_item_info(&dir)))
                .collect();
            let listings: Vec<_> = listers.into_iter().map(|h| h.join().unwrap()).collect();
            let lookups: Vec<_> = readers.into_iter().map(|h| h.join().unwrap()).collect();
            (listings, lookups)
        });

        for infos in listings {
            assert_eq!(names(&infos.unwrap()), set(&["a/x", "a/b/"]));
        }
        for info in lookups {
            let info = info.unwrap();
            assert!(info.kind() == ItemKind::NotFound || info.is_implicit_directory());
        }
        assert_eq!(view.cache().num_objects(), objects + 1);
        assert_eq!(view.implicit_directories_synthesized(), 1);
    }

    /// Cache that stalls the first write after it lands, until a reader is done
    struct StallingCache {
        inner: InMemoryDirectoryListCache,
        armed: AtomicBool,
        landed: Barrier,
        resumed: Barrier,
    }

    impl StallingCache {
        fn new() -> Self {
            Self {
                inner: InMemoryDirectoryListCache::new(),
                armed: AtomicBool::new(false),
                landed: Barrier::new(2),
                resumed: Barrier::new(2),
            }
        }

        fn stall(&self) {
            if self.armed.swap(false, Ordering::SeqCst) {
                self.landed.wait();
                self.resumed.wait();
            }
        }
    }

    impl DirectoryListCache for StallingCache {
        fn mutable_config(&self) -> &MutableCacheConfig {
            self.inner.mutable_config()
        }

        fn put_resource_id(&self, resource_id: &ResourceId) -> CacheEntry {
            let entry = self.inner.put_resource_id(resource_id);
            self.stall();
            entry
        }

        fn put_item_info_if_absent(&self, info: ItemInfo) -> (CacheEntry, bool) {
            let result = self.inner.put_item_info_if_absent(info);
            self.stall();
            result
        }

        fn get_cache_entry(&self, resource_id: &ResourceId) -> Option<CacheEntry> {
            self.inner.get_cache_entry(resource_id)
        }

        fn remove_resource_id(&self, resource_id: &ResourceId) {
            self.inner.remove_resource_id(resource_id);
        }

        fn get_bucket_list(&self) -> Vec<CacheEntry> {
            self.inner.get_bucket_list()
        }

        fn bucket_names(&self) -> Vec<String> {
            self.inner.bucket_names()
        }

        fn get_object_list(
            &self,
            bucket: &str,
            prefix: Option<&str>,
            delimiter: Option<&str>,
            prefixes: &mut BTreeSet<String>,
        ) -> Option<Vec<CacheEntry>> {
            self.inner.get_object_list(bucket, prefix, delimiter, prefixes)
        }

        fn num_buckets(&self) -> usize {
            self.inner.num_buckets()
        }

        fn num_objects(&self) -> usize {
            self.inner.num_objects()
        }
    }

    #[test]
    fn test_reads_during_write_back_see_marker() {
        let view = MetadataReadOnlyStorage::with_cache(
            StallingCache::new(),
            [stored("B", "a/b/c", 10), stored("B", "a/x", 30)],
        )
        .unwrap();
        view.cache().armed.store(true, Ordering::SeqCst);
        let dir = ResourceId::object("B", "a/b/");

        thread::scope(|scope| {
            let writer = scope.spawn(|| view.list_object_info("B", Some("a/"), Some("/")));

            view.cache().landed.wait();
            let lookup = view.get_item_info(&dir);
            let listing = view.list_object_info("B", Some("a/"), Some("/"));
            view.cache().resumed.wait();

            let lookup = lookup.unwrap();
            assert!(lookup.is_implicit_directory());
            assert_eq!(names(&listing.unwrap()), set(&["a/x", "a/b/"]));
            assert_eq!(names(&writer.join().unwrap().unwrap()), set(&["a/x", "a/b/"]));
        });
        assert_eq!(view.implicit_directories_synthesized(), 1);
    }

    #[test]
    fn test_from_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let infos = vec![stored("B", "a/b/c", 10), stored("B", "a/x", 30)];
        serde_json::to_writer(&mut file, &infos).unwrap();
        file.flush().unwrap();

        let view = MetadataReadOnlyStorage::from_snapshot(file.path()).unwrap();
        assert_eq!(view.get_item_info(&ResourceId::object("B", "a/x")).unwrap(), infos[1]);
        let listed = view.list_object_info("B", Some("a/"), Some("/")).unwrap();
        assert_eq!(names(&listed), set(&["a/x", "a/b/"]));
    }
}
