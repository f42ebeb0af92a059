//! Cache entries
//!
//! A [`CacheEntry`] is a shared handle: clones refer to the same slot, so
//! info attached through one handle is visible through every other.

use crate::time::TimeProvider;
use metaview_common::{Error, ItemInfo, ResourceId, Result};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Entry for one resource id, optionally carrying its item info
#[derive(Clone)]
pub struct CacheEntry {
    inner: Arc<EntryInner>,
}

struct EntryInner {
    resource_id: ResourceId,
    creation_time_ms: u64,
    info: RwLock<Option<InfoSlot>>,
    time: Arc<dyn TimeProvider>,
}

#[derive(Clone)]
struct InfoSlot {
    info: ItemInfo,
    updated_at_ms: u64,
}

impl CacheEntry {
    pub(crate) fn new(resource_id: ResourceId, time: Arc<dyn TimeProvider>) -> Self {
        let creation_time_ms = time.now_millis();
        Self {
            inner: Arc::new(EntryInner {
                resource_id,
                creation_time_ms,
                info: RwLock::new(None),
                time,
            }),
        }
    }

    /// Entry that holds `info` from the moment it exists
    pub(crate) fn with_info(info: ItemInfo, time: Arc<dyn TimeProvider>) -> Self {
        let now = time.now_millis();
        Self {
            inner: Arc::new(EntryInner {
                resource_id: info.resource_id().clone(),
                creation_time_ms: now,
                info: RwLock::new(Some(InfoSlot {
                    info,
                    updated_at_ms: now,
                })),
                time,
            }),
        }
    }

    pub fn resource_id(&self) -> &ResourceId {
        &self.inner.resource_id
    }

    /// When the entry was created (ms since the Unix epoch)
    pub fn creation_time_ms(&self) -> u64 {
        self.inner.creation_time_ms
    }

    /// When the info was last set, if any is attached
    pub fn item_info_update_time_ms(&self) -> Option<u64> {
        self.inner.info.read().as_ref().map(|slot| slot.updated_at_ms)
    }

    pub fn item_info(&self) -> Option<ItemInfo> {
        self.inner.info.read().as_ref().map(|slot| slot.info.clone())
    }

    /// Attach `info`, replacing whatever was there; returns the old info
    pub fn set_item_info(&self, info: ItemInfo) -> Result<Option<ItemInfo>> {
        self.check_resource_id(&info)?;
        let slot = InfoSlot {
            info,
            updated_at_ms: self.inner.time.now_millis(),
        };
        Ok(self.inner.info.write().replace(slot).map(|old| old.info))
    }

    /// Attach `info` only if the entry has none; returns whether it was set
    pub fn set_item_info_if_absent(&self, info: ItemInfo) -> Result<bool> {
        self.check_resource_id(&info)?;
        let mut guard = self.inner.info.write();
        if guard.is_some() {
            return Ok(false);
        }
        *guard = Some(InfoSlot {
            info,
            updated_at_ms: self.inner.time.now_millis(),
        });
        Ok(true)
    }

    /// Drop the attached info, keeping the entry
    pub fn clear_item_info(&self) -> Option<ItemInfo> {
        self.inner.info.write().take().map(|slot| slot.info)
    }

    /// True if both handles refer to the same entry
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn check_resource_id(&self, info: &ItemInfo) -> Result<()> {
        if info.resource_id() == self.resource_id() {
            Ok(())
        } else {
            Err(Error::invalid_argument(format!(
                "item info for '{}' cannot be attached to cache entry '{}'",
                info.resource_id(),
                self.resource_id()
            )))
        }
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("resource_id", self.resource_id())
            .field("creation_time_ms", &self.creation_time_ms())
            .field("item_info", &self.item_info())
            .finish()
    }
}
