//! The storage operation set as a closed enumeration
//!
//! Every call an adapter can make against a storage backend is one
//! [`StorageRequest`] variant. [`OperationKind`] names the variant without
//! its arguments so capability checks can run before dispatch.

use derive_more::Display;
use metaview_common::{CreateObjectOptions, ItemInfo, ResourceId, UpdatableItemInfo};
use std::fmt;
use std::io::{Read, Seek, Write};

/// Name of a storage operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum OperationKind {
    #[display("create")]
    Create,
    #[display("create_bucket")]
    CreateBucket,
    #[display("create_empty_objects")]
    CreateEmptyObjects,
    #[display("open")]
    Open,
    #[display("delete_buckets")]
    DeleteBuckets,
    #[display("delete_objects")]
    DeleteObjects,
    #[display("copy")]
    Copy,
    #[display("list_bucket_names")]
    ListBucketNames,
    #[display("list_bucket_info")]
    ListBucketInfo,
    #[display("list_object_names")]
    ListObjectNames,
    #[display("list_object_info")]
    ListObjectInfo,
    #[display("get_item_info")]
    GetItemInfo,
    #[display("get_item_infos")]
    GetItemInfos,
    #[display("update_items")]
    UpdateItems,
    #[display("wait_for_bucket_empty")]
    WaitForBucketEmpty,
    #[display("close")]
    Close,
}

impl OperationKind {
    pub const ALL: [Self; 16] = [
        Self::Create,
        Self::CreateBucket,
        Self::CreateEmptyObjects,
        Self::Open,
        Self::DeleteBuckets,
        Self::DeleteObjects,
        Self::Copy,
        Self::ListBucketNames,
        Self::ListBucketInfo,
        Self::ListObjectNames,
        Self::ListObjectInfo,
        Self::GetItemInfo,
        Self::GetItemInfos,
        Self::UpdateItems,
        Self::WaitForBucketEmpty,
        Self::Close,
    ];

    /// True for operations that change stored objects or buckets
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        matches!(
            self,
            Self::Create
                | Self::CreateBucket
                | Self::CreateEmptyObjects
                | Self::DeleteBuckets
                | Self::DeleteObjects
                | Self::Copy
                | Self::UpdateItems
        )
    }

    pub(crate) const fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Arguments of a prefix/delimiter listing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub bucket: String,
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
}

impl ListQuery {
    pub fn new(bucket: &str, prefix: Option<&str>, delimiter: Option<&str>) -> Self {
        Self {
            bucket: bucket.to_owned(),
            prefix: prefix.map(str::to_owned),
            delimiter: delimiter.map(str::to_owned),
        }
    }
}

/// A storage operation with its arguments
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageRequest {
    Create {
        resource_id: ResourceId,
        options: CreateObjectOptions,
    },
    CreateBucket {
        bucket: String,
    },
    CreateEmptyObjects {
        resource_ids: Vec<ResourceId>,
        options: CreateObjectOptions,
    },
    Open {
        resource_id: ResourceId,
    },
    DeleteBuckets {
        buckets: Vec<String>,
    },
    DeleteObjects {
        resource_ids: Vec<ResourceId>,
    },
    Copy {
        src_bucket: String,
        src_objects: Vec<String>,
        dst_bucket: String,
        dst_objects: Vec<String>,
    },
    ListBucketNames,
    ListBucketInfo,
    ListObjectNames(ListQuery),
    ListObjectInfo(ListQuery),
    GetItemInfo {
        resource_id: ResourceId,
    },
    GetItemInfos {
        resource_ids: Vec<ResourceId>,
    },
    UpdateItems {
        items: Vec<UpdatableItemInfo>,
    },
    WaitForBucketEmpty {
        bucket: String,
    },
    Close,
}

impl StorageRequest {
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::Create { .. } => OperationKind::Create,
            Self::CreateBucket { .. } => OperationKind::CreateBucket,
            Self::CreateEmptyObjects { .. } => OperationKind::CreateEmptyObjects,
            Self::Open { .. } => OperationKind::Open,
            Self::DeleteBuckets { .. } => OperationKind::DeleteBuckets,
            Self::DeleteObjects { .. } => OperationKind::DeleteObjects,
            Self::Copy { .. } => OperationKind::Copy,
            Self::ListBucketNames => OperationKind::ListBucketNames,
            Self::ListBucketInfo => OperationKind::ListBucketInfo,
            Self::ListObjectNames(_) => OperationKind::ListObjectNames,
            Self::ListObjectInfo(_) => OperationKind::ListObjectInfo,
            Self::GetItemInfo { .. } => OperationKind::GetItemInfo,
            Self::GetItemInfos { .. } => OperationKind::GetItemInfos,
            Self::UpdateItems { .. } => OperationKind::UpdateItems,
            Self::WaitForBucketEmpty { .. } => OperationKind::WaitForBucketEmpty,
            Self::Close => OperationKind::Close,
        }
    }
}

/// Readable, seekable object content
pub trait SeekableRead: Read + Seek + Send {}

impl<T: Read + Seek + Send> SeekableRead for T {}

/// Result of a storage operation
pub enum StorageResponse {
    /// The operation has no payload
    Done,
    Names(Vec<String>),
    Items(Vec<ItemInfo>),
    Item(ItemInfo),
    /// Sink for a newly created object's content
    Writer(Box<dyn Write + Send>),
    Reader(Box<dyn SeekableRead>),
}

impl fmt::Debug for StorageResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => write!(f, "Done"),
            Self::Names(names) => f.debug_tuple("Names").field(names).finish(),
            Self::Items(items) => f.debug_tuple("Items").field(items).finish(),
            Self::Item(item) => f.debug_tuple("Item").field(item).finish(),
            Self::Writer(_) => write!(f, "Writer(..)"),
            Self::Reader(_) => write!(f, "Reader(..)"),
        }
    }
}
