//! Core type definitions for MetaView
//!
//! This module defines the resource identifiers and metadata records that
//! flow between the directory list cache and the read view built on it.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Path delimiter used by convention in object names
pub const PATH_DELIMITER: &str = "/";

/// Identifies the global root, a bucket, or an object within a bucket
///
/// Equality is by the `(bucket, object)` pair. A bucket-only id carries no
/// object name; an empty object name is normalized away on construction.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawResourceId")]
pub struct ResourceId {
    bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    object: Option<String>,
}

/// Unvalidated wire form of a [`ResourceId`]
#[derive(Deserialize)]
struct RawResourceId {
    #[serde(default)]
    bucket: String,
    #[serde(default)]
    object: Option<String>,
}

impl TryFrom<RawResourceId> for ResourceId {
    type Error = ResourceIdError;

    fn try_from(raw: RawResourceId) -> Result<Self, Self::Error> {
        Self::new(raw.bucket, raw.object)
    }
}

impl ResourceId {
    /// Create a resource id, rejecting an object name without a bucket
    pub fn new(
        bucket: impl Into<String>,
        object: Option<impl Into<String>>,
    ) -> Result<Self, ResourceIdError> {
        let bucket = bucket.into();
        let object = object.map(Into::into).filter(|o| !o.is_empty());
        if bucket.is_empty() && object.is_some() {
            return Err(ResourceIdError::ObjectWithoutBucket);
        }
        Ok(Self { bucket, object })
    }

    /// The global root (no bucket, no object)
    #[must_use]
    pub const fn root() -> Self {
        Self {
            bucket: String::new(),
            object: None,
        }
    }

    /// A bucket-only id
    #[must_use]
    pub fn bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            object: None,
        }
    }

    /// An object id
    ///
    /// An empty `object` yields the bucket id. The caller guarantees a
    /// non-empty bucket; use [`ResourceId::new`] for untrusted input.
    #[must_use]
    pub fn object(bucket: impl Into<String>, object: impl Into<String>) -> Self {
        let object = object.into();
        Self {
            bucket: bucket.into(),
            object: (!object.is_empty()).then_some(object),
        }
    }

    /// Bucket name (empty for the root)
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket
    }

    /// Object name, if this id names an object
    #[must_use]
    pub fn object_name(&self) -> Option<&str> {
        self.object.as_deref()
    }

    /// True for the global root
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.bucket.is_empty()
    }

    /// True for a bucket-only id
    #[must_use]
    pub fn is_bucket(&self) -> bool {
        !self.bucket.is_empty() && self.object.is_none()
    }

    /// True for an object id
    #[must_use]
    pub const fn is_object(&self) -> bool {
        self.object.is_some()
    }

    /// True for the root, a bucket, or an object whose name ends in `/`
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.object
            .as_deref()
            .is_none_or(|name| name.ends_with(PATH_DELIMITER))
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId({self})")
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.object, self.is_root()) {
            (_, true) => write!(f, "<root>"),
            (Some(object), false) => write!(f, "{}/{}", self.bucket, object),
            (None, false) => write!(f, "{}", self.bucket),
        }
    }
}

/// Errors that can occur when creating a resource id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceIdError {
    #[error("object name given without a bucket name")]
    ObjectWithoutBucket,
}

/// What an [`ItemInfo`] describes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A real object or bucket record
    #[default]
    #[display("stored")]
    Stored,
    /// Placeholder for a prefix that has objects under it but no object of
    /// its own
    #[display("implicit directory")]
    ImplicitDirectory,
    /// Nothing is known about the resource
    #[display("not found")]
    NotFound,
}

/// Metadata snapshot for a resource
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInfo {
    #[serde(flatten)]
    resource_id: ResourceId,
    /// Creation time in milliseconds since the Unix epoch
    #[serde(default)]
    creation_time: u64,
    /// Size in bytes
    #[serde(default)]
    size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    storage_class: Option<String>,
    #[serde(default)]
    kind: ItemKind,
}

impl ItemInfo {
    /// Metadata for a real object or bucket
    #[must_use]
    pub const fn new(
        resource_id: ResourceId,
        creation_time: u64,
        size: u64,
        location: Option<String>,
        storage_class: Option<String>,
    ) -> Self {
        Self {
            resource_id,
            creation_time,
            size,
            location,
            storage_class,
            kind: ItemKind::Stored,
        }
    }

    /// Synthetic marker for an implicit directory
    #[must_use]
    pub const fn implicit_directory(resource_id: ResourceId) -> Self {
        Self {
            resource_id,
            creation_time: 0,
            size: 0,
            location: None,
            storage_class: None,
            kind: ItemKind::ImplicitDirectory,
        }
    }

    /// Sentinel for a resource with no known metadata
    #[must_use]
    pub const fn not_found(resource_id: ResourceId) -> Self {
        Self {
            resource_id,
            creation_time: 0,
            size: 0,
            location: None,
            storage_class: None,
            kind: ItemKind::NotFound,
        }
    }

    #[must_use]
    pub const fn resource_id(&self) -> &ResourceId {
        &self.resource_id
    }

    #[must_use]
    pub fn bucket_name(&self) -> &str {
        self.resource_id.bucket_name()
    }

    #[must_use]
    pub fn object_name(&self) -> Option<&str> {
        self.resource_id.object_name()
    }

    #[must_use]
    pub const fn creation_time(&self) -> u64 {
        self.creation_time
    }

    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    #[must_use]
    pub fn storage_class(&self) -> Option<&str> {
        self.storage_class.as_deref()
    }

    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.kind
    }

    /// False only for the not-found sentinel
    #[must_use]
    pub fn exists(&self) -> bool {
        self.kind != ItemKind::NotFound
    }

    #[must_use]
    pub fn is_implicit_directory(&self) -> bool {
        self.kind == ItemKind::ImplicitDirectory
    }

    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.resource_id.is_directory()
    }

    #[must_use]
    pub fn is_bucket(&self) -> bool {
        self.resource_id.is_bucket()
    }
}

/// Options for object creation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateObjectOptions {
    /// Replace an existing object of the same name
    pub overwrite_existing: bool,
    /// MIME type of the new object
    pub content_type: Option<String>,
    /// Custom metadata attached to the object
    pub metadata: BTreeMap<String, Vec<u8>>,
}

/// Metadata patch for an existing object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatableItemInfo {
    pub resource_id: ResourceId,
    /// Keys mapped to `None` are removed
    pub metadata: BTreeMap<String, Option<Vec<u8>>>,
}
