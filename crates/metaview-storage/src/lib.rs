//! MetaView Storage - Metadata-backed storage views
//!
//! The full object storage contract is expressed as a closed set of
//! [`StorageRequest`]s served through the [`ObjectStorage`] trait. A backend
//! declares the operations it serves as [`Capabilities`]; anything else is
//! rejected with [`Error::Unsupported`](metaview_common::Error::Unsupported)
//! before it is dispatched.
//!
//! [`MetadataReadOnlyStorage`] is a backend that serves metadata reads from a
//! directory list cache populated once at construction.

mod capability;
mod readonly;
mod request;
pub mod snapshot;
mod storage;

pub use capability::Capabilities;
pub use readonly::MetadataReadOnlyStorage;
pub use request::{ListQuery, OperationKind, SeekableRead, StorageRequest, StorageResponse};
pub use storage::ObjectStorage;
