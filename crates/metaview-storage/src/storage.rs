//! The storage trait consumed by the adapter layer

use crate::capability::Capabilities;
use crate::request::{ListQuery, OperationKind, SeekableRead, StorageRequest, StorageResponse};
use metaview_common::{CreateObjectOptions, Error, ItemInfo, ResourceId, Result, UpdatableItemInfo};
use std::io::Write;
use tracing::debug;

/// An object storage backend
///
/// Implementors declare their [`Capabilities`] and serve requests in
/// [`handle`](ObjectStorage::handle). Callers go through
/// [`execute`](ObjectStorage::execute) or the typed helpers, which reject
/// anything outside the declared capabilities before `handle` sees it.
pub trait ObjectStorage: Send + Sync {
    fn capabilities(&self) -> Capabilities;

    /// Serve a request whose kind is in `capabilities()`
    fn handle(&self, request: StorageRequest) -> Result<StorageResponse>;

    fn execute(&self, request: StorageRequest) -> Result<StorageResponse> {
        let kind = request.kind();
        if !self.capabilities().allows(kind) {
            debug!("Rejecting unsupported operation {}", kind);
            return Err(Error::unsupported(kind.to_string()));
        }
        self.handle(request)
    }

    fn create(
        &self,
        resource_id: &ResourceId,
        options: &CreateObjectOptions,
    ) -> Result<Box<dyn Write + Send>> {
        let request = StorageRequest::Create {
            resource_id: resource_id.clone(),
            options: options.clone(),
        };
        match self.execute(request)? {
            StorageResponse::Writer(writer) => Ok(writer),
            other => Err(unexpected(OperationKind::Create, &other)),
        }
    }

    fn create_bucket(&self, bucket: &str) -> Result<()> {
        let request = StorageRequest::CreateBucket {
            bucket: bucket.to_owned(),
        };
        expect_done(OperationKind::CreateBucket, self.execute(request)?)
    }

    fn create_empty_object(
        &self,
        resource_id: &ResourceId,
        options: &CreateObjectOptions,
    ) -> Result<()> {
        self.create_empty_objects(std::slice::from_ref(resource_id), options)
    }

    fn create_empty_objects(
        &self,
        resource_ids: &[ResourceId],
        options: &CreateObjectOptions,
    ) -> Result<()> {
        let request = StorageRequest::CreateEmptyObjects {
            resource_ids: resource_ids.to_vec(),
            options: options.clone(),
        };
        expect_done(OperationKind::CreateEmptyObjects, self.execute(request)?)
    }

    fn open(&self, resource_id: &ResourceId) -> Result<Box<dyn SeekableRead>> {
        let request = StorageRequest::Open {
            resource_id: resource_id.clone(),
        };
        match self.execute(request)? {
            StorageResponse::Reader(reader) => Ok(reader),
            other => Err(unexpected(OperationKind::Open, &other)),
        }
    }

    fn delete_buckets(&self, buckets: &[String]) -> Result<()> {
        let request = StorageRequest::DeleteBuckets {
            buckets: buckets.to_vec(),
        };
        expect_done(OperationKind::DeleteBuckets, self.execute(request)?)
    }

    fn delete_objects(&self, resource_ids: &[ResourceId]) -> Result<()> {
        let request = StorageRequest::DeleteObjects {
            resource_ids: resource_ids.to_vec(),
        };
        expect_done(OperationKind::DeleteObjects, self.execute(request)?)
    }

    fn copy(
        &self,
        src_bucket: &str,
        src_objects: &[String],
        dst_bucket: &str,
        dst_objects: &[String],
    ) -> Result<()> {
        let request = StorageRequest::Copy {
            src_bucket: src_bucket.to_owned(),
            src_objects: src_objects.to_vec(),
            dst_bucket: dst_bucket.to_owned(),
            dst_objects: dst_objects.to_vec(),
        };
        expect_done(OperationKind::Copy, self.execute(request)?)
    }

    fn list_bucket_names(&self) -> Result<Vec<String>> {
        expect_names(
            OperationKind::ListBucketNames,
            self.execute(StorageRequest::ListBucketNames)?,
        )
    }

    fn list_bucket_info(&self) -> Result<Vec<ItemInfo>> {
        expect_items(
            OperationKind::ListBucketInfo,
            self.execute(StorageRequest::ListBucketInfo)?,
        )
    }

    fn list_object_names(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        delimiter: Option<&str>,
    ) -> Result<Vec<String>> {
        let request = StorageRequest::ListObjectNames(ListQuery::new(bucket, prefix, delimiter));
        expect_names(OperationKind::ListObjectNames, self.execute(request)?)
    }

    fn list_object_info(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        delimiter: Option<&str>,
    ) -> Result<Vec<ItemInfo>> {
        let request = StorageRequest::ListObjectInfo(ListQuery::new(bucket, prefix, delimiter));
        expect_items(OperationKind::ListObjectInfo, self.execute(request)?)
    }

    fn get_item_info(&self, resource_id: &ResourceId) -> Result<ItemInfo> {
        let request = StorageRequest::GetItemInfo {
            resource_id: resource_id.clone(),
        };
        match self.execute(request)? {
            StorageResponse::Item(info) => Ok(info),
            other => Err(unexpected(OperationKind::GetItemInfo, &other)),
        }
    }

    fn get_item_infos(&self, resource_ids: &[ResourceId]) -> Result<Vec<ItemInfo>> {
        let request = StorageRequest::GetItemInfos {
            resource_ids: resource_ids.to_vec(),
        };
        expect_items(OperationKind::GetItemInfos, self.execute(request)?)
    }

    fn update_items(&self, items: &[UpdatableItemInfo]) -> Result<Vec<ItemInfo>> {
        let request = StorageRequest::UpdateItems {
            items: items.to_vec(),
        };
        expect_items(OperationKind::UpdateItems, self.execute(request)?)
    }

    fn wait_for_bucket_empty(&self, bucket: &str) -> Result<()> {
        let request = StorageRequest::WaitForBucketEmpty {
            bucket: bucket.to_owned(),
        };
        expect_done(OperationKind::WaitForBucketEmpty, self.execute(request)?)
    }

    fn close(&self) -> Result<()> {
        expect_done(OperationKind::Close, self.execute(StorageRequest::Close)?)
    }
}

fn unexpected(kind: OperationKind, response: &StorageResponse) -> Error {
    Error::internal(format!("{kind} returned unexpected response {response:?}"))
}

fn expect_done(kind: OperationKind, response: StorageResponse) -> Result<()> {
    match response {
        StorageResponse::Done => Ok(()),
        other => Err(unexpected(kind, &other)),
    }
}

fn expect_names(kind: OperationKind, response: StorageResponse) -> Result<Vec<String>> {
    match response {
        StorageResponse::Names(names) => Ok(names),
        other => Err(unexpected(kind, &other)),
    }
}

fn expect_items(kind: OperationKind, response: StorageResponse) -> Result<Vec<ItemInfo>> {
    match response {
        StorageResponse::Items(items) => Ok(items),
        other => Err(unexpected(kind, &other)),
    }
}
