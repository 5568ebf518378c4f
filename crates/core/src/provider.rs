//! StorageProvider trait definition
//!
//! This trait is the boundary to the remote storage provider's client SDK.
//! Everything behind it is consumed as a black box: transport, retries, and
//! pagination belong to the SDK, not to this crate. The trait keeps the
//! facade decoupled from any specific SDK and mockable for testing.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::handle::{BlobHandle, BlobPage, BucketHandle};

/// Inclusive byte range for partial object downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for ByteRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bytes={}-{}", self.start, self.end)
    }
}

/// Trait for remote object-storage operations
///
/// Implemented by the SDK adapter crate; mocked in facade tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Create a bucket with the given storage class and location.
    ///
    /// The class string is forwarded as-is; a provider that does not know it
    /// rejects the request.
    async fn create_bucket(
        &self,
        name: &str,
        storage_class: &str,
        location: &str,
    ) -> Result<BucketHandle>;

    /// List all buckets known to the account, in provider response order
    async fn list_buckets(&self) -> Result<Vec<BucketHandle>>;

    /// Fetch a bucket by name
    async fn get_bucket(&self, name: &str) -> Result<BucketHandle>;

    /// Replace the bucket's entire label set and persist the change.
    ///
    /// Returns a refreshed handle reflecting the new labels. An empty
    /// mapping clears all labels.
    async fn set_bucket_labels(
        &self,
        bucket: &str,
        labels: BTreeMap<String, String>,
    ) -> Result<BucketHandle>;

    /// Fetch one page of blob handles for a bucket
    async fn list_blobs(&self, bucket: &str, page_token: Option<String>) -> Result<BlobPage>;

    /// Fetch a single blob by name within a bucket
    async fn get_blob(&self, bucket: &str, name: &str) -> Result<BlobHandle>;

    /// Stream bytes to an object at the given key
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
        storage_class: Option<String>,
    ) -> Result<BlobHandle>;

    /// Fetch object bytes, optionally restricted to a byte range
    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        range: Option<ByteRange>,
    ) -> Result<Vec<u8>>;

    /// Delete a bucket
    async fn delete_bucket(&self, name: &str) -> Result<()>;

    /// Delete a single object
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}
