//! Storage facade
//!
//! [`StorageFacade`] is a typed, simplified surface over bucket and blob
//! lifecycle operations. Every operation is a direct pass-through to the
//! injected [`StorageProvider`]; this layer adds only pre-flight validation
//! (label character set, destination folder existence, opt-in storage-class
//! checks) and local filesystem bookkeeping for downloads. No retries, no
//! caching, no concurrency coordination.

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};

use crate::class::validate_storage_class;
use crate::error::{Error, Result};
use crate::handle::{BlobHandle, BucketHandle};
use crate::label::validate_labels;
use crate::metadata::{BlobMetadata, BucketMetadata};
use crate::provider::{ByteRange, StorageProvider};

/// Typed facade over a remote object-storage provider
pub struct StorageFacade<P: StorageProvider> {
    provider: P,
    validate_class: bool,
}

impl<P: StorageProvider> StorageFacade<P> {
    /// Create a facade around a pre-authenticated provider client
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            validate_class: false,
        }
    }

    /// Enable or disable storage-class validation before `create_bucket`.
    ///
    /// Off by default: the provider is trusted to reject unknown classes,
    /// so enabling this changes the observable failure timing.
    pub fn validate_storage_class(mut self, enabled: bool) -> Self {
        self.validate_class = enabled;
        self
    }

    /// Access the underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Create a bucket with the given storage class and location
    pub async fn create_bucket(
        &self,
        name: &str,
        storage_class: &str,
        location: &str,
    ) -> Result<BucketHandle> {
        if self.validate_class {
            validate_storage_class(storage_class)?;
        }
        self.provider
            .create_bucket(name, storage_class, location)
            .await
    }

    /// List the names of all buckets known to the account.
    ///
    /// Ordering follows the provider response and is not guaranteed stable.
    pub async fn list_buckets(&self) -> Result<Vec<String>> {
        let buckets = self.provider.list_buckets().await?;
        Ok(buckets.into_iter().map(|b| b.name).collect())
    }

    /// Fetch a bucket by name
    pub async fn get_bucket(&self, name: &str) -> Result<BucketHandle> {
        self.provider.get_bucket(name).await
    }

    /// Project a bucket handle into an immutable metadata record.
    ///
    /// Pure: no I/O beyond what the handle already carries.
    pub fn bucket_metadata(&self, bucket: &BucketHandle) -> BucketMetadata {
        BucketMetadata::from(bucket)
    }

    /// Replace the bucket's entire label set and persist it.
    ///
    /// Validates every key and value against `[a-z0-9_-]` before any remote
    /// call; the replacement is wholesale, not a merge with prior labels.
    pub async fn add_bucket_labels(
        &self,
        bucket: &BucketHandle,
        labels: BTreeMap<String, String>,
    ) -> Result<BucketHandle> {
        validate_labels(&labels)?;
        self.provider.set_bucket_labels(&bucket.name, labels).await
    }

    /// Clear all labels from the bucket and persist the empty set
    pub async fn delete_bucket_labels(&self, bucket: &BucketHandle) -> Result<BucketHandle> {
        self.provider
            .set_bucket_labels(&bucket.name, BTreeMap::new())
            .await
    }

    /// Start a lazy listing of all blobs in a bucket.
    ///
    /// Pages are fetched from the provider on demand; restart by calling
    /// this method again.
    pub fn list_blobs(&self, bucket_name: &str) -> BlobListing<'_, P> {
        BlobListing {
            provider: &self.provider,
            bucket: bucket_name.to_string(),
            buffered: VecDeque::new(),
            next_page_token: None,
            exhausted: false,
        }
    }

    /// Fetch a single blob by name within a bucket
    pub async fn get_blob(&self, bucket: &BucketHandle, name: &str) -> Result<BlobHandle> {
        self.provider.get_blob(&bucket.name, name).await
    }

    /// Project a blob handle into an immutable metadata record
    pub fn blob_metadata(&self, blob: &BlobHandle) -> BlobMetadata {
        BlobMetadata::from(blob)
    }

    /// Upload a local file to `destination_key` under the bucket.
    ///
    /// The content type is derived from the file extension, with fixed
    /// overrides for `csv` and `psd`; anything else goes through the
    /// standard extension-to-MIME lookup and may come back absent. The
    /// bucket's default storage class, when known, is stamped on the upload.
    pub async fn upload_file(
        &self,
        bucket: &BucketHandle,
        destination_key: &str,
        local_path: &Path,
    ) -> Result<BlobHandle> {
        let content_type = derive_content_type(local_path);
        let data = std::fs::read(local_path)?;
        self.provider
            .put_object(
                &bucket.name,
                destination_key,
                data,
                content_type,
                bucket.storage_class.clone(),
            )
            .await
    }

    /// Download a byte range of a named blob to `destination_path`.
    ///
    /// The blob is resolved by name within the bucket; completion is
    /// reported through the log, not the return value. The caller owns any
    /// retry.
    pub async fn download_blob_range(
        &self,
        bucket: &BucketHandle,
        blob_name: &str,
        destination_path: &Path,
        start_byte: u64,
        end_byte: u64,
    ) -> Result<()> {
        let range = ByteRange::new(start_byte, end_byte);
        let data = self
            .provider
            .get_object(&bucket.name, blob_name, Some(range))
            .await?;
        std::fs::write(destination_path, data)?;
        tracing::info!(path = %destination_path.display(), "file downloaded");
        Ok(())
    }

    /// Download a blob under `destination_folder`, mirroring its name.
    ///
    /// The blob name is treated as a `/`-separated path: all segments but
    /// the last become a local subdirectory, created recursively if absent.
    /// Fails before any remote call when `destination_folder` does not
    /// exist.
    pub async fn download_blob(&self, blob: &BlobHandle, destination_folder: &Path) -> Result<()> {
        ensure_folder_exists(destination_folder)?;

        let meta = self.blob_metadata(blob);
        let (target_dir, leaf) = local_target(destination_folder, &meta.blob_name);
        if !target_dir.exists() {
            std::fs::create_dir_all(&target_dir)?;
        }

        let data = self
            .provider
            .get_object(&meta.bucket_name, &meta.blob_name, None)
            .await?;
        std::fs::write(target_dir.join(leaf), data)?;
        tracing::info!(
            blob = %meta.blob_name,
            path = %target_dir.display(),
            "download finished"
        );
        Ok(())
    }

    /// Download every blob in the bucket under `destination_folder`.
    ///
    /// The enumeration is unbounded and a single transfer failure aborts
    /// the whole run; callers wanting partial-failure isolation must wrap
    /// per-blob calls themselves.
    pub async fn download_bucket(
        &self,
        bucket: &BucketHandle,
        destination_folder: &Path,
    ) -> Result<()> {
        ensure_folder_exists(destination_folder)?;

        let mut listing = self.list_blobs(&bucket.name);
        while let Some(blob) = listing.next().await? {
            tracing::info!(blob = %blob.name, folder = %destination_folder.display(), "downloading");
            self.download_blob(&blob, destination_folder).await?;
        }
        Ok(())
    }

    /// Delete a bucket
    pub async fn delete_bucket(&self, name: &str) -> Result<()> {
        self.provider.delete_bucket(name).await
    }

    /// Delete a single object within a bucket
    pub async fn delete_object(&self, bucket: &BucketHandle, name: &str) -> Result<()> {
        self.provider.delete_object(&bucket.name, name).await
    }
}

/// Lazy, page-buffered cursor over the blobs of one bucket.
///
/// Not restartable mid-iteration; call
/// [`StorageFacade::list_blobs`] again to start over.
pub struct BlobListing<'a, P: StorageProvider> {
    provider: &'a P,
    bucket: String,
    buffered: VecDeque<BlobHandle>,
    next_page_token: Option<String>,
    exhausted: bool,
}

impl<P: StorageProvider> BlobListing<'_, P> {
    /// Yield the next blob handle, fetching the next page when needed
    pub async fn next(&mut self) -> Result<Option<BlobHandle>> {
        loop {
            if let Some(blob) = self.buffered.pop_front() {
                return Ok(Some(blob));
            }
            if self.exhausted {
                return Ok(None);
            }

            let page = self
                .provider
                .list_blobs(&self.bucket, self.next_page_token.take())
                .await?;
            self.buffered.extend(page.blobs);
            self.next_page_token = page.next_page_token;
            if self.next_page_token.is_none() {
                self.exhausted = true;
            }
        }
    }

    /// Drain the remaining blobs into a vector
    pub async fn collect(mut self) -> Result<Vec<BlobHandle>> {
        let mut blobs = Vec::new();
        while let Some(blob) = self.next().await? {
            blobs.push(blob);
        }
        Ok(blobs)
    }
}

/// Derive the upload content type from a file extension.
///
/// `csv` and `psd` are forced to fixed types; everything else goes through
/// the standard MIME lookup and may yield nothing.
fn derive_content_type(path: &Path) -> Option<String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => Some("text/csv".to_string()),
        Some("psd") => Some("image/vnd.adobe.photoshop".to_string()),
        _ => mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string()),
    }
}

fn ensure_folder_exists(folder: &Path) -> Result<()> {
    if !folder.exists() {
        return Err(Error::NotFound(format!(
            "Folder {} not found",
            folder.display()
        )));
    }
    Ok(())
}

/// Split a blob name into a local target directory and leaf file name
fn local_target(destination_folder: &Path, blob_name: &str) -> (PathBuf, String) {
    match blob_name.rsplit_once('/') {
        Some((dirs, leaf)) => (destination_folder.join(dirs), leaf.to_string()),
        None => (destination_folder.to_path_buf(), blob_name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::BlobPage;
    use crate::provider::MockStorageProvider;
    use mockall::predicate::eq;
    use tempfile::TempDir;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn bucket_with_labels(name: &str, labels: BTreeMap<String, String>) -> BucketHandle {
        BucketHandle {
            name: name.to_string(),
            labels,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_add_labels_replaces_whole_set() {
        let input = labels(&[("env", "prod"), ("team", "data_eng")]);
        let expected = input.clone();

        let mut provider = MockStorageProvider::new();
        provider
            .expect_set_bucket_labels()
            .with(eq("data-lake"), eq(input.clone()))
            .times(1)
            .returning(move |name, l| Ok(bucket_with_labels(name, l)));

        let facade = StorageFacade::new(provider);
        let bucket = BucketHandle::named("data-lake");
        let updated = facade.add_bucket_labels(&bucket, input).await.unwrap();
        assert_eq!(updated.labels, expected);
    }

    #[tokio::test]
    async fn test_add_labels_invalid_chars_no_remote_call() {
        let mut provider = MockStorageProvider::new();
        provider.expect_set_bucket_labels().times(0);

        let facade = StorageFacade::new(provider);
        let bucket = BucketHandle::named("data-lake");
        let err = facade
            .add_bucket_labels(&bucket, labels(&[("Env", "prod")]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_labels_persists_empty_mapping() {
        let mut provider = MockStorageProvider::new();
        provider
            .expect_set_bucket_labels()
            .with(eq("data-lake"), eq(BTreeMap::new()))
            .times(1)
            .returning(|name, l| Ok(bucket_with_labels(name, l)));

        let facade = StorageFacade::new(provider);
        let bucket = bucket_with_labels("data-lake", labels(&[("env", "prod")]));
        let updated = facade.delete_bucket_labels(&bucket).await.unwrap();
        assert!(updated.labels.is_empty());
    }

    #[tokio::test]
    async fn test_list_buckets_returns_names_in_order() {
        let mut provider = MockStorageProvider::new();
        provider.expect_list_buckets().times(1).returning(|| {
            Ok(vec![
                BucketHandle::named("zeta"),
                BucketHandle::named("alpha"),
            ])
        });

        let facade = StorageFacade::new(provider);
        let names = facade.list_buckets().await.unwrap();
        assert_eq!(names, vec!["zeta".to_string(), "alpha".to_string()]);
    }

    #[tokio::test]
    async fn test_create_bucket_class_validation_opt_in() {
        let mut provider = MockStorageProvider::new();
        provider.expect_create_bucket().times(0);

        let facade = StorageFacade::new(provider).validate_storage_class(true);
        let err = facade
            .create_bucket("data-lake", "GLACIER", "us-east-1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_bucket_unvalidated_by_default() {
        // With validation off, even an unknown class is dispatched and the
        // provider decides.
        let mut provider = MockStorageProvider::new();
        provider
            .expect_create_bucket()
            .with(eq("data-lake"), eq("GLACIER"), eq("us-east-1"))
            .times(1)
            .returning(|name, _, _| Ok(BucketHandle::named(name)));

        let facade = StorageFacade::new(provider);
        let bucket = facade
            .create_bucket("data-lake", "GLACIER", "us-east-1")
            .await
            .unwrap();
        assert_eq!(bucket.name, "data-lake");
    }

    #[tokio::test]
    async fn test_list_blobs_pages_lazily() {
        let mut provider = MockStorageProvider::new();
        provider
            .expect_list_blobs()
            .with(eq("data-lake"), eq(None::<String>))
            .times(1)
            .returning(|bucket, _| {
                Ok(BlobPage {
                    blobs: vec![BlobHandle::named(bucket, "a.txt")],
                    next_page_token: Some("page2".to_string()),
                })
            });
        provider
            .expect_list_blobs()
            .with(eq("data-lake"), eq(Some("page2".to_string())))
            .times(1)
            .returning(|bucket, _| {
                Ok(BlobPage {
                    blobs: vec![BlobHandle::named(bucket, "b.txt")],
                    next_page_token: None,
                })
            });

        let facade = StorageFacade::new(provider);
        let blobs = facade.list_blobs("data-lake").collect().await.unwrap();
        let names: Vec<&str> = blobs.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn test_upload_csv_forces_content_type() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("report.csv");
        std::fs::write(&file, b"a,b\n1,2\n").unwrap();

        let mut provider = MockStorageProvider::new();
        provider
            .expect_put_object()
            .withf(|bucket, key, data, content_type, class| {
                bucket == "data-lake"
                    && key == "raw/report.csv"
                    && data == b"a,b\n1,2\n"
                    && content_type.as_deref() == Some("text/csv")
                    && class.as_deref() == Some("NEARLINE")
            })
            .times(1)
            .returning(|bucket, key, _, _, _| Ok(BlobHandle::named(bucket, key)));

        let mut bucket = BucketHandle::named("data-lake");
        bucket.storage_class = Some("NEARLINE".to_string());

        let facade = StorageFacade::new(provider);
        let blob = facade
            .upload_file(&bucket, "raw/report.csv", &file)
            .await
            .unwrap();
        assert_eq!(blob.name, "raw/report.csv");
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let mut provider = MockStorageProvider::new();
        provider.expect_put_object().times(0);

        let facade = StorageFacade::new(provider);
        let bucket = BucketHandle::named("data-lake");
        let err = facade
            .upload_file(&bucket, "key", Path::new("/nonexistent/file.bin"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_derive_content_type_overrides() {
        assert_eq!(
            derive_content_type(Path::new("data/report.csv")).as_deref(),
            Some("text/csv")
        );
        assert_eq!(
            derive_content_type(Path::new("art/mock.psd")).as_deref(),
            Some("image/vnd.adobe.photoshop")
        );
        assert_eq!(
            derive_content_type(Path::new("notes.txt")).as_deref(),
            Some("text/plain")
        );
        assert!(derive_content_type(Path::new("blob.unknownext")).is_none());
    }

    #[tokio::test]
    async fn test_download_blob_creates_directory_component() {
        let tmp = TempDir::new().unwrap();

        let mut provider = MockStorageProvider::new();
        provider
            .expect_get_object()
            .with(eq("data-lake"), eq("a/b/c.txt"), eq(None::<ByteRange>))
            .times(1)
            .returning(|_, _, _| Ok(b"payload".to_vec()));

        let facade = StorageFacade::new(provider);
        let blob = BlobHandle::named("data-lake", "a/b/c.txt");
        facade.download_blob(&blob, tmp.path()).await.unwrap();

        let target = tmp.path().join("a").join("b").join("c.txt");
        assert!(tmp.path().join("a").join("b").is_dir());
        assert_eq!(std::fs::read(target).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_download_blob_flat_name() {
        let tmp = TempDir::new().unwrap();

        let mut provider = MockStorageProvider::new();
        provider
            .expect_get_object()
            .times(1)
            .returning(|_, _, _| Ok(b"x".to_vec()));

        let facade = StorageFacade::new(provider);
        let blob = BlobHandle::named("data-lake", "c.txt");
        facade.download_blob(&blob, tmp.path()).await.unwrap();
        assert!(tmp.path().join("c.txt").is_file());
    }

    #[tokio::test]
    async fn test_download_blob_missing_folder_no_remote_call() {
        let mut provider = MockStorageProvider::new();
        provider.expect_get_object().times(0);

        let facade = StorageFacade::new(provider);
        let blob = BlobHandle::named("data-lake", "a/b/c.txt");
        let err = facade
            .download_blob(&blob, Path::new("/nonexistent/folder"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_download_blob_range_writes_destination_path() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("partial.bin");

        let mut provider = MockStorageProvider::new();
        provider
            .expect_get_object()
            .with(
                eq("data-lake"),
                eq("big.bin"),
                eq(Some(ByteRange::new(0, 3))),
            )
            .times(1)
            .returning(|_, _, _| Ok(b"head".to_vec()));

        let facade = StorageFacade::new(provider);
        let bucket = BucketHandle::named("data-lake");
        facade
            .download_blob_range(&bucket, "big.bin", &dest, 0, 3)
            .await
            .unwrap();
        assert_eq!(std::fs::read(dest).unwrap(), b"head");
    }

    #[tokio::test]
    async fn test_download_bucket_empty_writes_nothing() {
        let tmp = TempDir::new().unwrap();

        let mut provider = MockStorageProvider::new();
        provider
            .expect_list_blobs()
            .times(1)
            .returning(|_, _| Ok(BlobPage::default()));
        provider.expect_get_object().times(0);

        let facade = StorageFacade::new(provider);
        let bucket = BucketHandle::named("data-lake");
        facade.download_bucket(&bucket, tmp.path()).await.unwrap();
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_bucket_mirrors_every_blob() {
        let tmp = TempDir::new().unwrap();

        let mut provider = MockStorageProvider::new();
        provider.expect_list_blobs().times(1).returning(|bucket, _| {
            Ok(BlobPage {
                blobs: vec![
                    BlobHandle::named(bucket, "a/one.txt"),
                    BlobHandle::named(bucket, "two.txt"),
                ],
                next_page_token: None,
            })
        });
        provider
            .expect_get_object()
            .times(2)
            .returning(|_, key, _| Ok(key.as_bytes().to_vec()));

        let facade = StorageFacade::new(provider);
        let bucket = BucketHandle::named("data-lake");
        facade.download_bucket(&bucket, tmp.path()).await.unwrap();

        assert_eq!(
            std::fs::read(tmp.path().join("a/one.txt")).unwrap(),
            b"a/one.txt"
        );
        assert_eq!(std::fs::read(tmp.path().join("two.txt")).unwrap(), b"two.txt");
    }

    #[tokio::test]
    async fn test_download_bucket_missing_folder_no_listing() {
        let mut provider = MockStorageProvider::new();
        provider.expect_list_blobs().times(0);

        let facade = StorageFacade::new(provider);
        let bucket = BucketHandle::named("data-lake");
        let err = facade
            .download_bucket(&bucket, Path::new("/nonexistent/folder"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_metadata_projections_through_facade() {
        let provider = MockStorageProvider::new();
        let facade = StorageFacade::new(provider);

        let bucket = bucket_with_labels("data-lake", labels(&[("env", "prod")]));
        let meta = facade.bucket_metadata(&bucket);
        assert_eq!(meta, facade.bucket_metadata(&bucket));
        assert_eq!(meta.name, "data-lake");

        let blob = BlobHandle::named("data-lake", "raw/events.csv");
        let meta = facade.blob_metadata(&blob);
        assert_eq!(meta.bucket_name, "data-lake");
        assert_eq!(meta, facade.blob_metadata(&blob));
    }

    #[test]
    fn test_local_target_split() {
        let base = Path::new("/tmp/out");
        let (dir, leaf) = local_target(base, "a/b/c.txt");
        assert_eq!(dir, PathBuf::from("/tmp/out/a/b"));
        assert_eq!(leaf, "c.txt");

        let (dir, leaf) = local_target(base, "c.txt");
        assert_eq!(dir, PathBuf::from("/tmp/out"));
        assert_eq!(leaf, "c.txt");
    }
}
