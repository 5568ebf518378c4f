//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the StorageProvider trait from sk-core.
//!
//! The mapping from S3 responses into the provider-agnostic handle types is
//! best-effort: bucket labels ride on bucket tagging, the default storage
//! class is advisory (recorded at create time and stamped onto uploads, S3
//! has no per-bucket class), and probes that an S3-compatible backend does
//! not support simply leave the corresponding handle fields empty.

use std::collections::BTreeMap;

use async_trait::async_trait;

use sk_core::{
    Alias, BlobHandle, BlobPage, BucketHandle, BucketRef, ByteRange, CorsRule, Error,
    IamConfiguration, Result, StorageProvider,
};

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    alias: Alias,
}

impl S3Client {
    /// Create a new S3 client from an alias configuration
    pub async fn new(alias: Alias) -> Result<Self> {
        let endpoint = alias.endpoint.clone();
        let region = alias.region.clone();
        let access_key = alias.access_key.clone();
        let secret_key = alias.secret_key.clone();

        // Build credentials provider
        let credentials = aws_credential_types::Credentials::new(
            access_key,
            secret_key,
            None, // session token
            None, // expiry
            "sk-static-credentials",
        );

        // Build SDK config
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(region))
            .endpoint_url(&endpoint)
            .load()
            .await;

        // Build S3 client with path-style addressing for compatibility
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(alias.bucket_lookup == "path" || alias.bucket_lookup == "auto")
            .build();

        let client = aws_sdk_s3::Client::from_conf(s3_config);

        Ok(Self {
            inner: client,
            alias,
        })
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }

    fn media_link(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/{bucket}/{key}",
            self.alias.endpoint.trim_end_matches('/')
        )
    }

    /// Fetch the bucket's label set from bucket tagging.
    ///
    /// `NoSuchTagSet` and unsupported-operation responses both read as an
    /// empty label set.
    async fn fetch_labels(&self, bucket: &str) -> BTreeMap<String, String> {
        match self.inner.get_bucket_tagging().bucket(bucket).send().await {
            Ok(response) => tags_to_labels(response.tag_set()),
            Err(e) => {
                tracing::debug!(bucket, error = %e, "bucket tagging unavailable");
                BTreeMap::new()
            }
        }
    }

    async fn fetch_location(&self, bucket: &str) -> Option<String> {
        match self
            .inner
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await
        {
            Ok(response) => {
                // An absent or empty constraint means us-east-1
                let constraint = response
                    .location_constraint()
                    .map(|c| c.as_str().to_string())
                    .filter(|c| !c.is_empty());
                Some(constraint.unwrap_or_else(|| "us-east-1".to_string()))
            }
            Err(e) => {
                tracing::debug!(bucket, error = %e, "bucket location unavailable");
                None
            }
        }
    }

    async fn fetch_versioning(&self, bucket: &str) -> Option<bool> {
        match self
            .inner
            .get_bucket_versioning()
            .bucket(bucket)
            .send()
            .await
        {
            Ok(response) => Some(matches!(
                response.status(),
                Some(aws_sdk_s3::types::BucketVersioningStatus::Enabled)
            )),
            Err(e) => {
                tracing::debug!(bucket, error = %e, "bucket versioning unavailable");
                None
            }
        }
    }

    async fn fetch_access_prevention(&self, bucket: &str) -> Option<String> {
        match self
            .inner
            .get_public_access_block()
            .bucket(bucket)
            .send()
            .await
        {
            Ok(response) => access_prevention(response.public_access_block_configuration()),
            Err(e) => {
                tracing::debug!(bucket, error = %e, "public access block unavailable");
                None
            }
        }
    }

    async fn fetch_cors(&self, bucket: &str) -> Vec<CorsRule> {
        match self.inner.get_bucket_cors().bucket(bucket).send().await {
            Ok(response) => response.cors_rules().iter().map(cors_rule).collect(),
            Err(e) => {
                tracing::debug!(bucket, error = %e, "bucket cors unavailable");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl StorageProvider for S3Client {
    async fn create_bucket(
        &self,
        name: &str,
        storage_class: &str,
        location: &str,
    ) -> Result<BucketHandle> {
        let mut request = self.inner.create_bucket().bucket(name);

        // us-east-1 must not be sent as a location constraint
        if location != "us-east-1" {
            let constraint = aws_sdk_s3::types::BucketLocationConstraint::from(location);
            let config = aws_sdk_s3::types::CreateBucketConfiguration::builder()
                .location_constraint(constraint)
                .build();
            request = request.create_bucket_configuration(config);
        }

        request
            .send()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;

        Ok(BucketHandle {
            name: name.to_string(),
            storage_class: Some(storage_class.to_string()),
            location: Some(location.to_string()),
            location_type: Some("region".to_string()),
            time_created: Some(jiff::Timestamp::now()),
            ..Default::default()
        })
    }

    async fn list_buckets(&self) -> Result<Vec<BucketHandle>> {
        let response = self
            .inner
            .list_buckets()
            .send()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;

        let buckets = response
            .buckets()
            .iter()
            .map(|b| {
                let mut handle = BucketHandle::named(b.name().unwrap_or_default());
                handle.time_created = b.creation_date().and_then(timestamp);
                handle
            })
            .collect();

        Ok(buckets)
    }

    async fn get_bucket(&self, name: &str) -> Result<BucketHandle> {
        self.inner
            .head_bucket()
            .bucket(name)
            .send()
            .await
            .map_err(|e| not_found_or_provider(e, format!("Bucket not found: {name}")))?;

        let location = self.fetch_location(name).await;
        let handle = BucketHandle {
            id: Some(name.to_string()),
            name: name.to_string(),
            location_type: location.as_ref().map(|_| "region".to_string()),
            location,
            cors: self.fetch_cors(name).await,
            iam_configuration: IamConfiguration {
                public_access_prevention: self.fetch_access_prevention(name).await,
            },
            self_link: Some(self.media_link(name, "").trim_end_matches('/').to_string()),
            versioning_enabled: self.fetch_versioning(name).await,
            labels: self.fetch_labels(name).await,
            ..Default::default()
        };

        Ok(handle)
    }

    async fn set_bucket_labels(
        &self,
        bucket: &str,
        labels: BTreeMap<String, String>,
    ) -> Result<BucketHandle> {
        if labels.is_empty() {
            self.inner
                .delete_bucket_tagging()
                .bucket(bucket)
                .send()
                .await
                .map_err(|e| {
                    not_found_or_provider(e, format!("Bucket not found: {bucket}"))
                })?;
        } else {
            let tagging = labels_to_tagging(&labels)?;
            self.inner
                .put_bucket_tagging()
                .bucket(bucket)
                .tagging(tagging)
                .send()
                .await
                .map_err(|e| {
                    not_found_or_provider(e, format!("Bucket not found: {bucket}"))
                })?;
        }

        self.get_bucket(bucket).await
    }

    async fn list_blobs(&self, bucket: &str, page_token: Option<String>) -> Result<BlobPage> {
        let mut request = self.inner.list_objects_v2().bucket(bucket);
        if let Some(token) = page_token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| not_found_or_provider(e, format!("Bucket not found: {bucket}")))?;

        let blobs = response
            .contents()
            .iter()
            .map(|object| {
                let key = object.key().unwrap_or_default();
                let mut blob = BlobHandle::named(bucket, key);
                blob.size = object.size();
                blob.updated = object.last_modified().and_then(timestamp);
                blob.etag = object.e_tag().map(trim_etag);
                blob.storage_class = object.storage_class().map(|sc| sc.as_str().to_string());
                blob.media_link = Some(self.media_link(bucket, key));
                blob
            })
            .collect();

        let next_page_token = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(|s| s.to_string())
        } else {
            None
        };

        Ok(BlobPage {
            blobs,
            next_page_token,
        })
    }

    async fn get_blob(&self, bucket: &str, name: &str) -> Result<BlobHandle> {
        let response = self
            .inner
            .head_object()
            .bucket(bucket)
            .key(name)
            .send()
            .await
            .map_err(|e| not_found_or_provider(e, format!("{bucket}/{name}")))?;

        let etag = response.e_tag().map(trim_etag);
        let blob = BlobHandle {
            id: Some(format!("{bucket}/{name}")),
            name: name.to_string(),
            bucket: BucketRef {
                name: bucket.to_string(),
            },
            storage_class: response.storage_class().map(|sc| sc.as_str().to_string()),
            size: response.content_length(),
            updated: response.last_modified().and_then(timestamp),
            md5_hash: etag.as_deref().and_then(md5_from_etag),
            etag,
            component_count: response.parts_count(),
            crc32c: response.checksum_crc32_c().map(|c| c.to_string()),
            cache_control: response.cache_control().map(|s| s.to_string()),
            content_type: response.content_type().map(|s| s.to_string()),
            content_disposition: response.content_disposition().map(|s| s.to_string()),
            content_encoding: response.content_encoding().map(|s| s.to_string()),
            content_language: response.content_language().map(|s| s.to_string()),
            metadata: response
                .metadata()
                .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default(),
            media_link: Some(self.media_link(bucket, name)),
            temporary_hold: response.object_lock_legal_hold_status().map(|status| {
                matches!(status, aws_sdk_s3::types::ObjectLockLegalHoldStatus::On)
            }),
            retention_expiration_time: response
                .object_lock_retain_until_date()
                .and_then(timestamp),
            ..Default::default()
        };

        Ok(blob)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
        storage_class: Option<String>,
    ) -> Result<BlobHandle> {
        let size = data.len() as i64;
        let body = aws_sdk_s3::primitives::ByteStream::from(data);

        let mut request = self.inner.put_object().bucket(bucket).key(key).body(body);

        if let Some(ct) = &content_type {
            request = request.content_type(ct);
        }
        // Unknown class strings pass through and the backend decides
        if let Some(class) = &storage_class {
            request = request.storage_class(aws_sdk_s3::types::StorageClass::from(class.as_str()));
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;

        let mut blob = BlobHandle::named(bucket, key);
        blob.size = Some(size);
        blob.etag = response.e_tag().map(trim_etag);
        blob.updated = Some(jiff::Timestamp::now());
        blob.content_type = content_type;
        blob.storage_class = storage_class;
        blob.media_link = Some(self.media_link(bucket, key));

        Ok(blob)
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        range: Option<ByteRange>,
    ) -> Result<Vec<u8>> {
        let mut request = self.inner.get_object().bucket(bucket).key(key);
        if let Some(range) = range {
            request = request.range(range.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|e| not_found_or_provider(e, format!("{bucket}/{key}")))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn delete_bucket(&self, name: &str) -> Result<()> {
        self.inner
            .delete_bucket()
            .bucket(name)
            .send()
            .await
            .map_err(|e| not_found_or_provider(e, format!("Bucket not found: {name}")))?;

        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| not_found_or_provider(e, format!("{bucket}/{key}")))?;

        Ok(())
    }
}

/// Map a remote failure to NotFound when the SDK error says so
fn not_found_or_provider(e: impl std::fmt::Display, target: String) -> Error {
    let err_str = e.to_string();
    if err_str.contains("NotFound")
        || err_str.contains("NoSuchKey")
        || err_str.contains("NoSuchBucket")
    {
        Error::NotFound(target)
    } else {
        Error::Provider(err_str)
    }
}

fn timestamp(t: &aws_sdk_s3::primitives::DateTime) -> Option<jiff::Timestamp> {
    jiff::Timestamp::from_second(t.secs()).ok()
}

fn trim_etag(etag: &str) -> String {
    etag.trim_matches('"').to_string()
}

/// Single-part uploads carry a plain MD5 as their etag; multipart etags
/// contain a part-count suffix and are not an MD5.
fn md5_from_etag(etag: &str) -> Option<String> {
    if !etag.is_empty() && !etag.contains('-') {
        Some(etag.to_string())
    } else {
        None
    }
}

fn tags_to_labels(tags: &[aws_sdk_s3::types::Tag]) -> BTreeMap<String, String> {
    tags.iter()
        .map(|tag| (tag.key().to_string(), tag.value().to_string()))
        .collect()
}

fn labels_to_tagging(labels: &BTreeMap<String, String>) -> Result<aws_sdk_s3::types::Tagging> {
    let tags = labels
        .iter()
        .map(|(k, v)| {
            aws_sdk_s3::types::Tag::builder()
                .key(k)
                .value(v)
                .build()
                .map_err(|e| Error::Provider(e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    aws_sdk_s3::types::Tagging::builder()
        .set_tag_set(Some(tags))
        .build()
        .map_err(|e| Error::Provider(e.to_string()))
}

fn cors_rule(rule: &aws_sdk_s3::types::CorsRule) -> CorsRule {
    CorsRule {
        origins: rule.allowed_origins().to_vec(),
        methods: rule.allowed_methods().to_vec(),
        response_headers: rule.expose_headers().to_vec(),
        max_age_seconds: rule.max_age_seconds(),
    }
}

fn access_prevention(
    config: Option<&aws_sdk_s3::types::PublicAccessBlockConfiguration>,
) -> Option<String> {
    let config = config?;
    let enforced = config.block_public_acls().unwrap_or(false)
        && config.ignore_public_acls().unwrap_or(false)
        && config.block_public_policy().unwrap_or(false)
        && config.restrict_public_buckets().unwrap_or(false);
    Some(if enforced { "enforced" } else { "inherited" }.to_string())
}
