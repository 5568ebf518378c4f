//! Provider handle types
//!
//! Handles are well-typed snapshots of provider responses for buckets and
//! blobs. The facade never writes into a handle; every mutation goes back
//! through the [`StorageProvider`](crate::provider::StorageProvider) trait,
//! which returns a refreshed handle.
//!
//! Most fields are optional: list responses yield light handles, while a
//! direct get fills in everything the backend reports.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A single CORS rule attached to a bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorsRule {
    #[serde(default)]
    pub origins: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub response_headers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age_seconds: Option<i32>,
}

/// Access-control sub-object of a bucket response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IamConfiguration {
    /// Public-access-prevention mode, e.g. "enforced" or "inherited"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_access_prevention: Option<String>,
}

/// Snapshot of a bucket as reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketHandle {
    /// Provider-assigned identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Bucket name
    pub name: String,

    /// Default storage class for new objects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,

    /// Region or multi-region the bucket lives in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Location type, e.g. "region" or "multi-region"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,

    /// CORS rules configured on the bucket
    #[serde(default)]
    pub cors: Vec<CorsRule>,

    /// Whether new objects get an event-based hold by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_event_based_hold: Option<bool>,

    /// Default KMS key applied to new objects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_kms_key_name: Option<String>,

    /// Metadata generation counter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metageneration: Option<i64>,

    /// Access-control sub-object
    #[serde(default)]
    pub iam_configuration: IamConfiguration,

    /// When the current retention policy became effective
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_policy_effective_time: Option<Timestamp>,

    /// Retention period in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_period: Option<i64>,

    /// Whether the retention policy is locked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_policy_locked: Option<bool>,

    /// Whether the requester pays for access
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_pays: Option<bool>,

    /// Canonical link to the bucket resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,

    /// Creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_created: Option<Timestamp>,

    /// Whether object versioning is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versioning_enabled: Option<bool>,

    /// User-defined labels
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl BucketHandle {
    /// Create a minimal handle carrying only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Back-reference from a blob to its owning bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

/// Snapshot of a stored object as reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlobHandle {
    /// Provider-assigned identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Object name; `/`-separated segments carry directory semantics
    pub name: String,

    /// Owning bucket
    pub bucket: BucketRef,

    /// Storage class of this object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,

    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,

    /// Last update time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<Timestamp>,

    /// Data generation counter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<i64>,

    /// Metadata generation counter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metageneration: Option<i64>,

    /// ETag (usually MD5 for single-part uploads)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Object owner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Number of components for composite objects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_count: Option<i32>,

    /// CRC32C checksum
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crc32c: Option<String>,

    /// MD5 hash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5_hash: Option<String>,

    /// Cache-Control header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<String>,

    /// Content-Type header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Content-Disposition header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_disposition: Option<String>,

    /// Content-Encoding header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,

    /// Content-Language header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_language: Option<String>,

    /// User-defined object metadata
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    /// Direct download link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_link: Option<String>,

    /// User-set custom timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_time: Option<Timestamp>,

    /// Temporary hold flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_hold: Option<bool>,

    /// Event-based hold flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_based_hold: Option<bool>,

    /// When the retention period expires for this object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_expiration_time: Option<Timestamp>,
}

impl BlobHandle {
    /// Create a minimal handle carrying only the object name and bucket
    pub fn named(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bucket: BucketRef {
                name: bucket.into(),
            },
            ..Default::default()
        }
    }
}

/// One page of a blob listing
#[derive(Debug, Clone, Default)]
pub struct BlobPage {
    /// Blob handles in this page, in provider response order
    pub blobs: Vec<BlobHandle>,

    /// Token for the next page, absent on the last page
    pub next_page_token: Option<String>,
}
