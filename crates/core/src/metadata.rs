//! Metadata projection records
//!
//! [`BucketMetadata`] and [`BlobMetadata`] are immutable snapshots built
//! field-for-field from the corresponding handle. The mapping is explicit
//! and enumerated at compile time; there is no dynamic field lookup and no
//! write-back path. Projecting the same unchanged handle twice yields
//! field-for-field identical records.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::Serialize;

use crate::handle::{BlobHandle, BucketHandle, CorsRule};

/// Immutable snapshot of a bucket's descriptive attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketMetadata {
    pub id: Option<String>,
    pub name: String,
    pub storage_class: Option<String>,
    pub location: Option<String>,
    pub location_type: Option<String>,
    pub cors: Vec<CorsRule>,
    pub default_event_based_hold: Option<bool>,
    pub default_kms_key_name: Option<String>,
    pub metageneration: Option<i64>,
    /// Read from the nested IAM configuration sub-object
    pub public_access_prevention: Option<String>,
    pub retention_policy_effective_time: Option<Timestamp>,
    pub retention_period: Option<i64>,
    pub retention_policy_locked: Option<bool>,
    pub requester_pays: Option<bool>,
    pub self_link: Option<String>,
    pub time_created: Option<Timestamp>,
    pub versioning_enabled: Option<bool>,
    pub labels: BTreeMap<String, String>,
}

impl From<&BucketHandle> for BucketMetadata {
    fn from(bucket: &BucketHandle) -> Self {
        Self {
            id: bucket.id.clone(),
            name: bucket.name.clone(),
            storage_class: bucket.storage_class.clone(),
            location: bucket.location.clone(),
            location_type: bucket.location_type.clone(),
            cors: bucket.cors.clone(),
            default_event_based_hold: bucket.default_event_based_hold,
            default_kms_key_name: bucket.default_kms_key_name.clone(),
            metageneration: bucket.metageneration,
            public_access_prevention: bucket.iam_configuration.public_access_prevention.clone(),
            retention_policy_effective_time: bucket.retention_policy_effective_time,
            retention_period: bucket.retention_period,
            retention_policy_locked: bucket.retention_policy_locked,
            requester_pays: bucket.requester_pays,
            self_link: bucket.self_link.clone(),
            time_created: bucket.time_created,
            versioning_enabled: bucket.versioning_enabled,
            labels: bucket.labels.clone(),
        }
    }
}

/// Immutable snapshot of an object's descriptive attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlobMetadata {
    pub id: Option<String>,
    pub blob_name: String,
    /// Owning bucket name, read through the blob's back-reference
    pub bucket_name: String,
    pub storage_class: Option<String>,
    pub file_size: Option<i64>,
    pub updated: Option<Timestamp>,
    pub generation: Option<i64>,
    pub metageneration: Option<i64>,
    pub etag: Option<String>,
    pub owner: Option<String>,
    pub component_count: Option<i32>,
    pub crc32c: Option<String>,
    pub md5_hash: Option<String>,
    pub cache_control: Option<String>,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub content_encoding: Option<String>,
    pub content_language: Option<String>,
    pub metadata: BTreeMap<String, String>,
    pub media_link: Option<String>,
    pub custom_time: Option<Timestamp>,
    pub temporary_hold: Option<bool>,
    pub event_based_hold: Option<bool>,
    pub retention_expiration_time: Option<Timestamp>,
}

impl From<&BlobHandle> for BlobMetadata {
    fn from(blob: &BlobHandle) -> Self {
        Self {
            id: blob.id.clone(),
            blob_name: blob.name.clone(),
            bucket_name: blob.bucket.name.clone(),
            storage_class: blob.storage_class.clone(),
            file_size: blob.size,
            updated: blob.updated,
            generation: blob.generation,
            metageneration: blob.metageneration,
            etag: blob.etag.clone(),
            owner: blob.owner.clone(),
            component_count: blob.component_count,
            crc32c: blob.crc32c.clone(),
            md5_hash: blob.md5_hash.clone(),
            cache_control: blob.cache_control.clone(),
            content_type: blob.content_type.clone(),
            content_disposition: blob.content_disposition.clone(),
            content_encoding: blob.content_encoding.clone(),
            content_language: blob.content_language.clone(),
            metadata: blob.metadata.clone(),
            media_link: blob.media_link.clone(),
            custom_time: blob.custom_time,
            temporary_hold: blob.temporary_hold,
            event_based_hold: blob.event_based_hold,
            retention_expiration_time: blob.retention_expiration_time,
        }
    }
}
