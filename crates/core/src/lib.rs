//! sk-core: Core library for the storkit storage facade
//!
//! This crate provides the provider-agnostic pieces of storkit:
//! - The [`StorageFacade`] over bucket and blob lifecycle operations
//! - The [`StorageProvider`] trait at the SDK boundary
//! - Handle and metadata-projection record types
//! - Label and storage-class validation
//! - Alias and configuration management
//!
//! It is independent of any specific storage SDK, allowing for easy testing
//! and potential future support for other backends.

pub mod alias;
pub mod class;
pub mod config;
pub mod error;
pub mod facade;
pub mod handle;
pub mod label;
pub mod metadata;
pub mod provider;

pub use alias::{Alias, AliasManager};
pub use class::STORAGE_CLASSES;
pub use config::{Config, ConfigManager};
pub use error::{Error, Result};
pub use facade::{BlobListing, StorageFacade};
pub use handle::{BlobHandle, BlobPage, BucketHandle, BucketRef, CorsRule, IamConfiguration};
pub use label::LABEL_RULES_MESSAGE;
pub use metadata::{BlobMetadata, BucketMetadata};
pub use provider::{ByteRange, StorageProvider};
