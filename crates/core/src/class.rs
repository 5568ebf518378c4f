//! Storage class constants
//!
//! Storage classes are provider-defined tiers affecting cost, availability,
//! and retrieval latency. The facade forwards the class string to the
//! provider untouched; checking it against this set is opt-in, so by default
//! a bad class fails at the provider, not before dispatch.

use crate::error::{Error, Result};

/// The known storage class tiers, in descending availability order.
pub const STORAGE_CLASSES: [&str; 4] = ["STANDARD", "NEARLINE", "COLDLINE", "ARCHIVE"];

/// Check that `class` is one of [`STORAGE_CLASSES`].
///
/// Only called when the facade was built with storage-class validation
/// enabled.
pub fn validate_storage_class(class: &str) -> Result<()> {
    if STORAGE_CLASSES.contains(&class) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Unknown storage class '{class}'. Expected one of: {}",
            STORAGE_CLASSES.join(", ")
        )))
    }
}
