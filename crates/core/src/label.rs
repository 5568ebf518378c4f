//! Bucket label validation
//!
//! Labels are user-defined key/value tags attached to a bucket. Keys and
//! values are checked against a fixed character set before any remote call
//! is made. The label set is always replaced wholesale, never merged; that
//! contract lives in the facade, this module only owns the check.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Message surfaced verbatim on any label validation failure.
///
/// Note the documented rules are stricter than the check below enforces:
/// the check is a plain character-set test and does not require keys to
/// start with a lowercase letter, nor does it admit international
/// characters. The message is kept as-is for compatibility.
pub const LABEL_RULES_MESSAGE: &str = "Only hyphens (-), underscores (_), lowercase characters, \
and numbers are allowed. Keys must start with a lowercase character. International characters \
are allowed.";

/// Check whether every key and value contains only `[a-z0-9_-]`.
///
/// Implemented as strip-allowed-then-check-leftover: any character that
/// survives the strip fails the whole mapping.
pub fn validate_labels(labels: &BTreeMap<String, String>) -> Result<()> {
    for (key, value) in labels {
        if has_disallowed_chars(key) || has_disallowed_chars(value) {
            return Err(Error::Validation(LABEL_RULES_MESSAGE.to_string()));
        }
    }
    Ok(())
}

fn has_disallowed_chars(s: &str) -> bool {
    let leftover: String = s
        .chars()
        .filter(|c| !matches!(c, 'a'..='z' | '0'..='9' | '_' | '-'))
        .collect();
    !leftover.is_empty()
}
