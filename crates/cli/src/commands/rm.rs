//! rm command - Remove blobs
//!
//! Removes one or more blobs from a bucket.

use clap::Args;
use serde::Serialize;

use crate::commands::{connect, report};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Remove blobs
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Blob path(s) to remove (alias/bucket/key)
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    status: &'static str,
    deleted: Vec<String>,
    total: usize,
}

/// Execute the rm command
pub async fn execute(args: RmArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let mut deleted = Vec::new();

    for path in &args.paths {
        let (alias_name, bucket, key) = match parse_rm_path(path) {
            Ok(parsed) => parsed,
            Err(e) => {
                formatter.error(&e);
                return ExitCode::UsageError;
            }
        };

        let facade = match connect(&alias_name, &formatter).await {
            Ok(f) => f,
            Err(code) => return code,
        };

        let handle = match facade.get_bucket(&bucket).await {
            Ok(h) => h,
            Err(e) => return report(&formatter, "Failed to resolve bucket", &e),
        };

        match facade.delete_object(&handle, &key).await {
            Ok(()) => {
                formatter.success(&format!("Removed '{path}'."));
                deleted.push(path.clone());
            }
            Err(e) => return report(&formatter, &format!("Failed to remove '{path}'"), &e),
        }
    }

    if formatter.is_json() {
        let total = deleted.len();
        formatter.json(&RmOutput {
            status: "success",
            deleted,
            total,
        });
    }

    ExitCode::Success
}

/// Parse rm path into (alias, bucket, key)
fn parse_rm_path(path: &str) -> Result<(String, String, String), String> {
    let parts: Vec<&str> = path.splitn(3, '/').collect();

    if parts.len() != 3 || parts[2].is_empty() {
        return Err(format!(
            "Invalid path format: '{path}'. Expected: alias/bucket/key"
        ));
    }

    Ok((
        parts[0].to_string(),
        parts[1].to_string(),
        parts[2].to_string(),
    ))
}
