//! rb command - Remove bucket
//!
//! Removes a bucket from the specified storage service. The bucket must be
//! empty; use `--force` to delete every blob first.

use clap::Args;
use serde::Serialize;

use crate::commands::{connect, report};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Remove a bucket
#[derive(Args, Debug)]
pub struct RbArgs {
    /// Target path (alias/bucket)
    pub target: String,

    /// Delete all blobs in the bucket before removing it
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct RbOutput {
    status: &'static str,
    bucket: String,
    blobs_removed: usize,
}

/// Execute the rb command
pub async fn execute(args: RbArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (alias_name, bucket) = match parse_rb_path(&args.target) {
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

    let mut blobs_removed = 0usize;
    if args.force {
        let handle = match facade.get_bucket(&bucket).await {
            Ok(h) => h,
            Err(e) => return report(&formatter, "Failed to resolve bucket", &e),
        };

        let mut listing = facade.list_blobs(&bucket);
        loop {
            match listing.next().await {
                Ok(Some(blob)) => {
                    if let Err(e) = facade.delete_object(&handle, &blob.name).await {
                        return report(&formatter, "Failed to delete blob", &e);
                    }
                    blobs_removed += 1;
                }
                Ok(None) => break,
                Err(e) => return report(&formatter, "Failed to list blobs", &e),
            }
        }
    }

    match facade.delete_bucket(&bucket).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&RbOutput {
                    status: "success",
                    bucket: format!("{alias_name}/{bucket}"),
                    blobs_removed,
                });
            } else {
                formatter.success(&format!("Bucket '{alias_name}/{bucket}' removed."));
            }
            ExitCode::Success
        }
        Err(e) => {
            let err_str = e.to_string();
            if err_str.contains("BucketNotEmpty") {
                formatter.error(&format!(
                    "Bucket '{alias_name}/{bucket}' is not empty. Use --force to delete its blobs first."
                ));
                ExitCode::Conflict
            } else {
                report(&formatter, "Failed to remove bucket", &e)
            }
        }
    }
}

/// Parse rb target path into (alias, bucket)
fn parse_rb_path(path: &str) -> Result<(String, String), String> {
    let path = path.trim_end_matches('/');

    if path.is_empty() {
        return Err("Path cannot be empty".to_string());
    }

    let parts: Vec<&str> = path.splitn(2, '/').collect();

    if parts.len() != 2 || parts[1].is_empty() {
        return Err(format!(
            "Invalid path format: '{path}'. Expected: alias/bucket"
        ));
    }

    Ok((parts[0].to_string(), parts[1].to_string()))
}
