//! mb command - Make bucket
//!
//! Creates a new bucket with a storage class and location on the specified
//! storage service.

use clap::Args;
use serde::Serialize;

use crate::commands::{connect, report};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Create a bucket
#[derive(Args, Debug)]
pub struct MbArgs {
    /// Target path (alias/bucket)
    pub target: String,

    /// Storage class for the bucket
    #[arg(long, default_value = "STANDARD")]
    pub class: String,

    /// Location for the bucket
    #[arg(long, default_value = "us-east-1")]
    pub location: String,

    /// Check the storage class locally before dispatching to the provider
    #[arg(long)]
    pub validate_class: bool,
}

#[derive(Debug, Serialize)]
struct MbOutput {
    status: &'static str,
    bucket: String,
    storage_class: String,
    location: String,
}

/// Execute the mb command
pub async fn execute(args: MbArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (alias_name, bucket) = match parse_mb_path(&args.target) {
        Ok(parsed) => parsed,
        Err(e) => {
            formatter.error(&e);
            return ExitCode::UsageError;
        }
    };

    let facade = match connect(&alias_name, &formatter).await {
        Ok(f) => f.validate_storage_class(args.validate_class),
        Err(code) => return code,
    };

    match facade
        .create_bucket(&bucket, &args.class, &args.location)
        .await
    {
        Ok(handle) => {
            if formatter.is_json() {
                formatter.json(&MbOutput {
                    status: "success",
                    bucket: handle.name,
                    storage_class: args.class,
                    location: args.location,
                });
            } else {
                formatter.success(&format!(
                    "Bucket '{alias_name}/{bucket}' created successfully."
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            let err_str = e.to_string();
            if err_str.contains("BucketAlreadyExists")
                || err_str.contains("BucketAlreadyOwnedByYou")
            {
                formatter.error(&format!("Bucket '{alias_name}/{bucket}' already exists"));
                ExitCode::Conflict
            } else if err_str.contains("AccessDenied") {
                formatter.error(&format!(
                    "Access denied: cannot create bucket '{alias_name}/{bucket}'"
                ));
                ExitCode::AuthError
            } else {
                report(&formatter, "Failed to create bucket", &e)
            }
        }
    }
}

/// Parse mb target path into (alias, bucket)
fn parse_mb_path(path: &str) -> Result<(String, String), String> {
    let path = path.trim_end_matches('/');

    if path.is_empty() {
        return Err("Path cannot be empty".to_string());
    }

    let parts: Vec<&str> = path.splitn(2, '/').collect();

    if parts.len() != 2 {
        return Err(format!(
            "Invalid path format: '{path}'. Expected: alias/bucket"
        ));
    }

    let alias = parts[0].to_string();
    let bucket = parts[1].to_string();

    if bucket.is_empty() {
        return Err("Bucket name cannot be empty".to_string());
    }

    // Basic bucket name validation
    if bucket.len() < 3 || bucket.len() > 63 {
        return Err("Bucket name must be between 3 and 63 characters".to_string());
    }

    Ok((alias, bucket))
}
