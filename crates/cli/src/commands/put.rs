//! put command - Upload a local file
//!
//! Uploads a single local file to a bucket. The content type is derived
//! from the file extension and the bucket's default storage class is
//! applied to the new blob.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::commands::{connect, report};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Upload a local file to a bucket
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local file to upload
    pub source: PathBuf,

    /// Destination path (alias/bucket/key)
    pub destination: String,
}

#[derive(Debug, Serialize)]
struct PutOutput {
    status: &'static str,
    bucket: String,
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
}

/// Execute the put command
pub async fn execute(args: PutArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (alias_name, bucket, key) = match parse_put_path(&args.destination) {
        Ok(parsed) => parsed,
        Err(e) => {
            formatter.error(&e);
            return ExitCode::UsageError;
        }
    };

    if !args.source.is_file() {
        formatter.error(&format!(
            "Source file not found: {}",
            args.source.display()
        ));
        return ExitCode::UsageError;
    }

    let facade = match connect(&alias_name, &formatter).await {
        Ok(f) => f,
        Err(code) => return code,
    };

    let handle = match facade.get_bucket(&bucket).await {
        Ok(h) => h,
        Err(e) => return report(&formatter, "Failed to resolve bucket", &e),
    };

    match facade.upload_file(&handle, &key, &args.source).await {
        Ok(blob) => {
            if formatter.is_json() {
                formatter.json(&PutOutput {
                    status: "success",
                    bucket: bucket.clone(),
                    key: blob.name,
                    size_bytes: blob.size,
                    content_type: blob.content_type,
                });
            } else {
                formatter.success(&format!(
                    "Uploaded '{}' to '{alias_name}/{bucket}/{key}'.",
                    args.source.display()
                ));
            }
            ExitCode::Success
        }
        Err(e) => report(&formatter, "Upload failed", &e),
    }
}

/// Parse put destination path into (alias, bucket, key)
fn parse_put_path(path: &str) -> Result<(String, String, String), String> {
    let parts: Vec<&str> = path.splitn(3, '/').collect();

    if parts.len() != 3 || parts[1].is_empty() || parts[2].is_empty() {
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
