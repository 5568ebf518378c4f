//! ls command - List buckets and blobs
//!
//! Lists buckets when given an alias only, or lists blobs when given a
//! bucket path.

use clap::Args;
use serde::Serialize;

use sk_core::{BlobHandle, StorageFacade};
use sk_s3::S3Client;

use crate::commands::{connect, report};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// List buckets or blobs
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Remote path (alias or alias/bucket)
    pub path: String,

    /// Summarize output (show totals)
    #[arg(long)]
    pub summarize: bool,
}

/// Output structure for ls on a bucket (JSON format)
#[derive(Debug, Serialize)]
struct LsBlobsOutput {
    blobs: Vec<BlobEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
struct BlobEntry {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage_class: Option<String>,
}

#[derive(Debug, Serialize)]
struct LsBucketsOutput {
    buckets: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Summary {
    total_blobs: usize,
    total_size_bytes: i64,
    total_size_human: String,
}

/// Execute the ls command
pub async fn execute(args: LsArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (alias_name, bucket) = match parse_ls_path(&args.path) {
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

    match bucket {
        None => list_buckets(&facade, &formatter).await,
        Some(bucket) => list_blobs(&facade, &bucket, &args, &formatter).await,
    }
}

async fn list_buckets(
    facade: &StorageFacade<S3Client>,
    formatter: &Formatter,
) -> ExitCode {
    match facade.list_buckets().await {
        Ok(buckets) => {
            if formatter.is_json() {
                formatter.json(&LsBucketsOutput { buckets });
            } else {
                for name in &buckets {
                    formatter.println(&format!("{name}/"));
                }
            }
            ExitCode::Success
        }
        Err(e) => report(formatter, "Failed to list buckets", &e),
    }
}

async fn list_blobs(
    facade: &StorageFacade<S3Client>,
    bucket: &str,
    args: &LsArgs,
    formatter: &Formatter,
) -> ExitCode {
    let mut listing = facade.list_blobs(bucket);
    let mut entries = Vec::new();

    loop {
        match listing.next().await {
            Ok(Some(blob)) => entries.push(blob_entry(&blob)),
            Ok(None) => break,
            Err(e) => return report(formatter, "Failed to list blobs", &e),
        }
    }

    let total_blobs = entries.len();
    let total_size: i64 = entries.iter().filter_map(|b| b.size_bytes).sum();

    if formatter.is_json() {
        let output = LsBlobsOutput {
            blobs: entries,
            summary: args.summarize.then(|| Summary {
                total_blobs,
                total_size_bytes: total_size,
                total_size_human: humansize::format_size(total_size as u64, humansize::BINARY),
            }),
        };
        formatter.json(&output);
    } else {
        for entry in &entries {
            let date = entry
                .updated
                .clone()
                .unwrap_or_else(|| "                   ".to_string());
            let size = entry
                .size_bytes
                .map(|s| humansize::format_size(s as u64, humansize::BINARY))
                .unwrap_or_else(|| "0 B".to_string());
            formatter.println(&format!("[{date}] {size:>9} {}", entry.name));
        }

        if args.summarize {
            formatter.println(&format!(
                "\nTotal: {} blobs, {}",
                total_blobs,
                humansize::format_size(total_size as u64, humansize::BINARY)
            ));
        }
    }

    ExitCode::Success
}

fn blob_entry(blob: &BlobHandle) -> BlobEntry {
    BlobEntry {
        name: blob.name.clone(),
        size_bytes: blob.size,
        updated: blob
            .updated
            .map(|t| t.strftime("%Y-%m-%d %H:%M:%S").to_string()),
        storage_class: blob.storage_class.clone(),
    }
}

/// Parse ls path into (alias, bucket)
fn parse_ls_path(path: &str) -> Result<(String, Option<String>), String> {
    let path = path.trim_end_matches('/');

    if path.is_empty() {
        return Err("Path cannot be empty".to_string());
    }

    let parts: Vec<&str> = path.splitn(2, '/').collect();

    match parts.len() {
        1 => Ok((parts[0].to_string(), None)),
        2 => Ok((parts[0].to_string(), Some(parts[1].to_string()))),
        _ => Err(format!("Invalid path format: {path}")),
    }
}
