//! get command - Download a blob
//!
//! Downloads a single blob into a local folder. The blob name is mirrored
//! as a relative path under the folder; `--range` limits the transfer to an
//! inclusive byte range and writes the slice directly to the leaf file.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::commands::{connect, report};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Download a blob to a local folder
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Remote path (alias/bucket/key)
    pub source: String,

    /// Existing local folder to download into
    pub folder: PathBuf,

    /// Inclusive byte range to fetch, as start-end (e.g. 0-1023)
    #[arg(long)]
    pub range: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetOutput {
    status: &'static str,
    blob: String,
    folder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<String>,
}

/// Execute the get command
pub async fn execute(args: GetArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (alias_name, bucket, key) = match parse_get_path(&args.source) {
        Ok(parsed) => parsed,
        Err(e) => {
            formatter.error(&e);
            return ExitCode::UsageError;
        }
    };

    let range = match args.range.as_deref().map(parse_range).transpose() {
        Ok(r) => r,
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

    let result = match range {
        Some((start, end)) => {
            let leaf = key.rsplit('/').next().unwrap_or(&key);
            let destination = args.folder.join(leaf);
            facade
                .download_blob_range(&handle, &key, &destination, start, end)
                .await
        }
        None => match facade.get_blob(&handle, &key).await {
            Ok(blob) => facade.download_blob(&blob, &args.folder).await,
            Err(e) => return report(&formatter, &format!("Failed to fetch '{}'", args.source), &e),
        },
    };

    match result {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&GetOutput {
                    status: "success",
                    blob: key,
                    folder: args.folder.display().to_string(),
                    range: args.range,
                });
            } else {
                formatter.success(&format!(
                    "Downloaded '{}' to '{}'.",
                    args.source,
                    args.folder.display()
                ));
            }
            ExitCode::Success
        }
        Err(e) => report(&formatter, "Download failed", &e),
    }
}

/// Parse get source path into (alias, bucket, key)
fn parse_get_path(path: &str) -> Result<(String, String, String), String> {
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

/// Parse a start-end byte range
fn parse_range(spec: &str) -> Result<(u64, u64), String> {
    let Some((start, end)) = spec.split_once('-') else {
        return Err(format!("Invalid range '{spec}'. Expected: start-end"));
    };

    let start: u64 = start
        .parse()
        .map_err(|_| format!("Invalid range start '{start}'"))?;
    let end: u64 = end
        .parse()
        .map_err(|_| format!("Invalid range end '{end}'"))?;

    if end < start {
        return Err(format!("Invalid range '{spec}'. End precedes start"));
    }

    Ok((start, end))
}
