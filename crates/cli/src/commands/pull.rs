//! pull command - Download every blob in a bucket
//!
//! Mirrors a whole bucket into a local folder. A single failed transfer
//! aborts the run.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::commands::{connect, report};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Download every blob in a bucket
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Remote path (alias/bucket)
    pub source: String,

    /// Existing local folder to download into
    pub folder: PathBuf,
}

#[derive(Debug, Serialize)]
struct PullOutput {
    status: &'static str,
    bucket: String,
    folder: String,
}

/// Execute the pull command
pub async fn execute(args: PullArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (alias_name, bucket) = match parse_pull_path(&args.source) {
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

    match facade.download_bucket(&handle, &args.folder).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&PullOutput {
                    status: "success",
                    bucket: format!("{alias_name}/{bucket}"),
                    folder: args.folder.display().to_string(),
                });
            } else {
                formatter.success(&format!(
                    "Bucket '{alias_name}/{bucket}' downloaded to '{}'.",
                    args.folder.display()
                ));
            }
            ExitCode::Success
        }
        Err(e) => report(&formatter, "Download failed", &e),
    }
}

/// Parse pull source path into (alias, bucket)
fn parse_pull_path(path: &str) -> Result<(String, String), String> {
    let path = path.trim_end_matches('/');

    let parts: Vec<&str> = path.splitn(2, '/').collect();

    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(format!(
            "Invalid path format: '{path}'. Expected: alias/bucket"
        ));
    }

    Ok((parts[0].to_string(), parts[1].to_string()))
}
