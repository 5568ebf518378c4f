//! stat command - Show bucket or blob metadata
//!
//! Projects a bucket or blob into its fixed metadata record and prints it.
//! Given `alias/bucket` the bucket record is shown; given `alias/bucket/key`
//! the blob record is shown.

use clap::Args;

use crate::commands::{connect, report};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Show bucket or blob metadata
#[derive(Args, Debug)]
pub struct StatArgs {
    /// Remote path (alias/bucket or alias/bucket/key)
    pub path: String,
}

/// Execute the stat command
pub async fn execute(args: StatArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let (alias_name, bucket, key) = match parse_stat_path(&args.path) {
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
        Err(e) => return report(&formatter, &format!("Failed to stat '{}'", args.path), &e),
    };

    match key {
        None => {
            let meta = facade.bucket_metadata(&handle);
            formatter.json(&meta);
            ExitCode::Success
        }
        Some(key) => match facade.get_blob(&handle, &key).await {
            Ok(blob) => {
                let meta = facade.blob_metadata(&blob);
                formatter.json(&meta);
                ExitCode::Success
            }
            Err(e) => report(&formatter, &format!("Failed to stat '{}'", args.path), &e),
        },
    }
}

/// Parse stat path into (alias, bucket, key)
fn parse_stat_path(path: &str) -> Result<(String, String, Option<String>), String> {
    let path = path.trim_end_matches('/');

    if path.is_empty() {
        return Err("Path cannot be empty".to_string());
    }

    let parts: Vec<&str> = path.splitn(3, '/').collect();

    if parts.len() < 2 || parts[1].is_empty() {
        return Err(format!(
            "Invalid path format: '{path}'. Expected: alias/bucket[/key]"
        ));
    }

    let alias = parts[0].to_string();
    let bucket = parts[1].to_string();
    let key = parts.get(2).map(|k| k.to_string());

    Ok((alias, bucket, key))
}
