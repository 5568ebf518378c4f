//! label command - Manage bucket labels
//!
//! Labels are small key/value annotations stored on a bucket. Keys and
//! values are restricted to lowercase letters, digits, hyphens, and
//! underscores; the restriction is checked locally before any remote call.

use std::collections::BTreeMap;

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::commands::{connect, report};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Label management commands
#[derive(Subcommand, Debug)]
pub enum LabelCommands {
    /// Add or update labels on a bucket
    Set(SetArgs),

    /// List the labels on a bucket
    List(ListArgs),

    /// Remove all labels from a bucket
    Clear(ClearArgs),
}

/// Arguments for label set
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Target path (alias/bucket)
    pub target: String,

    /// Labels as key=value pairs
    #[arg(required = true)]
    pub labels: Vec<String>,
}

/// Arguments for label list
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Target path (alias/bucket)
    pub target: String,
}

/// Arguments for label clear
#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Target path (alias/bucket)
    pub target: String,
}

#[derive(Debug, Serialize)]
struct LabelOutput {
    status: &'static str,
    bucket: String,
    labels: BTreeMap<String, String>,
}

/// Execute a label command
pub async fn execute(cmd: LabelCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    match cmd {
        LabelCommands::Set(args) => set_labels(args, &formatter).await,
        LabelCommands::List(args) => list_labels(args, &formatter).await,
        LabelCommands::Clear(args) => clear_labels(args, &formatter).await,
    }
}

async fn set_labels(args: SetArgs, formatter: &Formatter) -> ExitCode {
    let (alias_name, bucket) = match parse_label_path(&args.target) {
        Ok(parsed) => parsed,
        Err(e) => {
            formatter.error(&e);
            return ExitCode::UsageError;
        }
    };

    let labels = match parse_label_pairs(&args.labels) {
        Ok(labels) => labels,
        Err(e) => {
            formatter.error(&e);
            return ExitCode::UsageError;
        }
    };

    let facade = match connect(&alias_name, formatter).await {
        Ok(f) => f,
        Err(code) => return code,
    };

    let handle = match facade.get_bucket(&bucket).await {
        Ok(h) => h,
        Err(e) => return report(formatter, "Failed to resolve bucket", &e),
    };

    match facade.add_bucket_labels(&handle, labels).await {
        Ok(updated) => {
            if formatter.is_json() {
                formatter.json(&LabelOutput {
                    status: "success",
                    bucket: updated.name,
                    labels: updated.labels,
                });
            } else {
                formatter.success(&format!(
                    "Labels updated on '{alias_name}/{bucket}' ({} total).",
                    updated.labels.len()
                ));
            }
            ExitCode::Success
        }
        Err(e) => report(formatter, "Failed to set labels", &e),
    }
}

async fn list_labels(args: ListArgs, formatter: &Formatter) -> ExitCode {
    let (alias_name, bucket) = match parse_label_path(&args.target) {
        Ok(parsed) => parsed,
        Err(e) => {
            formatter.error(&e);
            return ExitCode::UsageError;
        }
    };

    let facade = match connect(&alias_name, formatter).await {
        Ok(f) => f,
        Err(code) => return code,
    };

    match facade.get_bucket(&bucket).await {
        Ok(handle) => {
            if formatter.is_json() {
                formatter.json(&handle.labels);
            } else if handle.labels.is_empty() {
                formatter.println(&format!("No labels on '{alias_name}/{bucket}'."));
            } else {
                for (key, value) in &handle.labels {
                    formatter.println(&format!("{key}={value}"));
                }
            }
            ExitCode::Success
        }
        Err(e) => report(formatter, "Failed to resolve bucket", &e),
    }
}

async fn clear_labels(args: ClearArgs, formatter: &Formatter) -> ExitCode {
    let (alias_name, bucket) = match parse_label_path(&args.target) {
        Ok(parsed) => parsed,
        Err(e) => {
            formatter.error(&e);
            return ExitCode::UsageError;
        }
    };

    let facade = match connect(&alias_name, formatter).await {
        Ok(f) => f,
        Err(code) => return code,
    };

    let handle = match facade.get_bucket(&bucket).await {
        Ok(h) => h,
        Err(e) => return report(formatter, "Failed to resolve bucket", &e),
    };

    match facade.delete_bucket_labels(&handle).await {
        Ok(updated) => {
            if formatter.is_json() {
                formatter.json(&LabelOutput {
                    status: "success",
                    bucket: updated.name,
                    labels: updated.labels,
                });
            } else {
                formatter.success(&format!("Labels cleared on '{alias_name}/{bucket}'."));
            }
            ExitCode::Success
        }
        Err(e) => report(formatter, "Failed to clear labels", &e),
    }
}

/// Parse label target path into (alias, bucket)
fn parse_label_path(path: &str) -> Result<(String, String), String> {
    let path = path.trim_end_matches('/');

    let parts: Vec<&str> = path.splitn(2, '/').collect();

    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(format!(
            "Invalid path format: '{path}'. Expected: alias/bucket"
        ));
    }

    Ok((parts[0].to_string(), parts[1].to_string()))
}

/// Parse key=value pairs into a label map
fn parse_label_pairs(pairs: &[String]) -> Result<BTreeMap<String, String>, String> {
    let mut labels = BTreeMap::new();

    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(format!("Invalid label '{pair}'. Expected: key=value"));
        };
        if key.is_empty() {
            return Err(format!("Invalid label '{pair}'. Key cannot be empty"));
        }
        labels.insert(key.to_string(), value.to_string());
    }

    Ok(labels)
}
