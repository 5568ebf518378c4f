//! CLI command definitions and execution
//!
//! This module contains all CLI commands and their implementations.
//! Commands are organized by functionality; every storage command resolves
//! an alias, builds an S3 client, and drives the storage facade.

use clap::{Parser, Subcommand};

use sk_core::{AliasManager, StorageFacade};
use sk_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod alias;
mod completions;
mod get;
mod label;
mod ls;
mod mb;
mod pull;
mod put;
mod rb;
mod rm;
mod stat;

/// sk - storage facade CLI
///
/// A command-line interface for S3-compatible object storage: bucket and
/// blob CRUD, metadata, labels, and file transfer.
#[derive(Parser, Debug)]
#[command(name = "sk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage storage service aliases
    #[command(subcommand)]
    Alias(alias::AliasCommands),

    /// List buckets or blobs
    Ls(ls::LsArgs),

    /// Create a bucket
    Mb(mb::MbArgs),

    /// Remove a bucket
    Rb(rb::RbArgs),

    /// Show bucket or blob metadata
    Stat(stat::StatArgs),

    /// Manage bucket labels
    #[command(subcommand)]
    Label(label::LabelCommands),

    /// Upload a local file to a bucket
    Put(put::PutArgs),

    /// Download a blob to a local folder
    Get(get::GetArgs),

    /// Download every blob in a bucket
    Pull(pull::PullArgs),

    /// Remove a blob
    Rm(rm::RmArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Alias(cmd) => alias::execute(cmd, output_config).await,
        Commands::Ls(args) => ls::execute(args, output_config).await,
        Commands::Mb(args) => mb::execute(args, output_config).await,
        Commands::Rb(args) => rb::execute(args, output_config).await,
        Commands::Stat(args) => stat::execute(args, output_config).await,
        Commands::Label(cmd) => label::execute(cmd, output_config).await,
        Commands::Put(args) => put::execute(args, output_config).await,
        Commands::Get(args) => get::execute(args, output_config).await,
        Commands::Pull(args) => pull::execute(args, output_config).await,
        Commands::Rm(args) => rm::execute(args, output_config).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Resolve an alias and build a facade around an S3 client
pub(crate) async fn connect(
    alias_name: &str,
    formatter: &Formatter,
) -> Result<StorageFacade<S3Client>, ExitCode> {
    let alias_manager = match AliasManager::new() {
        Ok(am) => am,
        Err(e) => {
            formatter.error(&format!("Failed to load aliases: {e}"));
            return Err(ExitCode::GeneralError);
        }
    };

    let alias = match alias_manager.get(alias_name) {
        Ok(a) => a,
        Err(_) => {
            formatter.error(&format!("Alias '{alias_name}' not found"));
            return Err(ExitCode::NotFound);
        }
    };

    match S3Client::new(alias).await {
        Ok(client) => Ok(StorageFacade::new(client)),
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            Err(ExitCode::ProviderError)
        }
    }
}

/// Report a facade error and map it to an exit code
pub(crate) fn report(formatter: &Formatter, context: &str, error: &sk_core::Error) -> ExitCode {
    formatter.error(&format!("{context}: {error}"));
    ExitCode::from_error(error)
}
