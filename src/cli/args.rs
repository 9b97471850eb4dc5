use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::resource::{MergeConfig, MultiInstancePolicy};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge discovered resources into the repository state
    Merge(MergeArgs),
    /// List the resources recorded in a state file
    Inspect(InspectArgs),
    /// Fetch tool/provider binaries from GitHub releases
    Fetch(FetchArgs),
}

#[derive(clap::Args, Debug)]
pub struct MergeArgs {
    /// State file produced by the discovery/import pass
    #[arg(long)]
    pub discovery_state: PathBuf,

    /// Authoritative repository state file
    #[arg(long)]
    pub repo_state: PathBuf,

    /// Directory terraform commands run from
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    #[arg(long, default_value = "terraform")]
    pub terraform_bin: String,

    #[arg(long, default_value_t = 600)]
    pub timeout_secs: u64,

    /// Provider source to pin in the generated provider file, e.g. IBM-Cloud/ibm
    #[arg(long)]
    pub provider_source: Option<String>,

    /// Emit one record per instance instead of letting later instances win
    #[arg(long)]
    pub expand_instances: bool,

    /// Print the relocation plan without touching anything
    #[arg(long)]
    pub dry_run: bool,
}

impl MergeArgs {
    pub fn into_config(self) -> MergeConfig {
        MergeConfig {
            discovery_state: self.discovery_state,
            repo_state: self.repo_state,
            working_dir: self.dir,
            terraform_bin: self.terraform_bin,
            timeout: Duration::from_secs(self.timeout_secs),
            provider_source: self.provider_source,
            multi_instance: if self.expand_instances {
                MultiInstancePolicy::Expand
            } else {
                MultiInstancePolicy::LastWins
            },
            dry_run: self.dry_run,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// State file to inspect; schema generation is auto-detected
    pub state: PathBuf,

    /// Key the listing by cloud-assigned id instead of declared name
    #[arg(long)]
    pub by_id: bool,
}

#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    /// Repository in owner/name form
    #[arg(long)]
    pub repo: String,

    /// Release tag; latest when omitted
    #[arg(long)]
    pub tag: Option<String>,

    /// Download release assets instead of printing their URLs
    #[arg(long)]
    pub download: bool,

    /// Download directory; defaults to the user cache directory
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Maximum downloads in flight
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl FetchArgs {
    pub fn download_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tfmerge")
        })
    }
}
