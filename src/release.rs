mod client;

pub use client::ReleaseClient;

use serde::Deserialize;
use thiserror::Error;

/// Errors from the release helper. Kept separate from `MergeError`:
/// fetching tool binaries is ancillary to reconciliation and never part of
/// a merge run.
#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("download failed for asset '{asset}': {message}")]
    Download { asset: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    pub zipball_url: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub id: u64,
    pub name: String,
    pub browser_download_url: String,
}
