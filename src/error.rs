use std::path::PathBuf;

use thiserror::Error;

/// Errors fatal to a reconciliation run.
///
/// There is no partial-success mode: the caller either completes the full
/// pipeline or aborts with an error attributable to a stage and, where it
/// applies, a resource address.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode state file {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Structurally valid JSON that is not a usable state file (neither
    /// schema generation, or a resource violating the non-empty
    /// type/name invariant).
    #[error("state schema error in {}: {message}", .path.display())]
    Schema { path: PathBuf, message: String },

    #[error("terraform {operation} failed{}: {message}", match .address {
        Some(a) => format!(" for {a}"),
        None => String::new(),
    })]
    ExternalTool {
        operation: String,
        address: Option<String>,
        message: String,
    },
}

impl MergeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn decode(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    pub fn schema(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            message: message.into(),
        }
    }
}
