//! tfmerge - Terraform state reconciliation
//!
//! A library for merging resources discovered by an automated import pass
//! into an existing repository's Terraform state, rewriting dependency
//! references and skipping resources the repository already manages.

pub mod cli;
pub mod error;
pub mod merge;
pub mod output;
pub mod release;
pub mod resource;
pub mod state;
pub mod terraform;

pub use error::MergeError;
pub use merge::{MergeReport, RelocationPlan, StateMover};
pub use release::{Release, ReleaseAsset, ReleaseClient, ReleaseError};
pub use resource::{
    AddressingMode, MergeConfig, MultiInstancePolicy, Resource, ResourceAddress,
};
pub use state::{StateIndex, StateSchema};
pub use terraform::TerraformCli;
