use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Resources declared under this name are local-only computation and are
/// never relocatable.
pub const SENTINEL_LOCAL: &str = "local";

/// Canonical resource record, flattened out of either state schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Resource {
    pub name: String,
    pub resource_type: String,
    /// Cloud-assigned identifier. Empty for resources not yet applied.
    pub id: String,
    /// Raw dependency references as recorded by the source state.
    pub depends_on: Option<Vec<String>>,
    /// Position of the containing entry in the origin file's resource list.
    pub source_index: usize,
}

impl Resource {
    pub fn address(&self, mode: AddressingMode) -> ResourceAddress {
        match mode {
            AddressingMode::ByName => ResourceAddress::by_name(self),
            AddressingMode::ById => ResourceAddress::by_id(self),
        }
    }
}

/// Which component of a resource forms its address key.
///
/// Discovery-time matching keys on the declared name; reconciliation-time
/// matching keys on the cloud-assigned id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    ByName,
    ById,
}

/// A `type.name` or `type.id` composite key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceAddress(String);

impl ResourceAddress {
    pub fn by_name(resource: &Resource) -> Self {
        Self(format!("{}.{}", resource.resource_type, resource.name))
    }

    pub fn by_id(resource: &Resource) -> Self {
        Self(format!("{}.{}", resource.resource_type, resource.id))
    }

    /// Builds an address from a raw reference string recorded in a state
    /// file (already in `type.name` form).
    pub fn from_raw(raw: &str) -> Self {
        Self(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the flat-schema parser treats resources carrying more than one
/// instance. `LastWins` reproduces the historical overwrite behavior;
/// `Expand` emits one record per instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultiInstancePolicy {
    #[default]
    LastWins,
    Expand,
}

/// Everything a reconciliation run needs, passed explicitly instead of
/// living in process-wide mutable statics.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Discovered (imported) state file; rewritten in place.
    pub discovery_state: PathBuf,
    /// Target repository state file; mutated only via `terraform state mv`.
    pub repo_state: PathBuf,
    /// Directory terraform commands run from.
    pub working_dir: PathBuf,
    pub terraform_bin: String,
    pub timeout: Duration,
    /// Provider source written into the generated provider file before
    /// init, e.g. `IBM-Cloud/ibm`. None skips the patch step.
    pub provider_source: Option<String>,
    pub multi_instance: MultiInstancePolicy,
    pub dry_run: bool,
}

impl MergeConfig {
    pub fn new(discovery_state: PathBuf, repo_state: PathBuf, working_dir: PathBuf) -> Self {
        Self {
            discovery_state,
            repo_state,
            working_dir,
            terraform_bin: "terraform".to_string(),
            timeout: Duration::from_secs(600),
            provider_source: None,
            multi_instance: MultiInstancePolicy::default(),
            dry_run: false,
        }
    }
}
