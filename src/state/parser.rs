use std::fs;
use std::path::Path;

use crate::error::MergeError;
use crate::resource::{AddressingMode, MultiInstancePolicy, Resource};

use super::index::StateIndex;
use super::schema::{FlatState, LegacyState};

/// State-file schema generation, distinguished by which top-level list the
/// document carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateSchema {
    /// TF 0.12: top-level `modules`.
    Legacy,
    /// TF 0.13+: top-level `resources`.
    Flat,
}

/// Reads a legacy (module-oriented) state file into a flat resource
/// sequence, discarding module boundaries. Module resource maps are
/// flattened in key order so repeated runs see the same sequence.
pub fn parse_legacy_state(path: &Path) -> Result<Vec<Resource>, MergeError> {
    let text = fs::read_to_string(path).map_err(|e| MergeError::io(path, e))?;
    let state: LegacyState =
        serde_json::from_str(&text).map_err(|e| MergeError::decode(path, e))?;

    let mut resources = Vec::new();
    for (source_index, module) in state.modules.iter().enumerate() {
        for (key, record) in &module.resources {
            // Legacy keys are `type.name`; the declared name is everything
            // after the first dot. Keys without a dot keep the whole key.
            let name = key.split_once('.').map_or(key.as_str(), |(_, n)| n);
            if record.resource_type.is_empty() || name.is_empty() {
                return Err(MergeError::schema(
                    path,
                    format!("resource '{key}' has an empty type or name"),
                ));
            }
            resources.push(Resource {
                name: name.to_string(),
                resource_type: record.resource_type.clone(),
                id: record.primary.attributes.id.clone(),
                depends_on: None,
                source_index,
            });
        }
    }

    tracing::info!(count = resources.len(), path = %path.display(), "parsed legacy state");
    Ok(resources)
}

/// Reads a flat (TF 0.13+) state file and indexes it under the given
/// addressing mode.
///
/// `policy` decides what happens to resources with more than one instance:
/// `LastWins` keeps only the final instance's id and dependency list (the
/// historical behavior), `Expand` emits one record per instance. All
/// records of one resource share its `source_index`, which addresses the
/// containing entry of the on-disk resource list.
pub fn parse_flat_state(
    path: &Path,
    mode: AddressingMode,
    policy: MultiInstancePolicy,
) -> Result<StateIndex, MergeError> {
    let text = fs::read_to_string(path).map_err(|e| MergeError::io(path, e))?;
    let state: FlatState =
        serde_json::from_str(&text).map_err(|e| MergeError::decode(path, e))?;

    let mut resources = Vec::new();
    for (source_index, entry) in state.resources.iter().enumerate() {
        if entry.resource_type.is_empty() || entry.name.is_empty() {
            return Err(MergeError::schema(
                path,
                format!("resource at index {source_index} has an empty type or name"),
            ));
        }

        let mut flattened = Resource {
            name: entry.name.clone(),
            resource_type: entry.resource_type.clone(),
            id: String::new(),
            depends_on: None,
            source_index,
        };

        for instance in &entry.instances {
            flattened.id = instance.attributes.id.clone();
            if instance.dependencies.is_some() {
                flattened.depends_on = instance.dependencies.clone();
            }
            if policy == MultiInstancePolicy::Expand {
                resources.push(flattened.clone());
            }
        }
        match policy {
            MultiInstancePolicy::LastWins => resources.push(flattened),
            // A zero-instance resource still takes a planning slot; its
            // empty id marks it as never reconciled.
            MultiInstancePolicy::Expand if entry.instances.is_empty() => {
                resources.push(flattened)
            }
            MultiInstancePolicy::Expand => {}
        }
    }

    let index = StateIndex::build(resources, mode);
    tracing::info!(count = index.len(), path = %path.display(), "parsed flat state");
    Ok(index)
}

/// Distinguishes the two schema generations by their top-level list.
pub fn detect_schema(path: &Path) -> Result<StateSchema, MergeError> {
    let text = fs::read_to_string(path).map_err(|e| MergeError::io(path, e))?;
    let doc: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| MergeError::decode(path, e))?;

    if doc.get("modules").is_some_and(|v| v.is_array()) {
        Ok(StateSchema::Legacy)
    } else if doc.get("resources").is_some_and(|v| v.is_array()) {
        Ok(StateSchema::Flat)
    } else {
        Err(MergeError::schema(
            path,
            "neither a top-level 'modules' nor 'resources' array",
        ))
    }
}
