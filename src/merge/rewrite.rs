//! Dependency rewriting.
//!
//! Before relocation, dependency references recorded by the discovery pass
//! must be repointed at the addresses those resources will have once the
//! target repository owns them: the target repo may know the same
//! underlying resource under a different declared name. The rewrite edits
//! the discovered state *document* at exact structural paths
//! (`resources[i].instances[0].dependencies[pos]`) so every field the
//! rewrite does not address is carried through untouched.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::MergeError;
use crate::resource::{AddressingMode, ResourceAddress};
use crate::state::StateIndex;

/// Rewrites dependency references in `doc` in place.
///
/// `discovered` must be keyed by name (references are recorded in
/// `type.name` form), `target` by id. Returns the number of references
/// actually changed. References that resolve to nothing — either unknown
/// to the discovered state (which is what an already-rewritten file looks
/// like on a re-run) or absent from the target — are left untouched.
pub fn rewrite_dependencies(
    doc: &mut Value,
    discovered: &StateIndex,
    target: &StateIndex,
) -> Result<usize, MergeError> {
    debug_assert_eq!(discovered.mode(), AddressingMode::ByName);
    debug_assert_eq!(target.mode(), AddressingMode::ById);

    let mut rewritten = 0;

    for resource in discovered.resources() {
        let Some(deps) = &resource.depends_on else {
            continue;
        };

        for (pos, raw) in deps.iter().enumerate() {
            let Some(dep) = discovered.get(&ResourceAddress::from_raw(raw)) else {
                tracing::debug!(reference = %raw, "reference not in discovered state, leaving as is");
                continue;
            };

            let Some(canonical) = target.get(&ResourceAddress::by_id(dep)) else {
                // Not managed by the target yet; it will move along with
                // its dependents under its current address.
                continue;
            };

            let new_ref = ResourceAddress::by_name(canonical);

            let Some(slot) = dependency_slot(doc, resource.source_index, pos) else {
                tracing::warn!(
                    index = resource.source_index,
                    pos,
                    "dependency slot missing from document, leaving as is"
                );
                continue;
            };

            // The document is the source of truth for what is already
            // written; the index may lag behind it on a re-run.
            if slot.as_str() == Some(new_ref.as_str()) {
                continue;
            }

            tracing::debug!(from = %raw, to = %new_ref, "rewrote dependency reference");
            *slot = Value::String(new_ref.as_str().to_string());
            rewritten += 1;
        }
    }

    Ok(rewritten)
}

fn dependency_slot(doc: &mut Value, source_index: usize, pos: usize) -> Option<&mut Value> {
    doc.get_mut("resources")?
        .get_mut(source_index)?
        .get_mut("instances")?
        .get_mut(0)?
        .get_mut("dependencies")?
        .get_mut(pos)
}

/// Rewrites the discovered state file on disk and returns how many
/// references changed. The file is only written back when something
/// actually changed, so a re-run over an already-rewritten file is a
/// byte-level no-op.
pub fn rewrite_state_file(
    path: &Path,
    discovered: &StateIndex,
    target: &StateIndex,
) -> Result<usize, MergeError> {
    let text = fs::read_to_string(path).map_err(|e| MergeError::io(path, e))?;
    let mut doc: Value = serde_json::from_str(&text).map_err(|e| MergeError::decode(path, e))?;

    let rewritten = rewrite_dependencies(&mut doc, discovered, target)?;
    if rewritten > 0 {
        let mut out = serde_json::to_string_pretty(&doc)
            .map_err(|e| MergeError::decode(path, e))?;
        out.push('\n');
        fs::write(path, out).map_err(|e| MergeError::io(path, e))?;
        tracing::info!(count = rewritten, path = %path.display(), "dependency references updated");
    }

    Ok(rewritten)
}
