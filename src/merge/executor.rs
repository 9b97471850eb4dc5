use std::path::Path;

use async_trait::async_trait;

use crate::error::MergeError;

use super::planner::RelocationPlan;

/// Seam over the external state-move primitive.
///
/// Relocation changes only which state file stores a resource, never its
/// identity, so source and destination addresses are always the same.
#[async_trait]
pub trait StateMover: Send + Sync {
    async fn move_resource(
        &self,
        source_state: &Path,
        dest_state: &Path,
        source_address: &str,
        dest_address: &str,
    ) -> Result<(), MergeError>;
}

/// Drives the mover for each planned address, fail-fast: the first failure
/// aborts the remaining relocations. Returns the number of resources
/// moved; an empty plan returns zero without invoking the mover.
pub async fn execute(
    plan: &RelocationPlan,
    mover: &dyn StateMover,
    source_state: &Path,
    dest_state: &Path,
) -> Result<usize, MergeError> {
    if plan.is_empty() {
        tracing::info!(
            source = %source_state.display(),
            dest = %dest_state.display(),
            "no resources to move"
        );
        return Ok(0);
    }

    let mut moved = 0;
    for address in &plan.moves {
        mover
            .move_resource(source_state, dest_state, address.as_str(), address.as_str())
            .await?;
        moved += 1;
        tracing::debug!(address = %address, "resource moved");
    }

    tracing::info!(
        count = moved,
        source = %source_state.display(),
        dest = %dest_state.display(),
        "resources moved"
    );
    Ok(moved)
}
