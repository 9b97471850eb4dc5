//! The sequential reconciliation pipeline: parse both states, rewrite the
//! discovered file's dependency references, plan, relocate. Each stage's
//! output is the next stage's only input; the discovered file is mutated
//! exactly once, between rewrite and plan.

use std::fs;

use serde_json::Value;

use crate::error::MergeError;
use crate::resource::{AddressingMode, MergeConfig};
use crate::state::parse_flat_state;
use crate::terraform::{patch_provider_source, TerraformCli};

use super::executor::{execute, StateMover};
use super::planner::{plan, RelocationPlan};
use super::rewrite::{rewrite_dependencies, rewrite_state_file};

/// Aggregate outcome of one reconciliation run.
#[derive(Debug)]
pub struct MergeReport {
    pub moved: usize,
    pub skipped: usize,
    /// Dependency references rewritten in the discovered state file.
    pub rewritten: usize,
    pub plan: RelocationPlan,
}

/// Runs the reconciliation core. With `dry_run` set, nothing on disk is
/// touched: the rewrite is simulated in memory and the plan is returned
/// without invoking the mover.
pub async fn reconcile(
    config: &MergeConfig,
    mover: &dyn StateMover,
) -> Result<MergeReport, MergeError> {
    let discovered = parse_flat_state(
        &config.discovery_state,
        AddressingMode::ByName,
        config.multi_instance,
    )?;
    let target = parse_flat_state(
        &config.repo_state,
        AddressingMode::ById,
        config.multi_instance,
    )?;

    let rewritten = if config.dry_run {
        let path = &config.discovery_state;
        let text = fs::read_to_string(path).map_err(|e| MergeError::io(path, e))?;
        let mut doc: Value =
            serde_json::from_str(&text).map_err(|e| MergeError::decode(path, e))?;
        rewrite_dependencies(&mut doc, &discovered, &target)?
    } else {
        rewrite_state_file(&config.discovery_state, &discovered, &target)?
    };

    let plan = plan(&discovered, &target);

    let moved = if config.dry_run {
        tracing::info!(moves = plan.moves.len(), "dry run, skipping relocation");
        0
    } else {
        execute(&plan, mover, &config.discovery_state, &config.repo_state).await?
    };

    Ok(MergeReport {
        moved,
        skipped: plan.skipped,
        rewritten,
        plan,
    })
}

/// Post-merge collaborator steps, run in order once relocation succeeded:
/// patch the generated provider file (when a source is configured) and
/// repoint the state at the patched source, then `terraform init` and
/// `terraform refresh` in the working directory.
pub async fn finalize(config: &MergeConfig, tf: &TerraformCli) -> Result<(), MergeError> {
    if let Some(source) = &config.provider_source {
        let provider_file = config.working_dir.join("provider.tf");
        patch_provider_source(&provider_file, source)?;

        let (from, to) = provider_addresses(source);
        tf.replace_provider(&from, &to).await?;
    }
    tf.init().await?;
    tf.refresh().await?;
    Ok(())
}

/// Registry addresses for `state replace-provider`: the import tool
/// records the legacy `-/<name>` address, the patched file pins the full
/// source.
fn provider_addresses(source: &str) -> (String, String) {
    let name = source.rsplit('/').next().unwrap_or(source);
    (
        format!("registry.terraform.io/-/{name}"),
        format!("registry.terraform.io/{source}"),
    )
}
