use std::fs;
use std::path::Path;

use crate::error::MergeError;

/// Rewrites the generated provider file so the provider block pins a
/// registry source instead of the version constraint the import tool
/// emitted: every line containing `version` becomes `source = "<source>"`.
pub fn patch_provider_source(path: &Path, source: &str) -> Result<(), MergeError> {
    let input = fs::read_to_string(path).map_err(|e| MergeError::io(path, e))?;

    let lines: Vec<String> = input
        .lines()
        .map(|line| {
            if line.contains("version") {
                format!("source = \"{source}\"")
            } else {
                line.to_string()
            }
        })
        .collect();

    fs::write(path, lines.join("\n")).map_err(|e| MergeError::io(path, e))?;
    tracing::info!(path = %path.display(), source, "provider file patched");
    Ok(())
}
