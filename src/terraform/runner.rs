use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::MergeError;
use crate::merge::StateMover;

/// Thin wrapper over the terraform binary.
///
/// Every invocation runs from `working_dir`, is bounded by `timeout`, and
/// maps a non-zero exit (or the timeout itself) to an `ExternalTool`
/// error carrying the operation and captured stderr. No retries: failures
/// here mean operator intervention, not transient conditions.
#[derive(Debug, Clone)]
pub struct TerraformCli {
    bin: String,
    working_dir: PathBuf,
    timeout: Duration,
}

impl TerraformCli {
    pub fn new(bin: impl Into<String>, working_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            working_dir: working_dir.into(),
            timeout,
        }
    }

    pub async fn init(&self) -> Result<(), MergeError> {
        self.run("init", &["init".to_string()], None).await
    }

    pub async fn refresh(&self) -> Result<(), MergeError> {
        self.run("refresh", &["refresh".to_string()], None).await
    }

    /// `terraform state replace-provider`, used after patching the
    /// generated provider file so the state records the same source.
    pub async fn replace_provider(&self, from: &str, to: &str) -> Result<(), MergeError> {
        let args = vec![
            "state".to_string(),
            "replace-provider".to_string(),
            "-auto-approve".to_string(),
            from.to_string(),
            to.to_string(),
        ];
        self.run("state replace-provider", &args, None).await
    }

    async fn run(
        &self,
        operation: &str,
        args: &[String],
        address: Option<&str>,
    ) -> Result<(), MergeError> {
        let external = |message: String| MergeError::ExternalTool {
            operation: operation.to_string(),
            address: address.map(String::from),
            message,
        };

        tracing::debug!(bin = %self.bin, ?args, "running terraform");
        let child = Command::new(&self.bin)
            .args(args)
            .current_dir(&self.working_dir)
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| external(format!("timed out after {:?}", self.timeout)))?
            .map_err(|e| external(format!("failed to spawn '{}': {e}", self.bin)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(external(format!(
                "{}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl StateMover for TerraformCli {
    async fn move_resource(
        &self,
        source_state: &Path,
        dest_state: &Path,
        source_address: &str,
        dest_address: &str,
    ) -> Result<(), MergeError> {
        let args = vec![
            "state".to_string(),
            "mv".to_string(),
            format!("-state={}", source_state.display()),
            format!("-state-out={}", dest_state.display()),
            source_address.to_string(),
            dest_address.to_string(),
        ];
        self.run("state mv", &args, Some(source_address)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(bin: &str) -> TerraformCli {
        TerraformCli::new(bin, ".", Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_missing_binary_is_external_tool_error() {
        let result = cli("definitely-not-terraform-xyz").init().await;
        match result.unwrap_err() {
            MergeError::ExternalTool { operation, address, .. } => {
                assert_eq!(operation, "init");
                assert!(address.is_none());
            }
            other => panic!("expected ExternalTool error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr_and_address() {
        // `false` exits 1 regardless of arguments.
        let cli = cli("false");
        let result = cli
            .move_resource(
                Path::new("a.tfstate"),
                Path::new("b.tfstate"),
                "ibm_is_vpc.main",
                "ibm_is_vpc.main",
            )
            .await;
        match result.unwrap_err() {
            MergeError::ExternalTool { operation, address, .. } => {
                assert_eq!(operation, "state mv");
                assert_eq!(address.as_deref(), Some("ibm_is_vpc.main"));
            }
            other => panic!("expected ExternalTool error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_successful_exit_is_ok() {
        // `true` ignores arguments and exits 0.
        let result = cli("true").refresh().await;
        assert!(result.is_ok());
    }
}
