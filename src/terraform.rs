mod provider_patch;
mod runner;

pub use provider_patch::patch_provider_source;
pub use runner::TerraformCli;
