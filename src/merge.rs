mod executor;
mod pipeline;
mod planner;
mod rewrite;

pub use executor::{execute, StateMover};
pub use pipeline::{finalize, reconcile, MergeReport};
pub use planner::{plan, RelocationPlan};
pub use rewrite::{rewrite_dependencies, rewrite_state_file};
