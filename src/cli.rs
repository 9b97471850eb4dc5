mod args;

pub use args::{Cli, Command, FetchArgs, InspectArgs, MergeArgs};
