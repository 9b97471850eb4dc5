mod index;
mod parser;
mod schema;

pub use index::StateIndex;
pub use parser::{detect_schema, parse_flat_state, parse_legacy_state, StateSchema};
