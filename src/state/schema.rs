//! Typed layouts for the two Terraform state generations we accept.
//!
//! Decoding is strict where the engine has an invariant to defend: a
//! resource entry without a `type` (or, in the flat schema, a `name`) is a
//! decode failure, not a silently empty record. Identifiers default to
//! empty because not-yet-applied resources legitimately carry none.

use std::collections::BTreeMap;

use serde::Deserialize;

/// TF 0.12 layout: resources nested inside named modules, the identifier
/// buried under `primary.attributes`.
#[derive(Debug, Deserialize)]
pub struct LegacyState {
    pub modules: Vec<LegacyModule>,
}

#[derive(Debug, Deserialize)]
pub struct LegacyModule {
    // BTreeMap so flattening order is stable across runs; the on-disk map
    // carries no order of its own.
    #[serde(default)]
    pub resources: BTreeMap<String, LegacyResource>,
}

#[derive(Debug, Deserialize)]
pub struct LegacyResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub primary: LegacyPrimary,
}

#[derive(Debug, Default, Deserialize)]
pub struct LegacyPrimary {
    #[serde(default)]
    pub attributes: LegacyAttributes,
}

#[derive(Debug, Default, Deserialize)]
pub struct LegacyAttributes {
    #[serde(default)]
    pub id: String,
}

/// TF 0.13+ layout: a top-level resource list, each entry holding one or
/// more instances.
#[derive(Debug, Deserialize)]
pub struct FlatState {
    pub resources: Vec<FlatResource>,
}

#[derive(Debug, Deserialize)]
pub struct FlatResource {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub instances: Vec<FlatInstance>,
}

#[derive(Debug, Deserialize)]
pub struct FlatInstance {
    #[serde(default)]
    pub attributes: FlatAttributes,
    pub dependencies: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FlatAttributes {
    #[serde(default)]
    pub id: String,
}
