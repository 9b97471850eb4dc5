use std::collections::HashMap;

use crate::resource::{AddressingMode, Resource, ResourceAddress};

/// Read-only lookup structure over one parsed state.
///
/// Keyed under a single addressing mode chosen at build time; insertion
/// order of the underlying resources is preserved so iteration (and
/// therefore planning) is reproducible across runs.
#[derive(Debug)]
pub struct StateIndex {
    resources: Vec<Resource>,
    by_address: HashMap<ResourceAddress, usize>,
    mode: AddressingMode,
}

impl StateIndex {
    /// Pure construction; no I/O. A later resource with a colliding
    /// address overwrites an earlier one (addresses are unique in a
    /// well-formed state, so a collision is an upstream data issue this
    /// engine does not diagnose).
    pub fn build(resources: Vec<Resource>, mode: AddressingMode) -> Self {
        let mut by_address = HashMap::with_capacity(resources.len());
        for (i, resource) in resources.iter().enumerate() {
            by_address.insert(resource.address(mode), i);
        }
        Self {
            resources,
            by_address,
            mode,
        }
    }

    /// Absence is a normal outcome ("not yet managed"), never an error.
    pub fn get(&self, address: &ResourceAddress) -> Option<&Resource> {
        self.by_address.get(address).map(|&i| &self.resources[i])
    }

    /// Resources in their original parse order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn mode(&self) -> AddressingMode {
        self.mode
    }
}
