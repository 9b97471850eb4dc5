use crate::resource::{ResourceAddress, SENTINEL_LOCAL};
use crate::state::StateIndex;

/// Ordered set of resources to relocate, plus how many were skipped
/// because the target already manages them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationPlan {
    /// By-name addresses, in discovered parse order.
    pub moves: Vec<ResourceAddress>,
    pub skipped: usize,
}

impl RelocationPlan {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Decides, per discovered resource, whether it is new (move) or already
/// represented in the target (skip).
///
/// Matching is by id: a discovered resource whose `type.id` address exists
/// in `target` is already managed. Resources with an empty id have never
/// been reconciled with real infrastructure, so there is nothing to
/// deduplicate against and they are always planned. Resources named
/// `local` are a sentinel for local-only computation and are never
/// relocatable; they are excluded without counting as skipped.
///
/// Iteration follows the discovered parse order, so plan order is
/// reproducible across runs.
pub fn plan(discovered: &StateIndex, target: &StateIndex) -> RelocationPlan {
    let mut moves = Vec::new();
    let mut skipped = 0;

    for resource in discovered.resources() {
        if resource.name == SENTINEL_LOCAL {
            tracing::debug!(resource_type = %resource.resource_type, "excluding local sentinel");
            continue;
        }

        if !resource.id.is_empty() && target.get(&ResourceAddress::by_id(resource)).is_some() {
            tracing::debug!(address = %ResourceAddress::by_name(resource), "already managed, skipping");
            skipped += 1;
            continue;
        }

        moves.push(ResourceAddress::by_name(resource));
    }

    tracing::info!(moves = moves.len(), skipped, "relocation plan built");
    RelocationPlan { moves, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{AddressingMode, Resource};

    fn resource(name: &str, id: &str, source_index: usize) -> Resource {
        Resource {
            name: name.to_string(),
            resource_type: "ibm_is_vpc".to_string(),
            id: id.to_string(),
            depends_on: None,
            source_index,
        }
    }

    fn discovered(resources: Vec<Resource>) -> StateIndex {
        StateIndex::build(resources, AddressingMode::ByName)
    }

    fn target(resources: Vec<Resource>) -> StateIndex {
        StateIndex::build(resources, AddressingMode::ById)
    }

    #[test]
    fn test_new_resource_is_planned_by_name() {
        let plan = plan(
            &discovered(vec![resource("vpc", "vpc-1", 0)]),
            &target(Vec::new()),
        );
        assert_eq!(plan.moves, vec![ResourceAddress::from_raw("ibm_is_vpc.vpc")]);
        assert_eq!(plan.skipped, 0);
    }

    #[test]
    fn test_already_managed_is_skipped() {
        // Same underlying id, different declared names.
        let plan = plan(
            &discovered(vec![resource("vpc", "vpc-1", 0)]),
            &target(vec![resource("main_vpc", "vpc-1", 0)]),
        );
        assert!(plan.is_empty());
        assert_eq!(plan.skipped, 1);
    }

    #[test]
    fn test_empty_id_always_planned() {
        // A target entry with an empty id must not capture unapplied
        // discovered resources.
        let plan = plan(
            &discovered(vec![resource("vpc", "", 0)]),
            &target(vec![resource("other", "", 0)]),
        );
        assert_eq!(plan.moves.len(), 1);
        assert_eq!(plan.skipped, 0);
    }

    #[test]
    fn test_local_sentinel_never_planned() {
        let plan = plan(
            &discovered(vec![resource("local", "some-id", 0)]),
            &target(Vec::new()),
        );
        assert!(plan.is_empty());
        // Sentinel exclusion is not a skip.
        assert_eq!(plan.skipped, 0);
    }

    #[test]
    fn test_order_matches_parse_order_minus_exclusions() {
        let plan = plan(
            &discovered(vec![
                resource("c", "c-1", 0),
                resource("managed", "m-1", 1),
                resource("local", "l-1", 2),
                resource("a", "a-1", 3),
            ]),
            &target(vec![resource("managed_elsewhere", "m-1", 0)]),
        );
        let addrs: Vec<&str> = plan.moves.iter().map(|a| a.as_str()).collect();
        assert_eq!(addrs, ["ibm_is_vpc.c", "ibm_is_vpc.a"]);
        assert_eq!(plan.skipped, 1);
    }
}
