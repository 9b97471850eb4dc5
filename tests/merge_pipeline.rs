//! File-level tests for the reconciliation pipeline: rewriting happens on
//! the serialized state, planning follows parse order, and re-runs leave
//! an already-rewritten file alone.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tfmerge::merge::{plan, rewrite_state_file};
use tfmerge::state::parse_flat_state;
use tfmerge::{AddressingMode, MultiInstancePolicy, StateIndex};

const DISCOVERED: &str = r#"{
    "version": 4,
    "terraform_version": "0.13.5",
    "serial": 3,
    "resources": [
        {
            "mode": "managed",
            "type": "ibm_is_vpc",
            "name": "vpc",
            "provider": "provider[\"registry.terraform.io/ibm-cloud/ibm\"]",
            "instances": [
                {"attributes": {"id": "vpc-1", "name": "prod-vpc"}}
            ]
        },
        {
            "mode": "managed",
            "type": "ibm_is_subnet",
            "name": "subnet",
            "instances": [
                {
                    "attributes": {"id": "sub-1"},
                    "dependencies": ["ibm_is_vpc.vpc"]
                }
            ]
        },
        {
            "mode": "managed",
            "type": "ibm_is_instance",
            "name": "local",
            "instances": [
                {"attributes": {"id": "vm-local"}}
            ]
        },
        {
            "mode": "managed",
            "type": "ibm_is_floating_ip",
            "name": "fip",
            "instances": [
                {"attributes": {"id": ""}}
            ]
        }
    ]
}"#;

const TARGET: &str = r#"{
    "version": 4,
    "resources": [
        {
            "mode": "managed",
            "type": "ibm_is_vpc",
            "name": "main_vpc",
            "instances": [
                {"attributes": {"id": "vpc-1"}}
            ]
        }
    ]
}"#;

fn write_states(dir: &TempDir) -> (PathBuf, PathBuf) {
    let discovery = dir.path().join("discovery.tfstate");
    let repo = dir.path().join("repo.tfstate");
    fs::write(&discovery, DISCOVERED).unwrap();
    fs::write(&repo, TARGET).unwrap();
    (discovery, repo)
}

fn indexes(discovery: &Path, repo: &Path) -> (StateIndex, StateIndex) {
    let discovered = parse_flat_state(
        discovery,
        AddressingMode::ByName,
        MultiInstancePolicy::LastWins,
    )
    .unwrap();
    let target = parse_flat_state(repo, AddressingMode::ById, MultiInstancePolicy::LastWins)
        .unwrap();
    (discovered, target)
}

#[test]
fn test_rewrite_repoints_reference_to_target_name() {
    let dir = TempDir::new().unwrap();
    let (discovery, repo) = write_states(&dir);
    let (discovered, target) = indexes(&discovery, &repo);

    let rewritten = rewrite_state_file(&discovery, &discovered, &target).unwrap();
    assert_eq!(rewritten, 1);

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&discovery).unwrap()).unwrap();
    assert_eq!(
        doc["resources"][1]["instances"][0]["dependencies"][0],
        "ibm_is_vpc.main_vpc"
    );
    // Untouched fields survive the re-serialization.
    assert_eq!(doc["serial"], 3);
    assert_eq!(
        doc["resources"][0]["instances"][0]["attributes"]["name"],
        "prod-vpc"
    );
}

#[test]
fn test_rewrite_twice_equals_rewrite_once() {
    let dir = TempDir::new().unwrap();
    let (discovery, repo) = write_states(&dir);

    let (discovered, target) = indexes(&discovery, &repo);
    rewrite_state_file(&discovery, &discovered, &target).unwrap();
    let after_first = fs::read_to_string(&discovery).unwrap();

    // Re-run against the rewritten file, the way an interrupted run would.
    let (discovered, target) = indexes(&discovery, &repo);
    let second = rewrite_state_file(&discovery, &discovered, &target).unwrap();

    assert_eq!(second, 0);
    assert_eq!(fs::read_to_string(&discovery).unwrap(), after_first);
}

#[test]
fn test_plan_skips_managed_excludes_local_keeps_order() {
    let dir = TempDir::new().unwrap();
    let (discovery, repo) = write_states(&dir);
    let (discovered, target) = indexes(&discovery, &repo);

    let plan = plan(&discovered, &target);

    let addrs: Vec<&str> = plan.moves.iter().map(|a| a.as_str()).collect();
    // vpc is already managed (matched by id); local is sentinel-excluded;
    // the empty-id floating ip is always planned.
    assert_eq!(addrs, ["ibm_is_subnet.subnet", "ibm_is_floating_ip.fip"]);
    assert_eq!(plan.skipped, 1);
}

#[test]
fn test_plan_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let (discovery, repo) = write_states(&dir);

    let (discovered, target) = indexes(&discovery, &repo);
    let first = plan(&discovered, &target);
    let (discovered, target) = indexes(&discovery, &repo);
    let second = plan(&discovered, &target);

    assert_eq!(first, second);
}

#[test]
fn test_reference_to_unmanaged_dependency_survives() {
    let dir = TempDir::new().unwrap();
    let discovery = dir.path().join("discovery.tfstate");
    let repo = dir.path().join("repo.tfstate");
    fs::write(&discovery, DISCOVERED).unwrap();
    // Target manages nothing.
    fs::write(&repo, r#"{"version": 4, "resources": []}"#).unwrap();
    let before = fs::read_to_string(&discovery).unwrap();

    let (discovered, target) = indexes(&discovery, &repo);
    let rewritten = rewrite_state_file(&discovery, &discovered, &target).unwrap();

    assert_eq!(rewritten, 0);
    assert_eq!(fs::read_to_string(&discovery).unwrap(), before);
}
