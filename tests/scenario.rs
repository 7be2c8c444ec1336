//! End-to-end scenarios for the allocation service.
//!
//! Exercises the public API only, the way a reporting collaborator would:
//! initialize, allocate, release, and read fingerprints back.
//!
//! # Running Tests
//! ```bash
//! cargo test --test scenario
//! ```

use std::sync::Arc;

use resource_allocator::{
    AllocError, AllocatorConfig, IntegrityTree, ReleasePolicy, Resource,
    ResourceAllocationService, ServiceState,
};

// =============================================================================
// Helpers
// =============================================================================

fn vms() -> Vec<Resource> {
    vec![
        Resource::new("VM1", 2),
        Resource::new("VM2", 1),
        Resource::new("VM3", 3),
    ]
}

fn service_with(resources: Vec<Resource>) -> ResourceAllocationService {
    ResourceAllocationService::with_resources(AllocatorConfig::default(), resources)
        .expect("non-empty pool")
}

fn live_ids(service: &ResourceAllocationService) -> Vec<String> {
    service
        .live_resources()
        .iter()
        .map(|r| r.id().to_owned())
        .collect()
}

// =============================================================================
// Happy Path
// =============================================================================

#[test]
fn happy_vm_pool_allocate_release_verify() {
    let service = service_with(vms());
    assert_eq!(service.state(), ServiceState::Initialized);
    assert!(service.verify_integrity());

    // VM2 has the lowest priority value
    let vm = service.allocate_resource("Some criteria for resource allocation").unwrap();
    assert_eq!(vm, Resource::new("VM2", 1));
    assert_eq!(live_ids(&service), vec!["VM1", "VM3"]);

    let expected = IntegrityTree::build(&[Resource::new("VM1", 2), Resource::new("VM3", 3)]).unwrap();
    assert_eq!(service.current_root_fingerprint(), Some(expected));
    assert!(service.verify_integrity());

    // Released VM2 goes to the end of the leaf order
    service.deallocate_resource(vm).unwrap();
    assert_eq!(live_ids(&service), vec!["VM1", "VM3", "VM2"]);
    assert_eq!(
        service.current_root_fingerprint().as_deref(),
        Some("437df079bde9b26f1e59b6ecfef424bf54afc07fc248e0da88cd135b16f0370c")
    );
    assert!(service.verify_integrity());
}

#[test]
fn happy_allocation_order_follows_priority_then_insertion() {
    let service = service_with(vec![
        Resource::new("gpu-a", 1),
        Resource::new("cpu-a", 5),
        Resource::new("gpu-b", 1),
        Resource::new("spot", 9),
        Resource::new("cpu-b", 5),
    ]);

    let order: Vec<String> = std::iter::from_fn(|| service.allocate_resource("drain").ok())
        .map(|r| r.id().to_owned())
        .collect();

    assert_eq!(order, vec!["gpu-a", "gpu-b", "cpu-a", "cpu-b", "spot"]);
    assert!(service.is_exhausted());
}

#[test]
fn happy_fingerprint_is_64_hex_chars() {
    let service = service_with(vms());
    let root = service.current_root_fingerprint().unwrap();
    assert_eq!(root.len(), 64);
    assert!(root.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn happy_single_resource_pool_root_is_id() {
    let service = service_with(vec![Resource::new("only", 4)]);
    assert_eq!(service.current_root_fingerprint().as_deref(), Some("only"));
    assert!(service.verify_integrity());
}

#[test]
fn happy_report_matches_tree_snapshot() {
    let service = service_with(vms());
    service.allocate_resource("job").unwrap();

    let report = service.integrity_report();
    assert!(report.is_verified());
    assert_eq!(report.live_count, 2);

    let tree = service.tree_snapshot();
    assert_eq!(tree.root().map(str::to_owned), report.stored_root);
    assert_eq!(tree.leaf_ids(), vec!["VM1", "VM3"]);
}

// =============================================================================
// Failure Scenarios
// =============================================================================

#[test]
fn failure_exhaustion_then_release_allows_one_more() {
    let service = service_with(vms());
    let held: Vec<Resource> = (0..3).map(|_| service.allocate_resource("job").unwrap()).collect();

    assert_eq!(service.allocate_resource("job"), Err(AllocError::ResourceExhausted));
    assert_eq!(service.current_root_fingerprint(), None);

    service.deallocate_resource(held[2].clone()).unwrap();
    assert_eq!(service.allocate_resource("job").unwrap(), held[2]);
    assert_eq!(service.allocate_resource("job"), Err(AllocError::ResourceExhausted));
}

#[test]
fn failure_empty_initialization() {
    let result = ResourceAllocationService::with_resources(AllocatorConfig::default(), Vec::new());
    assert!(matches!(result, Err(AllocError::EmptyInput)));
}

#[test]
fn failure_uninitialized_service() {
    let service = ResourceAllocationService::new(AllocatorConfig::default());
    assert_eq!(service.allocate_resource("job"), Err(AllocError::NotInitialized));
    assert!(!service.verify_integrity());
    assert_eq!(service.current_root_fingerprint(), None);
}

#[test]
fn failure_tracked_release_of_unknown_resource() {
    let config = AllocatorConfig {
        release_policy: ReleasePolicy::Tracked,
        ..Default::default()
    };
    let service = ResourceAllocationService::with_resources(config, vms()).unwrap();
    let before = service.snapshot();

    let err = service.deallocate_resource(Resource::new("VM42", 0)).unwrap_err();
    assert_eq!(err, AllocError::NotAllocated { id: "VM42".into() });
    assert_eq!(service.snapshot(), before);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn concurrent_threads_keep_tree_consistent() {
    let pool: Vec<Resource> = (0..16).map(|i| Resource::new(format!("node-{}", i), i % 3)).collect();
    let service = Arc::new(service_with(pool));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || {
                for round in 0..100 {
                    let vm = service
                        .allocate_resource(&format!("thread-{}-{}", t, round))
                        .expect("pool larger than thread count");
                    assert!(service.verify_integrity());
                    service.deallocate_resource(vm).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(service.live_count(), 16);
    assert!(service.verify_integrity());
}
