// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic resource-allocator usage example.
//!
//! Demonstrates:
//! 1. Initializing a pool of three VMs
//! 2. Allocating the highest-priority VM
//! 3. Releasing it again
//! 4. Verifying the integrity fingerprint after each step
//! 5. Detecting a mismatch against a tampered copy of the live set
//! 6. Displaying metrics
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_usage
//! ```

use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use resource_allocator::{AllocatorConfig, IntegrityTree, Resource, ResourceAllocationService};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install metrics recorder
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder.install().expect("failed to install metrics recorder");

    // Simple logging, RUST_LOG overrides the default
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║         resource-allocator: Basic Usage Example               ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    // ─────────────────────────────────────────────────────────────────────────
    // 1. Initialize the pool
    // ─────────────────────────────────────────────────────────────────────────
    let service = ResourceAllocationService::with_resources(
        AllocatorConfig::default(),
        vec![
            Resource::new("VM1", 2),
            Resource::new("VM2", 1),
            Resource::new("VM3", 3),
        ],
    )?;
    let roots = service.root_receiver();
    print_state("Initialized", &service);

    // ─────────────────────────────────────────────────────────────────────────
    // 2. Allocate
    // ─────────────────────────────────────────────────────────────────────────
    let vm = service.allocate_resource("Some criteria for resource allocation")?;
    println!("\n📤 Allocated resource: {}", vm);
    print_state("After allocate", &service);

    // ─────────────────────────────────────────────────────────────────────────
    // 3. Deallocate
    // ─────────────────────────────────────────────────────────────────────────
    service.deallocate_resource(vm)?;
    println!("\n📥 Released resource back to the pool");
    print_state("After deallocate", &service);
    println!("   watcher sees root: {:?}", *roots.borrow());

    // ─────────────────────────────────────────────────────────────────────────
    // 4. Tamper detection on an external copy
    // ─────────────────────────────────────────────────────────────────────────
    let mut copy = service.live_resources();
    if let Some(first) = copy.first_mut() {
        *first = Resource::new("VM1-forged", first.priority());
    }
    let root = service.current_root_fingerprint().unwrap_or_default();
    println!(
        "\n🔍 Forged copy verifies against current root: {}",
        IntegrityTree::verify(&copy, &root)
    );

    // ─────────────────────────────────────────────────────────────────────────
    // 5. Metrics
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n📊 Metrics:");
    dump_metrics(&snapshotter);

    Ok(())
}

fn print_state(label: &str, service: &ResourceAllocationService) {
    let snapshot = service.snapshot();
    let ids: Vec<&str> = snapshot.live.iter().map(Resource::id).collect();
    println!("\n✅ {}", label);
    println!("   live set:  {:?}", ids);
    println!("   root:      {}", snapshot.root.as_deref().unwrap_or("(none)"));
    println!("   verified:  {}", service.verify_integrity());
}

fn dump_metrics(snapshotter: &Snapshotter) {
    let snapshot = snapshotter.snapshot();

    let mut lines: Vec<String> = vec![];
    for (composite_key, _, _, value) in snapshot.into_vec() {
        let (_, key) = composite_key.into_parts();
        let labels: Vec<_> = key.labels().map(|l| format!("{}={}", l.key(), l.value())).collect();
        let label_str = if labels.is_empty() { String::new() } else { format!("{{{}}}", labels.join(",")) };

        let rendered = match value {
            DebugValue::Counter(v) => format!("{}", v),
            DebugValue::Gauge(v) => format!("{:.2}", v.into_inner()),
            DebugValue::Histogram(samples) => {
                let sum: f64 = samples.iter().map(|v| v.into_inner()).sum();
                format!("count={} sum={:.6}", samples.len(), sum)
            }
        };
        lines.push(format!("{}{} = {}", key.name(), label_str, rendered));
    }
    lines.sort();

    if lines.is_empty() {
        println!("   └─ (no metrics recorded)");
    }
    for line in &lines {
        println!("   └─ {}", line);
    }
}
