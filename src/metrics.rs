// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for the allocator.
//!
//! Uses the `metrics` crate facade; the host process picks the exporter.
//!
//! # Metric Naming Convention
//! - `resource_allocator_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `operation`: initialize, allocate, deallocate, verify
//! - `status`: success, exhausted, rejected, uninitialized, mismatch

use metrics::{counter, gauge, histogram};
use std::time::{Duration, Instant};

/// Record an allocator operation outcome
pub fn record_operation(operation: &str, status: &str) {
    counter!(
        "resource_allocator_operations_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record operation latency
pub fn record_latency(operation: &str, duration: Duration) {
    histogram!(
        "resource_allocator_operation_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record how long a full tree rebuild took and how many leaves it covered
pub fn record_rebuild(leaves: usize, duration: Duration) {
    histogram!("resource_allocator_tree_rebuild_seconds").record(duration.as_secs_f64());
    histogram!("resource_allocator_tree_leaves").record(leaves as f64);
}

/// Record an integrity check result
pub fn record_integrity_check(verified: bool) {
    counter!(
        "resource_allocator_integrity_checks_total",
        "result" => if verified { "verified" } else { "mismatch" }
    )
    .increment(1);
}

/// Set current live (allocatable) resource count
pub fn set_live_resources(count: usize) {
    gauge!("resource_allocator_live_resources").set(count as f64);
}

/// Set current outstanding allocation count
pub fn set_allocated_resources(count: usize) {
    gauge!("resource_allocator_allocated_resources").set(count as f64);
}

/// Latency timer that records on drop
pub struct LatencyTimer {
    operation: &'static str,
    start: Instant,
}

impl LatencyTimer {
    /// Start a new latency timer
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_latency(self.operation, self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // No recorder installed: these only check the calls don't panic.

    #[test]
    fn test_record_operation() {
        record_operation("allocate", "success");
        record_operation("allocate", "exhausted");
        record_operation("deallocate", "rejected");
    }

    #[test]
    fn test_record_rebuild_and_gauges() {
        record_rebuild(3, Duration::from_micros(20));
        set_live_resources(2);
        set_allocated_resources(1);
        record_integrity_check(true);
        record_integrity_check(false);
    }

    #[test]
    fn test_latency_timer() {
        {
            let _timer = LatencyTimer::new("verify");
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}
