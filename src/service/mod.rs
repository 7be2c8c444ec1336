// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Resource allocation service.
//!
//! The [`ResourceAllocationService`] ties the [`PriorityAllocator`] to the
//! [`IntegrityTree`]: every successful mutation of the live set is followed
//! by a full rebuild of the tree from that live set, under the same lock.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized → Initialized (→ Uninitialized via reset)
//! ```
//!
//! # Example
//!
//! ```
//! use resource_allocator::{AllocatorConfig, Resource, ResourceAllocationService};
//!
//! let service = ResourceAllocationService::with_resources(
//!     AllocatorConfig::default(),
//!     vec![
//!         Resource::new("VM1", 2),
//!         Resource::new("VM2", 1),
//!         Resource::new("VM3", 3),
//!     ],
//! )
//! .unwrap();
//!
//! let vm = service.allocate_resource("batch job").unwrap();
//! assert_eq!(vm.id(), "VM2");
//! assert!(service.verify_integrity());
//!
//! service.deallocate_resource(vm).unwrap();
//! assert!(service.verify_integrity());
//! ```

mod integrity_api;
mod types;

pub use types::{IntegrityReport, ServiceSnapshot, ServiceState};

use parking_lot::RwLock;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::allocator::PriorityAllocator;
use crate::config::AllocatorConfig;
use crate::error::{AllocError, Result};
use crate::resource::Resource;
use crate::tree::IntegrityTree;

/// Allocator and tree, always mutated together.
#[derive(Debug)]
pub(super) struct Inner {
    pub(super) allocator: PriorityAllocator,
    pub(super) tree: IntegrityTree,
}

/// Priority allocator with an integrity fingerprint of its live set.
///
/// # Thread Safety
///
/// The service is `Send + Sync`; share it with `Arc`. Allocator and tree sit
/// behind one `RwLock`: mutations hold the write lock across
/// read-mutate-rebuild, read queries (including verification) take the read
/// lock, so a check never observes a live set and a tree from different
/// mutations.
pub struct ResourceAllocationService {
    pub(super) config: AllocatorConfig,

    pub(super) inner: RwLock<Inner>,

    /// Lifecycle state (broadcast to watchers)
    pub(super) state: watch::Sender<ServiceState>,

    /// Lifecycle state receiver (for internal use)
    pub(super) state_rx: watch::Receiver<ServiceState>,

    /// Root fingerprint, republished after every rebuild
    pub(super) root: watch::Sender<Option<String>>,
}

impl ResourceAllocationService {
    /// Create an uninitialized service.
    pub fn new(config: AllocatorConfig) -> Self {
        let (state_tx, state_rx) = watch::channel(ServiceState::Uninitialized);
        let (root_tx, _) = watch::channel(None);

        let allocator =
            PriorityAllocator::with_capacity(config.release_policy, config.expected_capacity);

        Self {
            config,
            inner: RwLock::new(Inner {
                allocator,
                tree: IntegrityTree::empty(),
            }),
            state: state_tx,
            state_rx,
            root: root_tx,
        }
    }

    /// Create a service and initialize it with `resources`.
    pub fn with_resources(config: AllocatorConfig, resources: Vec<Resource>) -> Result<Self> {
        let service = Self::new(config);
        service.initialize(resources)?;
        Ok(service)
    }

    /// Get current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ServiceState {
        *self.state_rx.borrow()
    }

    /// Get a receiver to watch lifecycle changes.
    #[must_use]
    pub fn state_receiver(&self) -> watch::Receiver<ServiceState> {
        self.state.subscribe()
    }

    /// Get a receiver that sees every committed root fingerprint.
    ///
    /// `None` means no root: before initialization, or with a drained live set.
    #[must_use]
    pub fn root_receiver(&self) -> watch::Receiver<Option<String>> {
        self.root.subscribe()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        matches!(self.state(), ServiceState::Initialized)
    }

    #[must_use]
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    // --- Mutating operations ---

    /// Seed the allocator and build the tree over the full initial set.
    ///
    /// Leaf order is the order of `resources`. Fails with
    /// [`AllocError::EmptyInput`] for an empty set and
    /// [`AllocError::AlreadyInitialized`] on a second call without
    /// [`reset`](Self::reset). A failed call changes nothing.
    #[tracing::instrument(skip(self, resources), fields(count = resources.len()))]
    pub fn initialize(&self, resources: Vec<Resource>) -> Result<()> {
        let mut inner = self.inner.write();

        if inner.allocator.is_initialized() {
            warn!("Rejecting re-initialization");
            crate::metrics::record_operation("initialize", "rejected");
            return Err(AllocError::AlreadyInitialized);
        }

        let start = Instant::now();
        let tree = match IntegrityTree::from_resources(&resources) {
            Ok(tree) => tree,
            Err(e) => {
                warn!(error = %e, "Rejecting initialization");
                crate::metrics::record_operation("initialize", "empty");
                return Err(e);
            }
        };
        crate::metrics::record_rebuild(tree.leaf_count(), start.elapsed());

        inner.allocator.initialize(resources)?;
        let root = tree.root().map(str::to_owned);
        inner.tree = tree;
        self.publish(&inner, root.clone());
        self.state.send_replace(ServiceState::Initialized);

        info!(live = inner.allocator.len(), root = ?root, "Allocation service initialized");
        crate::metrics::record_operation("initialize", "success");
        Ok(())
    }

    /// Drop all state and return to `Uninitialized`.
    #[tracing::instrument(skip(self))]
    pub fn reset(&self) {
        let mut inner = self.inner.write();
        inner.allocator.reset();
        inner.tree = IntegrityTree::empty();
        self.publish(&inner, None);
        self.state.send_replace(ServiceState::Uninitialized);
        info!("Allocation service reset");
    }

    /// Allocate the highest-priority (lowest value) live resource.
    ///
    /// `context` describes the request for logging only; it does not
    /// influence which resource is chosen. On success the tree is rebuilt
    /// from the remaining live set.
    #[tracing::instrument(skip(self), fields(resource_id))]
    pub fn allocate_resource(&self, context: &str) -> Result<Resource> {
        let _timer = crate::metrics::LatencyTimer::new("allocate");
        let mut inner = self.inner.write();

        let resource = match inner.allocator.allocate() {
            Ok(resource) => resource,
            Err(e) => {
                let status = match e {
                    AllocError::ResourceExhausted => "exhausted",
                    AllocError::NotInitialized => "uninitialized",
                    _ => "error",
                };
                warn!(error = %e, "Allocation failed");
                crate::metrics::record_operation("allocate", status);
                return Err(e);
            }
        };

        tracing::Span::current().record("resource_id", resource.id());
        self.rebuild(&mut inner);

        debug!(priority = resource.priority(), live = inner.allocator.len(), "Resource allocated");
        crate::metrics::record_operation("allocate", "success");
        Ok(resource)
    }

    /// Return a resource to the end of the live set and rebuild the tree.
    #[tracing::instrument(skip(self, resource), fields(resource_id = %resource.id(), priority = resource.priority()))]
    pub fn deallocate_resource(&self, resource: Resource) -> Result<()> {
        let _timer = crate::metrics::LatencyTimer::new("deallocate");
        let mut inner = self.inner.write();

        if let Err(e) = inner.allocator.deallocate(resource) {
            let status = match e {
                AllocError::NotInitialized => "uninitialized",
                _ => "rejected",
            };
            warn!(error = %e, "Deallocation failed");
            crate::metrics::record_operation("deallocate", status);
            return Err(e);
        }

        self.rebuild(&mut inner);

        debug!(live = inner.allocator.len(), "Resource released");
        crate::metrics::record_operation("deallocate", "success");
        Ok(())
    }

    // --- Read queries ---

    /// True iff the live set is empty.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.inner.read().allocator.is_exhausted()
    }

    /// Number of live (allocatable) resources.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.inner.read().allocator.len()
    }

    /// Live set in insertion order (the tree's leaf order).
    #[must_use]
    pub fn live_resources(&self) -> Vec<Resource> {
        self.inner.read().allocator.live_resources()
    }

    /// Root fingerprint committed at the last rebuild.
    #[must_use]
    pub fn current_root_fingerprint(&self) -> Option<String> {
        self.inner.read().tree.root().map(str::to_owned)
    }

    /// Copy of the current tree, for reporting or rendering.
    #[must_use]
    pub fn tree_snapshot(&self) -> IntegrityTree {
        self.inner.read().tree.clone()
    }

    /// Consistent view of state, live set, allocation count and root.
    #[must_use]
    pub fn snapshot(&self) -> ServiceSnapshot {
        let inner = self.inner.read();
        ServiceSnapshot {
            state: self.state(),
            live: inner.allocator.live_resources(),
            allocated: inner.allocator.allocated_count(),
            root: inner.tree.root().map(str::to_owned),
            release_policy: inner.allocator.release_policy(),
        }
    }

    // --- Internal helpers ---

    /// Replace the tree with a fresh one over the current live set.
    ///
    /// Caller holds the write lock, so the live set and the new tree are
    /// committed together. A drained live set commits an empty tree.
    fn rebuild(&self, inner: &mut Inner) {
        let start = Instant::now();
        let tree = IntegrityTree::rebuild(inner.allocator.live());
        crate::metrics::record_rebuild(tree.leaf_count(), start.elapsed());

        let root = tree.root().map(str::to_owned);
        inner.tree = tree;
        debug!(root = ?root, leaves = inner.tree.leaf_count(), "Integrity tree rebuilt");

        if self.config.verify_after_mutation && root.is_some() && !Self::check(inner) {
            warn!(root = ?root, "Integrity check failed right after rebuild");
        }

        self.publish(inner, root);
    }

    fn publish(&self, inner: &Inner, root: Option<String>) {
        crate::metrics::set_live_resources(inner.allocator.len());
        crate::metrics::set_allocated_resources(inner.allocator.allocated_count());
        self.root.send_replace(root);
    }
}
