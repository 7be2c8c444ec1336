// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Priority allocator over a live resource set.
//!
//! Two structures share one sequence counter:
//!
//! - a min-heap of `(priority, seq)` entries decides what `allocate` returns
//! - a `BTreeMap<seq, Resource>` holds the live set in insertion order
//!
//! Sequence numbers only grow, so the map iterates in insertion order
//! (initial order first, released resources appended) and equal priorities
//! pop FIFO. That map order is the leaf order of the integrity tree.

mod entry;

use std::collections::{BTreeMap, BinaryHeap, HashMap};
use tracing::debug;

use crate::config::ReleasePolicy;
use crate::error::{AllocError, Result};
use crate::resource::Resource;

use entry::QueueEntry;

/// Tagged state of a resource id under [`ReleasePolicy::Tracked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// In the live set, can be allocated
    Available,
    /// Handed out, can be released
    Allocated,
}

impl std::fmt::Display for ResourceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "Available"),
            Self::Allocated => write!(f, "Allocated"),
        }
    }
}

/// Priority-ordered allocator with FIFO tie-break.
///
/// Not synchronized; [`ResourceAllocationService`](crate::ResourceAllocationService)
/// wraps it in a lock together with the integrity tree.
#[derive(Debug)]
pub struct PriorityAllocator {
    heap: BinaryHeap<QueueEntry>,
    live: BTreeMap<u64, Resource>,
    next_seq: u64,
    initialized: bool,
    release_policy: ReleasePolicy,
    /// Per-id state, only maintained under `ReleasePolicy::Tracked`
    states: HashMap<String, ResourceState>,
    /// Outstanding allocations (saturating under `Unchecked`)
    allocated: usize,
}

impl PriorityAllocator {
    pub fn new(release_policy: ReleasePolicy) -> Self {
        Self::with_capacity(release_policy, 0)
    }

    pub fn with_capacity(release_policy: ReleasePolicy, capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            live: BTreeMap::new(),
            next_seq: 0,
            initialized: false,
            release_policy,
            states: HashMap::with_capacity(capacity),
            allocated: 0,
        }
    }

    /// Seed the live set. Order of `resources` becomes live-set order.
    ///
    /// Re-initialization is rejected with [`AllocError::AlreadyInitialized`];
    /// call [`reset`](Self::reset) first.
    pub fn initialize(&mut self, resources: Vec<Resource>) -> Result<()> {
        if self.initialized {
            return Err(AllocError::AlreadyInitialized);
        }
        for resource in resources {
            if self.release_policy == ReleasePolicy::Tracked {
                self.states.insert(resource.id().to_owned(), ResourceState::Available);
            }
            self.push(resource);
        }
        self.initialized = true;
        debug!(live = self.live.len(), "Allocator initialized");
        Ok(())
    }

    /// Drop all state and return to uninitialized.
    pub fn reset(&mut self) {
        self.heap.clear();
        self.live.clear();
        self.states.clear();
        self.next_seq = 0;
        self.allocated = 0;
        self.initialized = false;
    }

    /// Remove and return the live resource with the lowest priority value.
    pub fn allocate(&mut self) -> Result<Resource> {
        if !self.initialized {
            return Err(AllocError::NotInitialized);
        }
        while let Some(entry) = self.heap.pop() {
            if let Some(resource) = self.live.remove(&entry.seq) {
                if self.release_policy == ReleasePolicy::Tracked {
                    self.states.insert(resource.id().to_owned(), ResourceState::Allocated);
                }
                self.allocated += 1;
                return Ok(resource);
            }
        }
        Err(AllocError::ResourceExhausted)
    }

    /// Return a resource to the end of the live set.
    ///
    /// Under [`ReleasePolicy::Unchecked`] anything is accepted, including a
    /// second release of the same resource. Under [`ReleasePolicy::Tracked`]
    /// only ids currently allocated are accepted.
    pub fn deallocate(&mut self, resource: Resource) -> Result<()> {
        if !self.initialized {
            return Err(AllocError::NotInitialized);
        }
        if self.release_policy == ReleasePolicy::Tracked {
            match self.states.get_mut(resource.id()) {
                Some(state) if *state == ResourceState::Allocated => {
                    *state = ResourceState::Available;
                }
                _ => {
                    return Err(AllocError::NotAllocated {
                        id: resource.id().to_owned(),
                    })
                }
            }
        }
        self.allocated = self.allocated.saturating_sub(1);
        self.push(resource);
        Ok(())
    }

    /// True iff the live set is empty.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.live.is_empty()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of live (allocatable) resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    #[must_use]
    pub fn allocated_count(&self) -> usize {
        self.allocated
    }

    #[must_use]
    pub fn release_policy(&self) -> ReleasePolicy {
        self.release_policy
    }

    /// The resource `allocate` would return next.
    #[must_use]
    pub fn peek(&self) -> Option<&Resource> {
        self.heap.peek().and_then(|entry| self.live.get(&entry.seq))
    }

    /// Live resources in insertion order.
    pub fn live(&self) -> impl Iterator<Item = &Resource> + '_ {
        self.live.values()
    }

    /// Owned copy of the live set, in insertion order.
    #[must_use]
    pub fn live_resources(&self) -> Vec<Resource> {
        self.live.values().cloned().collect()
    }

    /// State of an id.
    ///
    /// Tracked: the recorded state, `None` for unknown ids. Unchecked: only
    /// `Available` for ids in the live set, `None` otherwise.
    #[must_use]
    pub fn state_of(&self, id: &str) -> Option<ResourceState> {
        match self.release_policy {
            ReleasePolicy::Tracked => self.states.get(id).copied(),
            ReleasePolicy::Unchecked => self
                .live
                .values()
                .any(|r| r.id() == id)
                .then_some(ResourceState::Available),
        }
    }

    fn push(&mut self, resource: Resource) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(QueueEntry {
            priority: resource.priority(),
            seq,
        });
        self.live.insert(seq, resource);
    }

    #[cfg(test)]
    pub(crate) fn live_mut(&mut self) -> impl Iterator<Item = &mut Resource> + '_ {
        self.live.values_mut()
    }
}

impl Default for PriorityAllocator {
    fn default() -> Self {
        Self::new(ReleasePolicy::default())
    }
}
