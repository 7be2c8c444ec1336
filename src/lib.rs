//! # Resource Allocator
//!
//! Priority-ordered allocation of a fixed pool of resources (VMs, slots,
//! workers), with a Merkle-style integrity fingerprint of the resources that
//! are still available.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 ResourceAllocationService                   │
//! │  • initialize / allocate / deallocate / verify             │
//! │  • one RwLock around allocator + tree                      │
//! │  • watch channels for state and root fingerprint           │
//! └─────────────────────────────────────────────────────────────┘
//!                │                               │
//!        (mutate live set)              (full rebuild after
//!                │                       every mutation)
//!                ▼                               ▼
//! ┌──────────────────────────────┐ ┌────────────────────────────┐
//! │      PriorityAllocator       │ │       IntegrityTree        │
//! │  • min-heap (priority, seq)  │ │  • leaves = live-set ids   │
//! │  • FIFO among equal priority │ │  • SHA-256 pair hashing    │
//! │  • live set in insert order  │ │  • odd node pairs itself   │
//! └──────────────────────────────┘ └────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
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
//! .expect("non-empty pool");
//!
//! // Lowest priority value first
//! let vm = service.allocate_resource("render job").unwrap();
//! assert_eq!(vm.id(), "VM2");
//!
//! // Root now covers VM1, VM3
//! assert!(service.verify_integrity());
//!
//! // Released resources are appended: VM1, VM3, VM2
//! service.deallocate_resource(vm).unwrap();
//! assert!(service.verify_integrity());
//! ```
//!
//! ## Modules
//!
//! - [`service`]: The [`ResourceAllocationService`] composing allocator and tree
//! - [`allocator`]: Priority allocator with FIFO tie-break
//! - [`tree`]: Integrity tree construction and verification
//! - [`resource`]: The [`Resource`] value type
//! - [`config`]: [`AllocatorConfig`] and [`ReleasePolicy`]
//! - [`error`]: [`AllocError`]
//! - [`metrics`]: `metrics` facade instrumentation

pub mod allocator;
pub mod config;
pub mod error;
pub mod metrics;
pub mod resource;
pub mod service;
pub mod tree;

pub use allocator::{PriorityAllocator, ResourceState};
pub use config::{AllocatorConfig, ReleasePolicy};
pub use error::{AllocError, Result};
pub use resource::Resource;
pub use service::{IntegrityReport, ResourceAllocationService, ServiceSnapshot, ServiceState};
pub use tree::{IntegrityTree, TreeNode};
pub use crate::metrics::LatencyTimer;
