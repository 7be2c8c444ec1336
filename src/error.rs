// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Error taxonomy for the allocator.
//!
//! Every error is local, synchronous and recoverable. A failed operation
//! leaves the allocator and the integrity tree exactly as they were.

use thiserror::Error;

/// Errors returned by the tree, the allocator and the service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// A tree was built (or a service initialized) over zero resources.
    #[error("cannot build an integrity tree over an empty resource set")]
    EmptyInput,

    /// Allocate or deallocate was called before `initialize`.
    #[error("allocator has not been initialized")]
    NotInitialized,

    /// `allocate` was called with no resources left in the live set.
    #[error("no resources available for allocation")]
    ResourceExhausted,

    /// `initialize` was called twice without an intervening `reset`.
    #[error("allocator is already initialized; call reset() first")]
    AlreadyInitialized,

    /// Release of a resource that is not currently allocated
    /// (only reported under [`ReleasePolicy::Tracked`](crate::config::ReleasePolicy::Tracked)).
    #[error("resource '{id}' is not currently allocated")]
    NotAllocated {
        id: String,
    },
}

pub type Result<T> = std::result::Result<T, AllocError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            AllocError::ResourceExhausted.to_string(),
            "no resources available for allocation"
        );
        assert_eq!(
            AllocError::NotAllocated { id: "VM1".into() }.to_string(),
            "resource 'VM1' is not currently allocated"
        );
    }
}
