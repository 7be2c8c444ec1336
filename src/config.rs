//! Configuration for the allocation service.
//!
//! # Example
//!
//! ```
//! use resource_allocator::{AllocatorConfig, ReleasePolicy};
//!
//! // Minimal config (uses defaults)
//! let config = AllocatorConfig::default();
//! assert_eq!(config.release_policy, ReleasePolicy::Unchecked);
//!
//! // Hardened release checking
//! let config = AllocatorConfig {
//!     release_policy: ReleasePolicy::Tracked,
//!     expected_capacity: 64,
//!     ..Default::default()
//! };
//! assert!(config.verify_after_mutation);
//! ```

use serde::Deserialize;

/// How `deallocate` treats resources it is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleasePolicy {
    /// Any resource is accepted back; double release is the caller's problem.
    #[default]
    Unchecked,
    /// Only ids currently marked `Allocated` may be released.
    Tracked,
}

/// Configuration for the allocation service.
///
/// All fields have defaults, so an empty document deserializes cleanly.
#[derive(Debug, Clone, Deserialize)]
pub struct AllocatorConfig {
    /// Release validation policy (default: unchecked)
    #[serde(default)]
    pub release_policy: ReleasePolicy,

    /// Pre-sizing hint for the live set and priority heap
    #[serde(default = "default_expected_capacity")]
    pub expected_capacity: usize,

    /// Re-check the freshly committed root after every mutation
    #[serde(default = "default_verify_after_mutation")]
    pub verify_after_mutation: bool,
}

fn default_expected_capacity() -> usize { 16 }
fn default_verify_after_mutation() -> bool { true }

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            release_policy: ReleasePolicy::default(),
            expected_capacity: default_expected_capacity(),
            verify_after_mutation: default_verify_after_mutation(),
        }
    }
}
