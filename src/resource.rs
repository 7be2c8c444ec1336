//! Resource data structure.
//!
//! A [`Resource`] is the unit handed out by the allocator: an opaque string
//! identity and a numeric priority. Lower priority values are allocated first.

use serde::{Deserialize, Serialize};

/// An allocatable resource (e.g. a virtual machine).
///
/// Immutable once created. To change a priority, release the old value and
/// insert a new one.
///
/// # Example
///
/// ```
/// use resource_allocator::Resource;
///
/// let vm = Resource::new("VM1", 2);
/// assert_eq!(vm.id(), "VM1");
/// assert_eq!(vm.priority(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    id: String,
    priority: i64,
}

impl Resource {
    pub fn new(id: impl Into<String>, priority: i64) -> Self {
        Self {
            id: id.into(),
            priority,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// Same identity, different priority.
    #[must_use]
    pub fn with_priority(&self, priority: i64) -> Self {
        Self::new(self.id.clone(), priority)
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(p={})", self.id, self.priority)
    }
}
