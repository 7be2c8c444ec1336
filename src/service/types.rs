//! Public types for the allocation service.

use crate::config::ReleasePolicy;
use crate::resource::Resource;

/// Service lifecycle state.
///
/// ```text
/// Uninitialized ──initialize──► Initialized ──reset──► Uninitialized
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// No resource set loaded; allocate/deallocate fail
    Uninitialized,
    /// Resource set loaded; all operations available
    Initialized,
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "Uninitialized"),
            Self::Initialized => write!(f, "Initialized"),
        }
    }
}

/// Detailed outcome of an integrity check.
///
/// Produced by [`super::ResourceAllocationService::integrity_report()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    /// Root committed at the last rebuild
    pub stored_root: Option<String>,
    /// Root recomputed from the live set now
    pub recomputed_root: Option<String>,
    /// `(id, priority)` digest committed at the last rebuild
    pub stored_digest: Option<String>,
    /// `(id, priority)` digest recomputed from the live set now
    pub recomputed_digest: String,
    /// Live resources checked
    pub live_count: usize,
}

impl IntegrityReport {
    /// True iff a root exists and both fingerprints match.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.stored_root.is_some()
            && self.stored_root == self.recomputed_root
            && self.stored_digest.as_deref() == Some(self.recomputed_digest.as_str())
    }
}

impl std::fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Integrity(verified={}, live={}, root={})",
            self.is_verified(),
            self.live_count,
            self.stored_root.as_deref().unwrap_or("none")
        )
    }
}

/// Point-in-time view of the service for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSnapshot {
    pub state: ServiceState,
    /// Live set in insertion order
    pub live: Vec<Resource>,
    pub allocated: usize,
    pub root: Option<String>,
    pub release_policy: ReleasePolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(stored: Option<&str>, recomputed: Option<&str>, digest_ok: bool) -> IntegrityReport {
        IntegrityReport {
            stored_root: stored.map(str::to_owned),
            recomputed_root: recomputed.map(str::to_owned),
            stored_digest: Some("d1".into()),
            recomputed_digest: if digest_ok { "d1".into() } else { "d2".into() },
            live_count: 2,
        }
    }

    #[test]
    fn test_service_state_display() {
        assert_eq!(format!("{}", ServiceState::Uninitialized), "Uninitialized");
        assert_eq!(format!("{}", ServiceState::Initialized), "Initialized");
    }

    #[test]
    fn test_report_is_verified() {
        assert!(report(Some("r"), Some("r"), true).is_verified());
        assert!(!report(Some("r"), Some("x"), true).is_verified());
        assert!(!report(Some("r"), Some("r"), false).is_verified());
        assert!(!report(None, None, true).is_verified());
    }

    #[test]
    fn test_report_display() {
        assert_eq!(
            format!("{}", report(Some("VM1"), Some("VM1"), true)),
            "Integrity(verified=true, live=2, root=VM1)"
        );
        assert_eq!(
            format!("{}", report(None, None, true)),
            "Integrity(verified=false, live=2, root=none)"
        );
    }
}
