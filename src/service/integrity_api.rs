// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Integrity verification API.
//!
//! Verification recomputes both fingerprints from the live set and compares
//! them with what the last rebuild committed:
//!
//! ```text
//!   live set ──build──────────► recomputed root   ══?══  stored root
//!            ──content_digest─► recomputed digest ══?══  stored digest
//! ```
//!
//! The root covers ids and their order; the digest also covers priorities.

use tracing::{instrument, warn};

use crate::tree::IntegrityTree;

use super::{Inner, IntegrityReport, ResourceAllocationService};

impl ResourceAllocationService {
    /// True iff a root exists and the live set still produces it.
    ///
    /// Returns `false` before initialization and while the live set is
    /// drained (no root). Takes the read lock only; nothing is mutated.
    #[instrument(skip(self))]
    pub fn verify_integrity(&self) -> bool {
        let _timer = crate::metrics::LatencyTimer::new("verify");
        let inner = self.inner.read();
        let verified = Self::check(&inner);

        if !verified && inner.tree.root().is_some() {
            warn!(root = ?inner.tree.root(), "Integrity verification failed");
        }
        crate::metrics::record_integrity_check(verified);
        verified
    }

    /// Stored vs recomputed fingerprints, for diagnostics.
    #[must_use]
    pub fn integrity_report(&self) -> IntegrityReport {
        let inner = self.inner.read();
        IntegrityReport {
            stored_root: inner.tree.root().map(str::to_owned),
            recomputed_root: IntegrityTree::build(inner.allocator.live()).ok(),
            stored_digest: inner.tree.stored_digest().map(str::to_owned),
            recomputed_digest: IntegrityTree::content_digest(inner.allocator.live()),
            live_count: inner.allocator.len(),
        }
    }

    pub(super) fn check(inner: &Inner) -> bool {
        let Some(root) = inner.tree.root() else {
            return false;
        };
        IntegrityTree::verify(inner.allocator.live(), root)
            && inner.tree.stored_digest()
                == Some(IntegrityTree::content_digest(inner.allocator.live()).as_str())
    }
}
