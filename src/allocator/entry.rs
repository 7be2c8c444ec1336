//! Heap entries for the priority allocator.

use std::cmp::Ordering;

/// A live resource's position in the allocation heap.
///
/// Ordering: lowest priority value first, then lowest sequence number
/// (FIFO within the same priority). `BinaryHeap` is a max-heap, so both
/// comparisons are reversed.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(super) struct QueueEntry {
    pub(super) priority: i64,
    /// Insertion order; also the key into the live set.
    pub(super) seq: u64,
}

impl Ord for QueueEntry {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
