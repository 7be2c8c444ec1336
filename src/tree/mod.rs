//! Binary integrity tree over the live resource set.
//!
//! # Design
//!
//! Leaves are resource ids in live-set order. Each level pairs values left to
//! right and replaces `(L, R)` with `hex(SHA-256(L || R))`. An odd node out is
//! paired with itself:
//!
//! ```text
//!                 H(H(ab) || H(cc))
//!                /                 \
//!           H(ab)                   H(cc)
//!          /     \                 /     \
//!         a       b               c      (c)
//! ```
//!
//! A single-leaf tree has the id itself as root; no hashing is applied.
//!
//! # Rebuild Strategy
//!
//! The tree is discarded and rebuilt from scratch after every allocator
//! mutation. That is O(n) per mutation, which is fine for pools of VMs. Any
//! incremental scheme must produce the same root for the same ordered ids.

mod integrity_tree;
mod node;

pub use integrity_tree::IntegrityTree;
pub use node::TreeNode;
